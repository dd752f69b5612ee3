pub mod assignment_routes;
