pub mod assignment_controller;
pub mod bulk_controller;
