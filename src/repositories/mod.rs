//! Repositorios de acceso a datos
//!
//! Cada repositorio encapsula las queries SQL de una entidad.

pub mod driver_repository;
pub mod ride_repository;
pub mod student_repository;
