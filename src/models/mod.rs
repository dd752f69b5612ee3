//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod daily_ride;
pub mod driver;
pub mod notification;
pub mod ride;
pub mod student;
pub mod vehicle;
