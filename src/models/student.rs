//! Modelo de Student
//!
//! Este módulo contiene el struct Student que mapea a la tabla students.
//! La identidad del estudiante es inmutable durante el flujo de asignación.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Student - mapea exactamente a la tabla students
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: Uuid,
    pub full_name: String,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub parent_id: Option<Uuid>,
    pub school_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
