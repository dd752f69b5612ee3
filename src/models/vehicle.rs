//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus variantes.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.
//! Invariante: 0 <= available_seats <= seat_count en todo momento.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub seat_count: i32,
    pub available_seats: i32,
    pub status: String,
    pub inspected: bool,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}
