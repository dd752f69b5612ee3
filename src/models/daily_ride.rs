//! Modelo de DailyRide
//!
//! Por cada día hábil del schedule se crean exactamente dos filas:
//! una de pickup y una de dropoff, ambas en estado inactive. El ciclo
//! de vida posterior (started/ongoing/finished) pertenece al subsistema
//! de ejecución de viajes, no a este core.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentido del viaje diario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DailyRideKind {
    Pickup,
    Dropoff,
}

impl DailyRideKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DailyRideKind::Pickup => "pickup",
            DailyRideKind::Dropoff => "dropoff",
        }
    }
}

/// Estado del viaje diario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DailyRideStatus {
    Inactive,
    Started,
    Ongoing,
    Finished,
}

impl DailyRideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DailyRideStatus::Inactive => "inactive",
            DailyRideStatus::Started => "started",
            DailyRideStatus::Ongoing => "ongoing",
            DailyRideStatus::Finished => "finished",
        }
    }
}

/// DailyRide - mapea a la tabla daily_rides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRide {
    pub id: Uuid,
    pub ride_id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub kind: DailyRideKind,
    pub date: NaiveDate,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: DailyRideStatus,
}
