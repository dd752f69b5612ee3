//! Modelo de Ride y su Schedule
//!
//! El Ride es la cabecera de una asignación estudiante/conductor. El
//! Schedule embebido (columna JSONB) es la única fuente de verdad de
//! "qué días corre este ride y a qué horas".

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Tipo de ride - la comparación es case-sensitive en la validación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RideKind {
    Private,
    Carpool,
    Bus,
}

impl FromStr for RideKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Private" => Ok(RideKind::Private),
            "Carpool" => Ok(RideKind::Carpool),
            "Bus" => Ok(RideKind::Bus),
            _ => Err(()),
        }
    }
}

impl fmt::Display for RideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RideKind::Private => write!(f, "Private"),
            RideKind::Carpool => write!(f, "Carpool"),
            RideKind::Bus => write!(f, "Bus"),
        }
    }
}

/// Estado del ride - mapea a la columna status (texto en minúsculas)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    Requested,
    Pending,
    Ongoing,
    Cancelled,
    Completed,
}

impl RideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RideStatus::Requested => "requested",
            RideStatus::Pending => "pending",
            RideStatus::Ongoing => "ongoing",
            RideStatus::Cancelled => "cancelled",
            RideStatus::Completed => "completed",
        }
    }
}

/// Tramo del schedule (pickup o dropoff)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleLeg {
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Schedule embebido en el Ride (columna JSONB)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub cost: Decimal,
    #[serde(default)]
    pub paid: Option<Decimal>,
    pub pickup: ScheduleLeg,
    pub dropoff: ScheduleLeg,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub dates: Vec<NaiveDate>,
    pub kind: RideKind,
}

/// Ride - cabecera de asignación, mapea a la tabla rides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ride {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub student_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub school_id: Option<Uuid>,
    pub schedule: Schedule,
    pub status: RideStatus,
    pub comments: Option<String>,
    pub admin_comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Serde para horas "HH:MM" en el JSON persistido del Schedule
mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, "%H:%M").map_err(serde::de::Error::custom)
    }
}
