//! Modelo de Driver
//!
//! Un Driver es una especialización de User. Para ser elegible en una
//! asignación debe estar verificado KYC y tener un vehículo activo
//! e inspeccionado.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Driver elegible con su vehículo activo y contadores de asientos.
/// Resultado del join users + vehicles usado como dato de referencia
/// por el validador de filas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EligibleDriver {
    pub driver_id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub vehicle_id: Uuid,
    pub seat_count: i32,
    pub available_seats: i32,
}
