//! Repositorio de conductores
//!
//! Un conductor es elegible para asignación cuando está verificado KYC
//! y tiene un vehículo activo e inspeccionado. Los contadores de
//! asientos se devuelven junto al conductor para que el validador pueda
//! reportar la capacidad actual.

use sqlx::PgPool;

use crate::models::driver::EligibleDriver;
use crate::utils::errors::AppResult;

pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Conductores elegibles con su vehículo activo y asientos
    pub async fn find_eligible(&self) -> AppResult<Vec<EligibleDriver>> {
        let drivers = sqlx::query_as::<_, EligibleDriver>(
            r#"
            SELECT u.id AS driver_id, u.full_name, u.email,
                   v.id AS vehicle_id, v.seat_count, v.available_seats
            FROM users u
            JOIN vehicles v ON v.driver_id = u.id
            WHERE u.verified = true
              AND u.kyc_status = 'approved'
              AND v.status = 'active'
              AND v.inspected = true
            ORDER BY u.full_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }
}
