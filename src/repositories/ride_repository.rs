//! Repositorio de rides
//!
//! Contiene la unidad de trabajo de asignación: todas las escrituras de
//! los pasos 1 a 5 ocurren dentro de una sola transacción. El chequeo de
//! conflicto y el decremento condicional de asiento viven dentro de la
//! misma transacción que los inserts, de modo que la precondición y la
//! escritura son atómicas.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vehicle::Vehicle;
use crate::services::assignment_engine::AssignmentPlan;
use crate::utils::errors::{capacity_error, conflict_error, not_found_error, AppError, AppResult};

/// Resultado de la unidad de trabajo ya confirmada
#[derive(Debug, Clone)]
pub struct PersistedAssignment {
    pub ride_id: Uuid,
    pub parent_email: Option<String>,
}

pub struct RideRepository {
    pool: PgPool,
}

impl RideRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persistir una asignación completa de forma atómica. Cualquier
    /// retorno temprano descarta la transacción y revierte todo lo
    /// escrito en esta invocación.
    pub async fn persist_assignment(&self, plan: &AssignmentPlan) -> AppResult<PersistedAssignment> {
        let mut tx = self.pool.begin().await?;

        // 1. Conflicto: el estudiante no puede tener otro ride activo
        let conflict: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM rides
                WHERE student_id = $1 AND status IN ('ongoing', 'pending')
            )
            "#,
        )
        .bind(plan.ride.student_id)
        .fetch_one(&mut *tx)
        .await?;

        if conflict {
            let student_name: Option<String> =
                sqlx::query_scalar("SELECT full_name FROM students WHERE id = $1")
                    .bind(plan.ride.student_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            return Err(conflict_error(
                student_name.as_deref().unwrap_or("student"),
            ));
        }

        // 2. Decremento condicional: precondición y escritura en una sola
        //    sentencia, nunca por debajo de cero
        let decremented: Option<(i32, i32)> = sqlx::query_as(
            r#"
            UPDATE vehicles
            SET available_seats = available_seats - 1
            WHERE id = $1 AND status = 'active' AND available_seats > 0
            RETURNING available_seats, seat_count
            "#,
        )
        .bind(plan.ride.vehicle_id)
        .fetch_optional(&mut *tx)
        .await?;

        if decremented.is_none() {
            let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
                .bind(plan.ride.vehicle_id)
                .fetch_optional(&mut *tx)
                .await?;
            return Err(match vehicle {
                Some(v) if v.is_active() => capacity_error(v.available_seats, v.seat_count),
                Some(_) => AppError::Conflict("Vehicle is no longer active".to_string()),
                None => not_found_error("Vehicle", &plan.ride.vehicle_id.to_string()),
            });
        }

        // 3. Cabecera del ride con su schedule embebido
        let schedule = serde_json::to_value(&plan.ride.schedule)
            .map_err(|e| AppError::Internal(format!("Error serializing schedule: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO rides (id, vehicle_id, driver_id, student_id, parent_id, school_id,
                               schedule, status, comments, admin_comments, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(plan.ride.id)
        .bind(plan.ride.vehicle_id)
        .bind(plan.ride.driver_id)
        .bind(plan.ride.student_id)
        .bind(plan.ride.parent_id)
        .bind(plan.ride.school_id)
        .bind(schedule)
        .bind(plan.ride.status.as_str())
        .bind(&plan.ride.comments)
        .bind(&plan.ride.admin_comments)
        .bind(plan.ride.created_at)
        .execute(&mut *tx)
        .await?;

        // 4. Dos DailyRides por día hábil
        for daily in &plan.daily_rides {
            sqlx::query(
                r#"
                INSERT INTO daily_rides (id, ride_id, vehicle_id, driver_id, kind, date,
                                         starts_at, ends_at, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(daily.id)
            .bind(daily.ride_id)
            .bind(daily.vehicle_id)
            .bind(daily.driver_id)
            .bind(daily.kind.as_str())
            .bind(daily.date)
            .bind(daily.starts_at)
            .bind(daily.ends_at)
            .bind(daily.status.as_str())
            .execute(&mut *tx)
            .await?;
        }

        // 5. Notificaciones: la persistencia es estado de dominio y va en
        //    la transacción; la entrega ocurre después del commit
        for notification in &plan.notifications {
            sqlx::query(
                r#"
                INSERT INTO notifications (id, user_id, title, message, read, tags, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(notification.id)
            .bind(notification.user_id)
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(notification.read)
            .bind(&notification.tags)
            .bind(notification.created_at)
            .execute(&mut *tx)
            .await?;
        }

        // Email del padre para la entrega post-commit
        let parent_email = match plan.ride.parent_id {
            Some(parent_id) => {
                sqlx::query_scalar::<_, Option<String>>("SELECT email FROM users WHERE id = $1")
                    .bind(parent_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .flatten()
            }
            None => None,
        };

        tx.commit().await?;

        Ok(PersistedAssignment {
            ride_id: plan.ride.id,
            parent_email,
        })
    }
}
