//! Motor de asignación de rides
//!
//! Ejecuta un comando normalizado como una unidad de trabajo atómica:
//! cabecera del ride con su schedule, dos DailyRides por día hábil,
//! decremento de asiento y notificaciones, todo en una sola transacción.
//! La entrega de notificaciones ocurre después del commit y es
//! best-effort.

use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::daily_ride::{DailyRide, DailyRideKind, DailyRideStatus};
use crate::models::notification::Notification;
use crate::models::ride::{Ride, RideStatus, Schedule, ScheduleLeg};
use crate::repositories::ride_repository::{PersistedAssignment, RideRepository};
use crate::services::calendar::expand_weekdays;
use crate::services::notification_sender::{NotificationSender, OutboundNotification};
use crate::services::row_validator::AssignmentCommand;
use crate::utils::errors::{AppError, AppResult};

/// Plan de escritura de una asignación: todas las filas a insertar,
/// calculadas de forma pura antes de tocar la base de datos
#[derive(Debug, Clone)]
pub struct AssignmentPlan {
    pub ride: Ride,
    pub daily_rides: Vec<DailyRide>,
    pub notifications: Vec<Notification>,
}

impl AssignmentPlan {
    /// Materializar el comando en filas concretas. El rango ya fue
    /// pre-validado, pero un rango sin días hábiles sigue siendo un
    /// error aquí.
    pub fn build(command: &AssignmentCommand) -> AppResult<Self> {
        let dates = expand_weekdays(command.start_date, command.end_date);
        if dates.is_empty() {
            return Err(AppError::EmptySchedule(format!(
                "Date range {} to {} contains no weekdays",
                command.start_date, command.end_date
            )));
        }

        let ride_id = Uuid::new_v4();
        let schedule = Schedule {
            cost: command.cost,
            paid: None,
            pickup: ScheduleLeg {
                start_time: command.pickup.time,
                location: command.pickup.location.clone(),
                latitude: command.pickup.latitude,
                longitude: command.pickup.longitude,
            },
            dropoff: ScheduleLeg {
                start_time: command.dropoff.time,
                location: command.dropoff.location.clone(),
                latitude: command.dropoff.latitude,
                longitude: command.dropoff.longitude,
            },
            comments: command.comments.clone(),
            dates: dates.clone(),
            kind: command.kind,
        };

        let ride = Ride {
            id: ride_id,
            vehicle_id: command.vehicle_id,
            driver_id: command.driver_id,
            student_id: command.student_id,
            parent_id: command.parent_id,
            school_id: command.school_id,
            schedule,
            status: RideStatus::Ongoing,
            comments: command.comments.clone(),
            admin_comments: None,
            created_at: Utc::now(),
        };

        // Dos DailyRides por día hábil: pickup y dropoff, ambos inactive.
        // start y end son el mismo instante al crearse; la ejecución de
        // viajes los muta después, fuera de este core.
        let mut daily_rides = Vec::with_capacity(dates.len() * 2);
        for date in &dates {
            for (kind, time) in [
                (DailyRideKind::Pickup, command.pickup.time),
                (DailyRideKind::Dropoff, command.dropoff.time),
            ] {
                let instant = Utc.from_utc_datetime(&date.and_time(time));
                daily_rides.push(DailyRide {
                    id: Uuid::new_v4(),
                    ride_id,
                    vehicle_id: command.vehicle_id,
                    driver_id: command.driver_id,
                    kind,
                    date: *date,
                    starts_at: instant,
                    ends_at: instant,
                    status: DailyRideStatus::Inactive,
                });
            }
        }

        let mut notifications = Vec::new();
        let tags = vec!["ride".to_string(), "assignment".to_string()];
        if let Some(parent_id) = command.parent_id {
            notifications.push(Notification::new(
                parent_id,
                "New transport assignment".to_string(),
                format!(
                    "{} has been assigned to driver {} from {} to {}",
                    command.student_name, command.driver_name, command.start_date, command.end_date
                ),
                tags.clone(),
            ));
        }
        notifications.push(Notification::new(
            command.driver_id,
            "New transport assignment".to_string(),
            format!(
                "You have been assigned to transport {} from {} to {}",
                command.student_name, command.start_date, command.end_date
            ),
            tags,
        ));

        Ok(Self {
            ride,
            daily_rides,
            notifications,
        })
    }
}

/// Motor de asignación
pub struct AssignmentEngine {
    rides: RideRepository,
    notifier: Arc<dyn NotificationSender>,
}

impl AssignmentEngine {
    pub fn new(pool: PgPool, notifier: Arc<dyn NotificationSender>) -> Self {
        Self {
            rides: RideRepository::new(pool),
            notifier,
        }
    }

    /// Ejecutar una asignación validada. Éxito devuelve el id del nuevo
    /// ride; cualquier fallo antes del commit no deja estado parcial.
    pub async fn assign(&self, command: &AssignmentCommand) -> AppResult<Uuid> {
        let plan = AssignmentPlan::build(command)?;
        let persisted = self.rides.persist_assignment(&plan).await?;

        info!(
            "✅ Ride {} asignado: {} -> {} ({} días hábiles)",
            plan.ride.id,
            command.student_name,
            command.driver_name,
            plan.ride.schedule.dates.len()
        );

        self.deliver_notifications(command, &plan, &persisted).await;

        Ok(persisted.ride_id)
    }

    /// Entrega post-commit, best-effort: un fallo se loguea y nunca se
    /// propaga como fallo de la asignación
    async fn deliver_notifications(
        &self,
        command: &AssignmentCommand,
        plan: &AssignmentPlan,
        persisted: &PersistedAssignment,
    ) {
        for notification in &plan.notifications {
            let email = if notification.user_id == command.driver_id {
                command.driver_email.clone()
            } else {
                persisted.parent_email.clone()
            };

            let Some(email) = email else {
                continue;
            };

            let outbound = OutboundNotification {
                title: notification.title.clone(),
                message: notification.message.clone(),
                email,
            };
            if let Err(e) = self.notifier.send_single(&outbound).await {
                warn!(
                    "⚠️ Error enviando notificación a {}: {}",
                    outbound.email, e
                );
            }
        }
    }
}
