use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

use crate::config::assignment::AssignmentConfig;
use crate::dto::assignment_dto::{
    AssignmentResponse, CreateAssignmentRequest, ReferenceDataResponse,
};
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::student_repository::StudentRepository;
use crate::services::assignment_engine::AssignmentEngine;
use crate::services::notification_sender::NotificationSender;
use crate::services::row_validator::RowValidator;
use crate::utils::errors::AppResult;

pub struct AssignmentController {
    students: StudentRepository,
    drivers: DriverRepository,
    validator: RowValidator,
    engine: AssignmentEngine,
}

impl AssignmentController {
    pub fn new(
        pool: PgPool,
        assignment: &AssignmentConfig,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        // "hoy" se fija al construir el controller, no dentro del validador
        let context = assignment.validation_context(Utc::now().date_naive());
        Self {
            students: StudentRepository::new(pool.clone()),
            drivers: DriverRepository::new(pool.clone()),
            validator: RowValidator::new(context),
            engine: AssignmentEngine::new(pool, notifier),
        }
    }

    /// Asignación individual: validar contra los datos de referencia y,
    /// si la fila es válida, ejecutar el comando normalizado
    pub async fn assign(&self, request: CreateAssignmentRequest) -> AppResult<AssignmentResponse> {
        request.validate()?;

        let students = self.students.find_all().await?;
        let drivers = self.drivers.find_eligible().await?;

        let input = request.into_input();
        let verdict = self.validator.validate(&input, &students, &drivers);
        let warnings = verdict.warnings.clone();

        match verdict.command {
            Some(command) if verdict.errors.is_empty() => {
                let ride_id = self.engine.assign(&command).await?;
                Ok(AssignmentResponse::assigned(ride_id, warnings))
            }
            _ => Ok(AssignmentResponse::rejected(verdict.errors, warnings)),
        }
    }

    /// Datos de referencia: estudiantes sin ride activo y conductores
    /// elegibles con sus asientos
    pub async fn reference_data(&self) -> AppResult<ReferenceDataResponse> {
        let students = self.students.find_unassigned().await?;
        let drivers = self.drivers.find_eligible().await?;

        Ok(ReferenceDataResponse { students, drivers })
    }
}
