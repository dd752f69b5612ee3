use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::assignment::AssignmentConfig;
use crate::dto::bulk_dto::BulkUploadResponse;
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::student_repository::StudentRepository;
use crate::services::assignment_engine::AssignmentEngine;
use crate::services::bulk_orchestrator::{parse_bulk_table, BulkOrchestrator};
use crate::services::notification_sender::NotificationSender;
use crate::services::row_validator::RowValidator;
use crate::utils::errors::AppResult;

pub struct BulkController {
    students: StudentRepository,
    drivers: DriverRepository,
    orchestrator: BulkOrchestrator,
    max_upload_bytes: usize,
}

impl BulkController {
    pub fn new(
        pool: PgPool,
        assignment: &AssignmentConfig,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        let validator = RowValidator::new(assignment.validation_context(Utc::now().date_naive()));
        let engine = AssignmentEngine::new(pool.clone(), notifier);
        let orchestrator = BulkOrchestrator::new(
            validator,
            engine,
            Duration::from_millis(assignment.bulk_row_delay_ms),
        );

        Self {
            students: StudentRepository::new(pool.clone()),
            drivers: DriverRepository::new(pool),
            orchestrator,
            max_upload_bytes: assignment.max_upload_bytes,
        }
    }

    /// Procesar una tabla subida: un error a nivel de archivo aborta
    /// antes de intentar fila alguna; después de eso, el fallo de una
    /// fila nunca detiene el resto del lote
    pub async fn process_upload(&self, payload: String) -> AppResult<BulkUploadResponse> {
        let rows = parse_bulk_table(&payload, self.max_upload_bytes)?;
        info!("📄 Carga masiva recibida: {} filas de datos", rows.len());

        let students = self.students.find_all().await?;
        let drivers = self.drivers.find_eligible().await?;

        let report = self.orchestrator.run(rows, &students, &drivers).await;

        Ok(BulkUploadResponse::from(report))
    }
}
