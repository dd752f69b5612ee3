use serde::Serialize;

use crate::services::bulk_orchestrator::{
    BulkReport, RowRejection, RowSuccess, RowWarnings,
};

// Response de la carga masiva: conteos agregados más el desglose por fila
#[derive(Debug, Serialize)]
pub struct BulkUploadResponse {
    pub successful: usize,
    pub failed: usize,
    pub rejected: usize,
    pub total_rows: usize,
    pub errors: Vec<String>,
    pub successes: Vec<RowSuccess>,
    pub rejections: Vec<RowRejection>,
    pub warnings: Vec<RowWarnings>,
}

impl From<BulkReport> for BulkUploadResponse {
    fn from(report: BulkReport) -> Self {
        let errors = report
            .failures
            .iter()
            .map(|f| format!("row {} ({}): {}", f.row, f.label, f.reason))
            .collect();

        Self {
            successful: report.successful(),
            failed: report.failed(),
            rejected: report.rejected(),
            total_rows: report.total_rows,
            errors,
            successes: report.successes,
            rejections: report.rejections,
            warnings: report.warnings,
        }
    }
}
