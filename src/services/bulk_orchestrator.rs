//! Orquestación de carga masiva
//!
//! Recorre la tabla subida en dos fases: primero valida todas las filas
//! sin ejecutar nada, después ejecuta las filas válidas una por una, en
//! orden de tabla y con una pausa fija entre filas. El fallo de una fila
//! nunca aborta el lote; solo un error a nivel de archivo (cabecera
//! inválida, payload vacío o demasiado grande) aborta antes de procesar.

use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::driver::EligibleDriver;
use crate::models::student::Student;
use crate::services::assignment_engine::AssignmentEngine;
use crate::services::row_validator::{
    AssignmentCommand, AssignmentInput, RowValidator, ValidationIssue,
};
use crate::utils::errors::{AppError, AppResult};

/// Columnas requeridas de la cabecera (comparación case-insensitive)
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "student name",
    "driver name",
    "pickup location",
    "pickup time",
    "dropoff location",
    "dropoff time",
    "start date",
    "end date",
    "ride type",
    "cost",
];

/// Una fila de datos ya tokenizada, con su número de fila original
/// (1 = primera fila de datos, la cabecera no cuenta)
#[derive(Debug, Clone)]
pub struct BulkRow {
    pub row_number: usize,
    pub input: AssignmentInput,
}

/// Fila rechazada en la fase de validación, nunca ejecutada
#[derive(Debug, Clone, Serialize)]
pub struct RowRejection {
    pub row: usize,
    pub label: String,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// Fila válida con advertencias a revisar
#[derive(Debug, Clone, Serialize)]
pub struct RowWarnings {
    pub row: usize,
    pub label: String,
    pub warnings: Vec<ValidationIssue>,
}

/// Fila ejecutada con éxito
#[derive(Debug, Clone, Serialize)]
pub struct RowSuccess {
    pub row: usize,
    pub label: String,
    pub ride_id: Uuid,
}

/// Fila válida cuya ejecución falló
#[derive(Debug, Clone, Serialize)]
pub struct RowFailure {
    pub row: usize,
    pub label: String,
    pub reason: String,
}

/// Fila validada pendiente de ejecución
#[derive(Debug, Clone)]
pub struct PendingRow {
    pub row: usize,
    pub label: String,
    pub command: AssignmentCommand,
}

/// Reporte agregado del lote completo
#[derive(Debug, Clone, Serialize)]
pub struct BulkReport {
    pub total_rows: usize,
    pub successes: Vec<RowSuccess>,
    pub failures: Vec<RowFailure>,
    pub rejections: Vec<RowRejection>,
    pub warnings: Vec<RowWarnings>,
}

impl BulkReport {
    pub fn successful(&self) -> usize {
        self.successes.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn rejected(&self) -> usize {
        self.rejections.len()
    }
}

/// Parsear el payload subido a filas tokenizadas. Rechaza el archivo
/// completo antes de procesar fila alguna si la cabecera no trae todas
/// las columnas requeridas, si el payload está vacío o si supera el
/// tope de tamaño.
pub fn parse_bulk_table(text: &str, max_bytes: usize) -> AppResult<Vec<BulkRow>> {
    if text.len() > max_bytes {
        return Err(AppError::BadRequest(format!(
            "Upload exceeds the size limit of {} bytes",
            max_bytes
        )));
    }
    if text.trim().is_empty() {
        return Err(AppError::BadRequest("Upload is empty".to_string()));
    }

    let lines: Vec<&str> = text.lines().collect();
    let header: Vec<String> = parse_delimited_record(lines[0])
        .into_iter()
        .map(|field| field.trim().to_lowercase())
        .collect();

    let mut columns: HashMap<String, usize> = HashMap::new();
    for (index, name) in header.iter().enumerate() {
        columns.insert(name.clone(), index);
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !columns.contains_key(**name))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )));
    }

    let required = |fields: &[String], name: &str| -> String {
        columns
            .get(name)
            .and_then(|i| fields.get(*i))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };
    let optional = |fields: &[String], name: &str| -> Option<String> {
        columns
            .get(name)
            .and_then(|i| fields.get(*i))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let mut rows = Vec::new();
    let mut row_number = 0usize;
    for line in lines.iter().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let fields = parse_delimited_record(line);
        if fields.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        row_number += 1;

        rows.push(BulkRow {
            row_number,
            input: AssignmentInput {
                student: required(&fields, "student name"),
                driver: required(&fields, "driver name"),
                pickup_location: required(&fields, "pickup location"),
                pickup_time: required(&fields, "pickup time"),
                pickup_latitude: optional(&fields, "pickup latitude"),
                pickup_longitude: optional(&fields, "pickup longitude"),
                dropoff_location: required(&fields, "dropoff location"),
                dropoff_time: required(&fields, "dropoff time"),
                dropoff_latitude: optional(&fields, "dropoff latitude"),
                dropoff_longitude: optional(&fields, "dropoff longitude"),
                start_date: required(&fields, "start date"),
                end_date: required(&fields, "end date"),
                ride_kind: required(&fields, "ride type"),
                cost: required(&fields, "cost"),
                comments: optional(&fields, "comments"),
            },
        });
    }

    Ok(rows)
}

/// Tokenizar una línea delimitada por comas, con soporte de valores
/// entre comillas para embeber comas y comillas escapadas ("")
fn parse_delimited_record(line: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0usize;
    while i < chars.len() {
        let ch = chars[i];
        if ch == '"' {
            if in_quotes && i + 1 < chars.len() && chars[i + 1] == '"' {
                buf.push('"');
                i += 2;
                continue;
            }
            in_quotes = !in_quotes;
            i += 1;
            continue;
        }
        if ch == ',' && !in_quotes {
            out.push(buf);
            buf = String::new();
            i += 1;
            continue;
        }
        buf.push(ch);
        i += 1;
    }
    out.push(buf);
    out
}

/// Fase 1: validar todas las filas sin ejecutar ninguna
pub fn validate_rows(
    validator: &RowValidator,
    rows: &[BulkRow],
    students: &[Student],
    drivers: &[EligibleDriver],
) -> (Vec<PendingRow>, Vec<RowRejection>, Vec<RowWarnings>) {
    let mut pending = Vec::new();
    let mut rejections = Vec::new();
    let mut warnings = Vec::new();

    for row in rows {
        let label = row_label(row);
        let verdict = validator.validate(&row.input, students, drivers);

        match verdict.command {
            Some(command) if verdict.errors.is_empty() => {
                if !verdict.warnings.is_empty() {
                    warnings.push(RowWarnings {
                        row: row.row_number,
                        label: label.clone(),
                        warnings: verdict.warnings,
                    });
                }
                pending.push(PendingRow {
                    row: row.row_number,
                    label,
                    command,
                });
            }
            _ => {
                rejections.push(RowRejection {
                    row: row.row_number,
                    label,
                    errors: verdict.errors,
                    warnings: verdict.warnings,
                });
            }
        }
    }

    (pending, rejections, warnings)
}

fn row_label(row: &BulkRow) -> String {
    let student = row.input.student.trim();
    if student.is_empty() {
        format!("row {}", row.row_number)
    } else {
        student.to_string()
    }
}

/// Orquestador de carga masiva
pub struct BulkOrchestrator {
    validator: RowValidator,
    engine: AssignmentEngine,
    row_delay: Duration,
}

impl BulkOrchestrator {
    pub fn new(validator: RowValidator, engine: AssignmentEngine, row_delay: Duration) -> Self {
        Self {
            validator,
            engine,
            row_delay,
        }
    }

    /// Procesar el lote completo: validar todo primero, después ejecutar
    /// las filas válidas secuencialmente, una a la vez, en orden de tabla
    pub async fn run(
        &self,
        rows: Vec<BulkRow>,
        students: &[Student],
        drivers: &[EligibleDriver],
    ) -> BulkReport {
        let total_rows = rows.len();
        info!("📋 Validando {} filas antes de ejecutar", total_rows);

        let (pending, rejections, warnings) =
            validate_rows(&self.validator, &rows, students, drivers);

        if !rejections.is_empty() {
            warn!(
                "⚠️ {} filas rechazadas en validación, no se ejecutarán",
                rejections.len()
            );
        }

        let total_valid = pending.len();
        let mut successes = Vec::new();
        let mut failures = Vec::new();

        for (index, row) in pending.into_iter().enumerate() {
            match self.engine.assign(&row.command).await {
                Ok(ride_id) => {
                    successes.push(RowSuccess {
                        row: row.row,
                        label: row.label,
                        ride_id,
                    });
                }
                Err(e) => {
                    warn!("❌ Fila {} ({}) falló: {}", row.row, row.label, e);
                    failures.push(RowFailure {
                        row: row.row,
                        label: row.label,
                        reason: e.to_string(),
                    });
                }
            }

            info!("📦 Progreso: {}/{} filas ejecutadas", index + 1, total_valid);

            // Pausa fija entre filas para no saturar los sistemas de abajo
            if index + 1 < total_valid {
                tokio::time::sleep(self.row_delay).await;
            }
        }

        info!(
            "✅ Lote completado: {} exitosas, {} fallidas, {} rechazadas",
            successes.len(),
            failures.len(),
            rejections.len()
        );

        BulkReport {
            total_rows,
            successes,
            failures,
            rejections,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::row_validator::{RegionBounds, ValidationContext};
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    const HEADER: &str = "Student Name,Driver Name,Pickup Location,Pickup Time,Pickup Latitude,Pickup Longitude,Dropoff Location,Dropoff Time,Dropoff Latitude,Dropoff Longitude,Start Date,End Date,Ride Type,Cost,Comments";

    fn row_line(student: &str, driver: &str) -> String {
        format!(
            "{},{},12 Rue des Écoles,07:30,48.85,2.35,École Jean Moulin,16:45,,,2025-01-20,2025-01-24,Private,120.00,",
            student, driver
        )
    }

    fn student(name: &str) -> Student {
        Student {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            gender: None,
            address: None,
            parent_id: None,
            school_id: None,
            created_at: Utc::now(),
        }
    }

    fn driver(name: &str) -> EligibleDriver {
        EligibleDriver {
            driver_id: Uuid::new_v4(),
            full_name: name.to_string(),
            email: None,
            vehicle_id: Uuid::new_v4(),
            seat_count: 4,
            available_seats: 4,
        }
    }

    fn validator() -> RowValidator {
        RowValidator::new(ValidationContext {
            today: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            high_cost_threshold: Decimal::new(50000, 2),
            region_bounds: None::<RegionBounds>,
        })
    }

    #[test]
    fn test_parse_rejects_missing_columns() {
        let text = "Student Name,Driver Name\nEmma,Karim";
        let result = parse_bulk_table(text, 1024 * 1024);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_parse_rejects_empty_upload() {
        assert!(matches!(
            parse_bulk_table("   \n  ", 1024),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_parse_rejects_oversized_upload() {
        let text = format!("{}\n{}", HEADER, row_line("Emma Durand", "Karim Benali"));
        assert!(matches!(
            parse_bulk_table(&text, 10),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_parse_maps_columns_and_skips_blank_rows() {
        let text = format!(
            "{}\n{}\n\n,,,,,,,,,,,,,,\n{}",
            HEADER,
            row_line("Emma Durand", "Karim Benali"),
            row_line("Lucas Moreau", "Karim Benali"),
        );
        let rows = parse_bulk_table(&text, 1024 * 1024).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_number, 1);
        assert_eq!(rows[0].input.student, "Emma Durand");
        assert_eq!(rows[0].input.pickup_latitude.as_deref(), Some("48.85"));
        assert_eq!(rows[0].input.dropoff_latitude, None);
        assert_eq!(rows[1].row_number, 2);
        assert_eq!(rows[1].input.student, "Lucas Moreau");
    }

    #[test]
    fn test_parse_supports_quoted_commas() {
        let text = format!(
            "{}\n\"Durand, Emma\",Karim Benali,\"12, Rue des Écoles\",07:30,,,École,16:45,,,2025-01-20,2025-01-24,Private,120.00,\"con \"\"comillas\"\"\"",
            HEADER
        );
        let rows = parse_bulk_table(&text, 1024 * 1024).unwrap();

        assert_eq!(rows[0].input.student, "Durand, Emma");
        assert_eq!(rows[0].input.pickup_location, "12, Rue des Écoles");
        assert_eq!(rows[0].input.comments.as_deref(), Some("con \"comillas\""));
    }

    #[test]
    fn test_header_match_is_case_insensitive() {
        let text = format!(
            "{}\n{}",
            HEADER.to_uppercase(),
            row_line("Emma Durand", "Karim Benali")
        );
        let rows = parse_bulk_table(&text, 1024 * 1024).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_validation_phase_rejects_without_executing() {
        let students: Vec<Student> = (1..=10)
            .map(|i| student(&format!("Student {}", i)))
            .collect();
        let drivers = vec![driver("Karim Benali")];

        let mut lines = vec![HEADER.to_string()];
        for i in 1..=10 {
            let driver_name = if i == 4 { "Nadie Conocido" } else { "Karim Benali" };
            lines.push(row_line(&format!("Student {}", i), driver_name));
        }
        let rows = parse_bulk_table(&lines.join("\n"), 1024 * 1024).unwrap();
        assert_eq!(rows.len(), 10);

        let (pending, rejections, _warnings) =
            validate_rows(&validator(), &rows, &students, &drivers);

        assert_eq!(pending.len(), 9);
        assert_eq!(rejections.len(), 1);
        assert_eq!(rejections[0].row, 4);
        assert_eq!(rejections[0].label, "Student 4");
        assert!(rejections[0]
            .errors
            .iter()
            .any(|e| e.code == "entity_not_found"));
        assert_eq!(pending.len() + rejections.len(), rows.len());
    }

    #[test]
    fn test_valid_row_warnings_are_retained() {
        let students = vec![student("Emma Durand")];
        let drivers = vec![driver("Karim Benali")];

        let mut line = row_line("Emma Durand", "Karim Benali");
        // start anterior a "hoy" del contexto
        line = line.replace("2025-01-20", "2025-01-06");
        let text = format!("{}\n{}", HEADER, line);
        let rows = parse_bulk_table(&text, 1024 * 1024).unwrap();

        let (pending, rejections, warnings) =
            validate_rows(&validator(), &rows, &students, &drivers);

        assert_eq!(pending.len(), 1);
        assert!(rejections.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].warnings.iter().any(|w| w.code == "start_in_past"));
    }
}
