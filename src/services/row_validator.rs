//! Validación de filas de asignación
//!
//! Este servicio valida una asignación candidata (formulario individual o
//! una fila de carga masiva) contra los datos de referencia y produce un
//! comando normalizado o una lista de errores bloqueantes más una lista
//! separada de advertencias no bloqueantes.
//!
//! Las reglas se aplican de forma independiente: se recolectan todos los
//! errores en una pasada, sin cortocircuito. El servicio no tiene efectos
//! secundarios, solo lee datos de referencia.

use chrono::{NaiveDate, NaiveTime, Timelike};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::driver::EligibleDriver;
use crate::models::ride::RideKind;
use crate::models::student::Student;
use crate::services::calendar::expand_weekdays;
use crate::utils::validation::{
    validate_coordinates, validate_cost, validate_date, validate_not_empty, validate_time,
};

/// Valores crudos de una asignación candidata, tal como llegan del
/// formulario o de una fila de la tabla subida
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentInput {
    pub student: String,
    pub driver: String,
    pub pickup_location: String,
    pub pickup_time: String,
    pub pickup_latitude: Option<String>,
    pub pickup_longitude: Option<String>,
    pub dropoff_location: String,
    pub dropoff_time: String,
    pub dropoff_latitude: Option<String>,
    pub dropoff_longitude: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub ride_kind: String,
    pub cost: String,
    pub comments: Option<String>,
}

/// Un problema detectado durante la validación
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: &str, code: &str, message: String) -> Self {
        Self {
            field: field.to_string(),
            code: code.to_string(),
            message,
        }
    }
}

/// Caja delimitadora regional para la advertencia de coordenadas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionBounds {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl RegionBounds {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_latitude
            && latitude <= self.max_latitude
            && longitude >= self.min_longitude
            && longitude <= self.max_longitude
    }
}

/// Contexto de validación: "hoy" y los umbrales son entradas explícitas
/// para mantener el validador puro y testeable
#[derive(Debug, Clone)]
pub struct ValidationContext {
    pub today: NaiveDate,
    pub high_cost_threshold: Decimal,
    pub region_bounds: Option<RegionBounds>,
}

/// Tramo normalizado (pickup o dropoff) dentro del comando
#[derive(Debug, Clone, PartialEq)]
pub struct LegSpec {
    pub time: NaiveTime,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Comando normalizado: todos los campos tipados y cruzados a IDs de
/// entidades. Es la única entrada que acepta el motor de asignación.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentCommand {
    pub student_id: Uuid,
    pub student_name: String,
    pub parent_id: Option<Uuid>,
    pub school_id: Option<Uuid>,
    pub driver_id: Uuid,
    pub driver_name: String,
    pub driver_email: Option<String>,
    pub vehicle_id: Uuid,
    pub pickup: LegSpec,
    pub dropoff: LegSpec,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub kind: RideKind,
    pub cost: Decimal,
    pub comments: Option<String>,
}

/// Veredicto de una fila: comando normalizado o errores bloqueantes,
/// más advertencias no bloqueantes en ambos casos
#[derive(Debug, Clone)]
pub struct RowVerdict {
    pub command: Option<AssignmentCommand>,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl RowVerdict {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.command.is_some()
    }
}

/// Validador de filas de asignación
pub struct RowValidator {
    context: ValidationContext,
    time_regex: Regex,
    date_regex: Regex,
}

const MAX_SPAN_DAYS: i64 = 365;

impl RowValidator {
    pub fn new(context: ValidationContext) -> Self {
        // Formatos estrictos: chrono acepta "7:30" con %H:%M, aquí no
        let time_regex = Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap();
        let date_regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();

        Self {
            context,
            time_regex,
            date_regex,
        }
    }

    /// Validar una asignación candidata contra los datos de referencia.
    /// Todas las reglas se evalúan; nada se ejecuta ni se persiste.
    pub fn validate(
        &self,
        input: &AssignmentInput,
        students: &[Student],
        drivers: &[EligibleDriver],
    ) -> RowVerdict {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        // 1. Campos de texto requeridos
        let required = [
            ("student", &input.student),
            ("driver", &input.driver),
            ("pickup_location", &input.pickup_location),
            ("pickup_time", &input.pickup_time),
            ("dropoff_location", &input.dropoff_location),
            ("dropoff_time", &input.dropoff_time),
            ("start_date", &input.start_date),
            ("end_date", &input.end_date),
        ];
        for (field, value) in required {
            if validate_not_empty(value).is_err() {
                errors.push(ValidationIssue::new(
                    field,
                    "required",
                    format!("Field '{}' is required", field),
                ));
            }
        }

        // 2. Resolver estudiante y conductor (ID directo o nombre exacto)
        let student = resolve_student(&input.student, students);
        if !input.student.trim().is_empty() && student.is_none() {
            errors.push(ValidationIssue::new(
                "student",
                "entity_not_found",
                format!("Student '{}' not found", input.student.trim()),
            ));
        }

        let driver = resolve_driver(&input.driver, drivers);
        if !input.driver.trim().is_empty() && driver.is_none() {
            errors.push(ValidationIssue::new(
                "driver",
                "entity_not_found",
                format!("Driver '{}' not found or not eligible", input.driver.trim()),
            ));
        }

        // 3. Capacidad del vehículo del conductor resuelto
        if let Some(driver) = driver {
            if driver.available_seats <= 0 {
                errors.push(ValidationIssue::new(
                    "driver",
                    "capacity",
                    format!(
                        "Vehicle has no free seats ({}/{} available)",
                        driver.available_seats, driver.seat_count
                    ),
                ));
            }
        }

        // 4. Horas HH:MM de 24 horas
        let pickup_time = self.parse_time("pickup_time", &input.pickup_time, &mut errors);
        let dropoff_time = self.parse_time("dropoff_time", &input.dropoff_time, &mut errors);
        if let (Some(pickup), Some(dropoff)) = (pickup_time, dropoff_time) {
            if minutes_of_day(dropoff) <= minutes_of_day(pickup) {
                warnings.push(ValidationIssue::new(
                    "dropoff_time",
                    "dropoff_before_pickup",
                    format!(
                        "Dropoff time {} is not after pickup time {}",
                        input.dropoff_time.trim(),
                        input.pickup_time.trim()
                    ),
                ));
            }
        }

        // 5. Fechas YYYY-MM-DD y rango
        let start_date = self.parse_date("start_date", &input.start_date, &mut errors);
        let end_date = self.parse_date("end_date", &input.end_date, &mut errors);
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                errors.push(ValidationIssue::new(
                    "start_date",
                    "range",
                    format!("Start date {} is after end date {}", start, end),
                ));
            } else {
                if start < self.context.today {
                    warnings.push(ValidationIssue::new(
                        "start_date",
                        "start_in_past",
                        format!("Start date {} is before today", start),
                    ));
                }
                if (end - start).num_days() > MAX_SPAN_DAYS {
                    warnings.push(ValidationIssue::new(
                        "end_date",
                        "long_span",
                        format!("Date range exceeds {} days", MAX_SPAN_DAYS),
                    ));
                }

                // 6. El rango debe contener al menos un día hábil
                if expand_weekdays(start, end).is_empty() {
                    errors.push(ValidationIssue::new(
                        "start_date",
                        "empty_schedule",
                        "Date range contains no weekdays".to_string(),
                    ));
                }
            }
        }

        // 7. Tipo de ride, exacto y case-sensitive
        let kind: Option<RideKind> = match input.ride_kind.trim().parse() {
            Ok(kind) => Some(kind),
            Err(_) => {
                errors.push(ValidationIssue::new(
                    "ride_kind",
                    "format",
                    format!(
                        "Ride type '{}' must be one of Private, Carpool, Bus",
                        input.ride_kind.trim()
                    ),
                ));
                None
            }
        };

        // 8. Costo numérico > 0
        let cost = match validate_cost(&input.cost) {
            Ok(cost) => {
                if cost > self.context.high_cost_threshold {
                    warnings.push(ValidationIssue::new(
                        "cost",
                        "high_cost",
                        format!(
                            "Cost {} exceeds the threshold of {}",
                            cost, self.context.high_cost_threshold
                        ),
                    ));
                }
                Some(cost)
            }
            Err(_) => {
                errors.push(ValidationIssue::new(
                    "cost",
                    "format",
                    format!("Cost '{}' must be a number greater than zero", input.cost.trim()),
                ));
                None
            }
        };

        // 9. Coordenadas opcionales
        let pickup_coords = self.parse_leg_coordinates(
            "pickup",
            input.pickup_latitude.as_deref(),
            input.pickup_longitude.as_deref(),
            &mut errors,
            &mut warnings,
        );
        let dropoff_coords = self.parse_leg_coordinates(
            "dropoff",
            input.dropoff_latitude.as_deref(),
            input.dropoff_longitude.as_deref(),
            &mut errors,
            &mut warnings,
        );

        // 10. Ensamblar el comando solo si no hubo errores bloqueantes
        let command = if errors.is_empty() {
            match (student, driver, pickup_time, dropoff_time, start_date, end_date, kind, cost) {
                (
                    Some(student),
                    Some(driver),
                    Some(pickup_time),
                    Some(dropoff_time),
                    Some(start_date),
                    Some(end_date),
                    Some(kind),
                    Some(cost),
                ) => Some(AssignmentCommand {
                    student_id: student.id,
                    student_name: student.full_name.clone(),
                    parent_id: student.parent_id,
                    school_id: student.school_id,
                    driver_id: driver.driver_id,
                    driver_name: driver.full_name.clone(),
                    driver_email: driver.email.clone(),
                    vehicle_id: driver.vehicle_id,
                    pickup: LegSpec {
                        time: pickup_time,
                        location: input.pickup_location.trim().to_string(),
                        latitude: pickup_coords.0,
                        longitude: pickup_coords.1,
                    },
                    dropoff: LegSpec {
                        time: dropoff_time,
                        location: input.dropoff_location.trim().to_string(),
                        latitude: dropoff_coords.0,
                        longitude: dropoff_coords.1,
                    },
                    start_date,
                    end_date,
                    kind,
                    cost,
                    comments: input
                        .comments
                        .as_deref()
                        .map(str::trim)
                        .filter(|c| !c.is_empty())
                        .map(str::to_string),
                }),
                _ => None,
            }
        } else {
            None
        };

        RowVerdict {
            command,
            errors,
            warnings,
        }
    }

    fn parse_time(
        &self,
        field: &str,
        value: &str,
        errors: &mut Vec<ValidationIssue>,
    ) -> Option<NaiveTime> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        if !self.time_regex.is_match(trimmed) {
            errors.push(ValidationIssue::new(
                field,
                "format",
                format!("Time '{}' must match HH:MM (24-hour)", trimmed),
            ));
            return None;
        }
        validate_time(trimmed).ok()
    }

    fn parse_date(
        &self,
        field: &str,
        value: &str,
        errors: &mut Vec<ValidationIssue>,
    ) -> Option<NaiveDate> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        if !self.date_regex.is_match(trimmed) {
            errors.push(ValidationIssue::new(
                field,
                "format",
                format!("Date '{}' must match YYYY-MM-DD", trimmed),
            ));
            return None;
        }
        match validate_date(trimmed) {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push(ValidationIssue::new(
                    field,
                    "format",
                    format!("Date '{}' is not a valid calendar date", trimmed),
                ));
                None
            }
        }
    }

    /// Parsea el par opcional de coordenadas de un tramo. Un valor ausente
    /// se persiste como 0.0 en el Schedule.
    fn parse_leg_coordinates(
        &self,
        leg: &str,
        latitude: Option<&str>,
        longitude: Option<&str>,
        errors: &mut Vec<ValidationIssue>,
        warnings: &mut Vec<ValidationIssue>,
    ) -> (f64, f64) {
        let lat = self.parse_coordinate(&format!("{}_latitude", leg), latitude, errors);
        let lng = self.parse_coordinate(&format!("{}_longitude", leg), longitude, errors);

        if let (Some(lat), Some(lng)) = (lat, lng) {
            if validate_coordinates(lat, lng).is_err() {
                errors.push(ValidationIssue::new(
                    &format!("{}_latitude", leg),
                    "range",
                    format!("Coordinates ({}, {}) are out of range", lat, lng),
                ));
            } else if let Some(bounds) = &self.context.region_bounds {
                if !bounds.contains(lat, lng) {
                    warnings.push(ValidationIssue::new(
                        &format!("{}_latitude", leg),
                        "outside_region",
                        format!(
                            "Coordinates ({}, {}) fall outside the configured region",
                            lat, lng
                        ),
                    ));
                }
            }
        }

        (lat.unwrap_or(0.0), lng.unwrap_or(0.0))
    }

    fn parse_coordinate(
        &self,
        field: &str,
        value: Option<&str>,
        errors: &mut Vec<ValidationIssue>,
    ) -> Option<f64> {
        let trimmed = value.map(str::trim).filter(|v| !v.is_empty())?;
        match trimmed.parse::<f64>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                errors.push(ValidationIssue::new(
                    field,
                    "format",
                    format!("Coordinate '{}' must be numeric", trimmed),
                ));
                None
            }
        }
    }
}

fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn resolve_student<'a>(reference: &str, students: &'a [Student]) -> Option<&'a Student> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(id) = Uuid::parse_str(trimmed) {
        return students.iter().find(|s| s.id == id);
    }
    let needle = trimmed.to_lowercase();
    students
        .iter()
        .find(|s| s.full_name.trim().to_lowercase() == needle)
}

fn resolve_driver<'a>(reference: &str, drivers: &'a [EligibleDriver]) -> Option<&'a EligibleDriver> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(id) = Uuid::parse_str(trimmed) {
        return drivers.iter().find(|d| d.driver_id == id);
    }
    let needle = trimmed.to_lowercase();
    drivers
        .iter()
        .find(|d| d.full_name.trim().to_lowercase() == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn student(name: &str) -> Student {
        Student {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            gender: None,
            address: None,
            parent_id: Some(Uuid::new_v4()),
            school_id: Some(Uuid::new_v4()),
            created_at: Utc::now(),
        }
    }

    fn driver(name: &str, available_seats: i32) -> EligibleDriver {
        EligibleDriver {
            driver_id: Uuid::new_v4(),
            full_name: name.to_string(),
            email: Some("driver@example.com".to_string()),
            vehicle_id: Uuid::new_v4(),
            seat_count: 4,
            available_seats,
        }
    }

    fn context() -> ValidationContext {
        ValidationContext {
            today: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            high_cost_threshold: Decimal::new(50000, 2),
            region_bounds: Some(RegionBounds {
                min_latitude: 48.0,
                max_latitude: 49.5,
                min_longitude: 1.5,
                max_longitude: 3.5,
            }),
        }
    }

    fn valid_input() -> AssignmentInput {
        AssignmentInput {
            student: "Emma Durand".to_string(),
            driver: "Karim Benali".to_string(),
            pickup_location: "12 Rue des Écoles".to_string(),
            pickup_time: "07:30".to_string(),
            pickup_latitude: Some("48.85".to_string()),
            pickup_longitude: Some("2.35".to_string()),
            dropoff_location: "École Jean Moulin".to_string(),
            dropoff_time: "16:45".to_string(),
            dropoff_latitude: None,
            dropoff_longitude: None,
            start_date: "2025-01-20".to_string(),
            end_date: "2025-01-24".to_string(),
            ride_kind: "Private".to_string(),
            cost: "120.00".to_string(),
            comments: Some("Portón azul".to_string()),
        }
    }

    fn fixtures() -> (Vec<Student>, Vec<EligibleDriver>) {
        (
            vec![student("Emma Durand"), student("Lucas Moreau")],
            vec![driver("Karim Benali", 3), driver("Sofia Mendes", 0)],
        )
    }

    #[test]
    fn test_valid_row_produces_command() {
        let (students, drivers) = fixtures();
        let validator = RowValidator::new(context());
        let verdict = validator.validate(&valid_input(), &students, &drivers);

        assert!(verdict.is_valid(), "errors: {:?}", verdict.errors);
        let command = verdict.command.unwrap();
        assert_eq!(command.student_name, "Emma Durand");
        assert_eq!(command.driver_name, "Karim Benali");
        assert_eq!(command.kind, RideKind::Private);
        assert_eq!(command.pickup.latitude, 48.85);
        assert_eq!(command.dropoff.latitude, 0.0);
        assert!(verdict.warnings.is_empty());
    }

    #[test]
    fn test_name_match_is_case_insensitive_and_trimmed() {
        let (students, drivers) = fixtures();
        let validator = RowValidator::new(context());
        let mut input = valid_input();
        input.student = "  emma durand ".to_string();
        input.driver = "KARIM BENALI".to_string();

        let verdict = validator.validate(&input, &students, &drivers);
        assert!(verdict.is_valid(), "errors: {:?}", verdict.errors);
    }

    #[test]
    fn test_unknown_driver_is_blocking() {
        let (students, drivers) = fixtures();
        let validator = RowValidator::new(context());
        let mut input = valid_input();
        input.driver = "Nadie Conocido".to_string();

        let verdict = validator.validate(&input, &students, &drivers);
        assert!(!verdict.is_valid());
        assert!(verdict
            .errors
            .iter()
            .any(|e| e.field == "driver" && e.code == "entity_not_found"));
    }

    #[test]
    fn test_driver_without_seats_is_blocking() {
        let (students, drivers) = fixtures();
        let validator = RowValidator::new(context());
        let mut input = valid_input();
        input.driver = "Sofia Mendes".to_string();

        let verdict = validator.validate(&input, &students, &drivers);
        assert!(!verdict.is_valid());
        let capacity = verdict
            .errors
            .iter()
            .find(|e| e.code == "capacity")
            .expect("capacity error");
        assert!(capacity.message.contains("0/4"));
    }

    #[test]
    fn test_time_format_boundaries() {
        let (students, drivers) = fixtures();
        let validator = RowValidator::new(context());

        for bad in ["7:30", "25:00", "07:60", "0730"] {
            let mut input = valid_input();
            input.pickup_time = bad.to_string();
            let verdict = validator.validate(&input, &students, &drivers);
            assert!(
                verdict.errors.iter().any(|e| e.field == "pickup_time"),
                "expected rejection for {}",
                bad
            );
        }

        for good in ["07:30", "23:59", "00:00"] {
            let mut input = valid_input();
            input.pickup_time = good.to_string();
            let verdict = validator.validate(&input, &students, &drivers);
            assert!(
                !verdict.errors.iter().any(|e| e.field == "pickup_time"),
                "expected acceptance for {}",
                good
            );
        }
    }

    #[test]
    fn test_cost_boundaries() {
        let (students, drivers) = fixtures();
        let validator = RowValidator::new(context());

        for bad in ["0", "-5", "abc"] {
            let mut input = valid_input();
            input.cost = bad.to_string();
            let verdict = validator.validate(&input, &students, &drivers);
            assert!(
                verdict.errors.iter().any(|e| e.field == "cost"),
                "expected rejection for {}",
                bad
            );
        }

        let mut input = valid_input();
        input.cost = "0.01".to_string();
        let verdict = validator.validate(&input, &students, &drivers);
        assert!(!verdict.errors.iter().any(|e| e.field == "cost"));
    }

    #[test]
    fn test_high_cost_warns_without_blocking() {
        let (students, drivers) = fixtures();
        let validator = RowValidator::new(context());
        let mut input = valid_input();
        input.cost = "900.00".to_string();

        let verdict = validator.validate(&input, &students, &drivers);
        assert!(verdict.is_valid());
        assert!(verdict.warnings.iter().any(|w| w.code == "high_cost"));
    }

    #[test]
    fn test_dropoff_not_after_pickup_warns() {
        let (students, drivers) = fixtures();
        let validator = RowValidator::new(context());
        let mut input = valid_input();
        input.dropoff_time = "07:30".to_string();

        let verdict = validator.validate(&input, &students, &drivers);
        assert!(verdict.is_valid());
        assert!(verdict
            .warnings
            .iter()
            .any(|w| w.code == "dropoff_before_pickup"));
    }

    #[test]
    fn test_start_in_past_warns() {
        let (students, drivers) = fixtures();
        let validator = RowValidator::new(context());
        let mut input = valid_input();
        input.start_date = "2025-01-06".to_string();

        let verdict = validator.validate(&input, &students, &drivers);
        assert!(verdict.is_valid());
        assert!(verdict.warnings.iter().any(|w| w.code == "start_in_past"));
    }

    #[test]
    fn test_span_over_a_year_warns() {
        let (students, drivers) = fixtures();
        let validator = RowValidator::new(context());
        let mut input = valid_input();
        input.end_date = "2026-06-30".to_string();

        let verdict = validator.validate(&input, &students, &drivers);
        assert!(verdict.is_valid());
        assert!(verdict.warnings.iter().any(|w| w.code == "long_span"));
    }

    #[test]
    fn test_inverted_dates_are_blocking() {
        let (students, drivers) = fixtures();
        let validator = RowValidator::new(context());
        let mut input = valid_input();
        input.start_date = "2025-01-24".to_string();
        input.end_date = "2025-01-20".to_string();

        let verdict = validator.validate(&input, &students, &drivers);
        assert!(verdict.errors.iter().any(|e| e.code == "range"));
    }

    #[test]
    fn test_weekend_only_range_is_blocking() {
        let (students, drivers) = fixtures();
        let validator = RowValidator::new(context());
        let mut input = valid_input();
        input.start_date = "2025-01-25".to_string();
        input.end_date = "2025-01-26".to_string();

        let verdict = validator.validate(&input, &students, &drivers);
        assert!(verdict.errors.iter().any(|e| e.code == "empty_schedule"));
    }

    #[test]
    fn test_ride_kind_is_case_sensitive() {
        let (students, drivers) = fixtures();
        let validator = RowValidator::new(context());
        let mut input = valid_input();
        input.ride_kind = "private".to_string();

        let verdict = validator.validate(&input, &students, &drivers);
        assert!(verdict.errors.iter().any(|e| e.field == "ride_kind"));
    }

    #[test]
    fn test_out_of_range_coordinates_are_blocking() {
        let (students, drivers) = fixtures();
        let validator = RowValidator::new(context());
        let mut input = valid_input();
        input.pickup_latitude = Some("95.0".to_string());

        let verdict = validator.validate(&input, &students, &drivers);
        assert!(verdict
            .errors
            .iter()
            .any(|e| e.field == "pickup_latitude" && e.code == "range"));
    }

    #[test]
    fn test_coordinates_outside_region_warn() {
        let (students, drivers) = fixtures();
        let validator = RowValidator::new(context());
        let mut input = valid_input();
        input.pickup_latitude = Some("40.41".to_string());
        input.pickup_longitude = Some("-3.70".to_string());

        let verdict = validator.validate(&input, &students, &drivers);
        assert!(verdict.is_valid());
        assert!(verdict.warnings.iter().any(|w| w.code == "outside_region"));
    }

    #[test]
    fn test_missing_required_fields_collect_all_errors() {
        let (students, drivers) = fixtures();
        let validator = RowValidator::new(context());
        let input = AssignmentInput::default();

        let verdict = validator.validate(&input, &students, &drivers);
        assert!(!verdict.is_valid());
        let required = verdict.errors.iter().filter(|e| e.code == "required").count();
        assert_eq!(required, 8);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let (students, drivers) = fixtures();
        let validator = RowValidator::new(context());
        let mut input = valid_input();
        input.cost = "abc".to_string();
        input.pickup_time = "25:00".to_string();

        let first = validator.validate(&input, &students, &drivers);
        let second = validator.validate(&input, &students, &drivers);
        assert_eq!(first.errors, second.errors);
        assert_eq!(first.warnings, second.warnings);
    }
}
