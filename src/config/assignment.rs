//! Configuración del flujo de asignación
//!
//! Umbrales y perillas del validador y del orquestador. "Hoy" no vive
//! acá: es una entrada explícita del contexto de validación para que el
//! validador quede puro y testeable.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::env;

use crate::services::row_validator::{RegionBounds, ValidationContext};

/// Configuración de asignaciones
#[derive(Debug, Clone)]
pub struct AssignmentConfig {
    /// Umbral de advertencia de costo inusualmente alto
    pub high_cost_threshold: Decimal,
    /// Caja regional opcional para la advertencia de coordenadas
    pub region_bounds: Option<RegionBounds>,
    /// Pausa fija entre filas de la carga masiva
    pub bulk_row_delay_ms: u64,
    /// Tope de tamaño del payload subido
    pub max_upload_bytes: usize,
    /// Gateway de entrega de notificaciones; sin URL el envío se apaga
    pub notify_gateway_url: Option<String>,
}

impl AssignmentConfig {
    pub fn from_env() -> Self {
        let region_bounds = match (
            parse_env::<f64>("REGION_MIN_LATITUDE"),
            parse_env::<f64>("REGION_MAX_LATITUDE"),
            parse_env::<f64>("REGION_MIN_LONGITUDE"),
            parse_env::<f64>("REGION_MAX_LONGITUDE"),
        ) {
            (Some(min_latitude), Some(max_latitude), Some(min_longitude), Some(max_longitude)) => {
                Some(RegionBounds {
                    min_latitude,
                    max_latitude,
                    min_longitude,
                    max_longitude,
                })
            }
            _ => None,
        };

        Self {
            high_cost_threshold: parse_env("ASSIGNMENT_HIGH_COST_THRESHOLD")
                .unwrap_or_else(|| Decimal::new(500, 0)),
            region_bounds,
            bulk_row_delay_ms: parse_env("BULK_ROW_DELAY_MS").unwrap_or(250),
            max_upload_bytes: parse_env("BULK_MAX_UPLOAD_BYTES").unwrap_or(1024 * 1024),
            notify_gateway_url: env::var("NOTIFY_GATEWAY_URL").ok(),
        }
    }

    /// Construir el contexto de validación para un "hoy" dado
    pub fn validation_context(&self, today: NaiveDate) -> ValidationContext {
        ValidationContext {
            today,
            high_cost_threshold: self.high_cost_threshold,
            region_bounds: self.region_bounds,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
