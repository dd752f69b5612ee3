use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::driver::EligibleDriver;
use crate::models::student::Student;
use crate::services::row_validator::{AssignmentInput, ValidationIssue};

// Request para crear una asignación individual. Los valores llegan como
// strings de formulario; la validación profunda la hace el RowValidator.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssignmentRequest {
    #[validate(length(min = 1))]
    pub student: String,

    #[validate(length(min = 1))]
    pub driver: String,

    #[validate(length(min = 1))]
    pub pickup_location: String,

    #[validate(length(min = 1))]
    pub pickup_time: String,

    pub pickup_latitude: Option<String>,
    pub pickup_longitude: Option<String>,

    #[validate(length(min = 1))]
    pub dropoff_location: String,

    #[validate(length(min = 1))]
    pub dropoff_time: String,

    pub dropoff_latitude: Option<String>,
    pub dropoff_longitude: Option<String>,

    #[validate(length(min = 1))]
    pub start_date: String,

    #[validate(length(min = 1))]
    pub end_date: String,

    #[validate(length(min = 1))]
    pub ride_kind: String,

    #[validate(length(min = 1))]
    pub cost: String,

    pub comments: Option<String>,
}

impl CreateAssignmentRequest {
    pub fn into_input(self) -> AssignmentInput {
        AssignmentInput {
            student: self.student,
            driver: self.driver,
            pickup_location: self.pickup_location,
            pickup_time: self.pickup_time,
            pickup_latitude: self.pickup_latitude,
            pickup_longitude: self.pickup_longitude,
            dropoff_location: self.dropoff_location,
            dropoff_time: self.dropoff_time,
            dropoff_latitude: self.dropoff_latitude,
            dropoff_longitude: self.dropoff_longitude,
            start_date: self.start_date,
            end_date: self.end_date,
            ride_kind: self.ride_kind,
            cost: self.cost,
            comments: self.comments,
        }
    }
}

// Response de asignación individual
#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ride_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ValidationIssue>,
}

impl AssignmentResponse {
    pub fn assigned(ride_id: Uuid, warnings: Vec<ValidationIssue>) -> Self {
        Self {
            success: true,
            message: "Ride assigned successfully".to_string(),
            ride_id: Some(ride_id),
            errors: Vec::new(),
            warnings,
        }
    }

    pub fn rejected(errors: Vec<ValidationIssue>, warnings: Vec<ValidationIssue>) -> Self {
        Self {
            success: false,
            message: format!("Assignment rejected with {} validation errors", errors.len()),
            ride_id: None,
            errors,
            warnings,
        }
    }
}

// Datos de referencia para poblar los selectores del formulario
#[derive(Debug, Serialize)]
pub struct ReferenceDataResponse {
    pub students: Vec<Student>,
    pub drivers: Vec<EligibleDriver>,
}
