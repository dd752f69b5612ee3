use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::assignment_controller::AssignmentController;
use crate::controllers::bulk_controller::BulkController;
use crate::dto::assignment_dto::{
    AssignmentResponse, CreateAssignmentRequest, ReferenceDataResponse,
};
use crate::dto::bulk_dto::BulkUploadResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_assignment_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_assignment))
        .route("/bulk", post(bulk_upload))
        .route("/reference", get(reference_data))
}

async fn create_assignment(
    State(state): State<AppState>,
    Json(request): Json<CreateAssignmentRequest>,
) -> Result<Json<AssignmentResponse>, AppError> {
    let controller =
        AssignmentController::new(state.pool.clone(), &state.assignment, state.notifier.clone());
    let response = controller.assign(request).await?;
    Ok(Json(response))
}

/// El cuerpo es el texto delimitado tal cual se subió
async fn bulk_upload(
    State(state): State<AppState>,
    payload: String,
) -> Result<Json<BulkUploadResponse>, AppError> {
    let controller =
        BulkController::new(state.pool.clone(), &state.assignment, state.notifier.clone());
    let response = controller.process_upload(payload).await?;
    Ok(Json(response))
}

async fn reference_data(
    State(state): State<AppState>,
) -> Result<Json<ReferenceDataResponse>, AppError> {
    let controller =
        AssignmentController::new(state.pool.clone(), &state.assignment, state.notifier.clone());
    let response = controller.reference_data().await?;
    Ok(Json(response))
}
