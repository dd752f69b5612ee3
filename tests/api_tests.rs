use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/assignment/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["service"], "assignment");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_assignment_endpoint_accepts_json() {
    let app = create_test_app();
    let payload = json!({
        "student": "Emma Durand",
        "driver": "Karim Benali",
        "pickup_location": "12 Rue des Écoles",
        "pickup_time": "07:30",
        "dropoff_location": "École Jean Moulin",
        "dropoff_time": "16:45",
        "start_date": "2025-01-20",
        "end_date": "2025-01-24",
        "ride_kind": "Private",
        "cost": "120.00"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/assignment")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    // No debería dar error 500
    assert_ne!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body.is_object());
    assert!(body.get("success").is_some());
}

#[tokio::test]
async fn test_bulk_endpoint_accepts_text() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/assignment/bulk")
                .header("content-type", "text/csv")
                .body(Body::from("Student Name,Driver Name\n"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_ne!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// Función helper para crear la app de test
fn create_test_app() -> Router {
    Router::new()
        .route(
            "/api/assignment/health",
            get(|| async { Json(json!({"service": "assignment", "status": "healthy"})) }),
        )
        .route(
            "/api/assignment",
            post(|| async { Json(json!({"success": false, "message": "stub"})) }),
        )
        .route(
            "/api/assignment/bulk",
            post(|| async { Json(json!({"successful": 0, "failed": 0, "errors": []})) }),
        )
}
