use axum::extract::State;
use axum::{routing::get, Json, Router};
use devices_core::health::HealthReport;
use serde::Serialize;

use crate::state::AppState;

/// Root greeting payload.
#[derive(Serialize)]
pub struct HelloResponse {
    pub message: &'static str,
}

/// GET / -- liveness greeting.
async fn hello_world() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello World",
    })
}

/// GET /health -- storage connectivity and pool statistics.
///
/// Always 200; a broken database shows up as `"status": "down"`.
async fn health_check(State(state): State<AppState>) -> Json<HealthReport> {
    let report = state.repo.health().await;

    if report.get("status").map(String::as_str) != Some("up") {
        tracing::warn!(?report, "Storage reported unhealthy");
    }

    Json(report)
}

/// Mount root-level routes (NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(hello_world))
        .route("/health", get(health_check))
}
