//! Health check endpoint.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Liveness payload identifying the service and its build version.
#[derive(Serialize)]
struct HealthBody {
    service: &'static str,
    status: &'static str,
    version: &'static str,
}

/// GET /health
async fn health_check() -> Json<HealthBody> {
    Json(HealthBody {
        service: env!("CARGO_PKG_NAME"),
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
