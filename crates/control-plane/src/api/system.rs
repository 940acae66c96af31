// System HTTP routes: status snapshot (rate limited, under the API prefix)
// and the health probe (mounted at the root by the router)

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::common::ApiResponse;
use crate::services::{SystemService, SystemStatus};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SystemService>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/status", get(get_status))
        .with_state(state)
}

/// GET /api/status - Service status snapshot
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Current counts, uptime and memory", body = ApiResponse<SystemStatus>)
    ),
    tag = "system"
)]
pub async fn get_status(State(state): State<AppState>) -> Json<ApiResponse<SystemStatus>> {
    Json(ApiResponse::new(state.service.status()))
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health - Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
