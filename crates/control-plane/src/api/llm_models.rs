// LLM Model API endpoints
//
// The catalog is static; no state is needed.

use agentry_core::{catalog, ModelDescriptor};
use axum::{routing::get, Json, Router};

use super::common::ApiResponse;

pub fn routes() -> Router {
    Router::new().route("/models", get(list_models))
}

/// GET /api/models - List supported models
#[utoipa::path(
    get,
    path = "/api/models",
    responses(
        (status = 200, description = "Model catalog", body = ApiResponse<Vec<ModelDescriptor>>)
    ),
    tag = "models"
)]
pub async fn list_models() -> Json<ApiResponse<Vec<ModelDescriptor>>> {
    Json(ApiResponse::new(catalog()))
}
