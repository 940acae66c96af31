// Chat session HTTP routes

use agentry_core::{ChatSession, Message};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::common::{ApiResponse, ErrorResponse};
use super::error::ApiError;
use crate::services::{MessageService, SessionService};

/// Request to send a message in a chat session
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SendMessageRequest {
    #[schema(example = "Can you help me with my order?")]
    pub message: String,
}

/// Reply to a chat message
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub session_id: String,
    pub response: String,
    /// The last 10 messages of the session, oldest first
    pub history: Vec<Message>,
    pub token_count: u32,
}

/// App state for chat routes
#[derive(Clone)]
pub struct AppState {
    pub messages: Arc<MessageService>,
    pub sessions: Arc<SessionService>,
}

/// Create chat routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/chat/:session_id", get(get_session))
        .route("/chat/:session_id/message", post(send_message))
        .with_state(state)
}

/// POST /api/chat/{session_id}/message - Send a message
#[utoipa::path(
    post,
    path = "/api/chat/{session_id}/message",
    params(
        ("session_id" = String, Path, description = "Chat session ID")
    ),
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Agent reply and recent history", body = ApiResponse<ChatReply>),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Chat session not found", body = ErrorResponse)
    ),
    tag = "chat"
)]
pub async fn send_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ChatReply>>, ApiError> {
    let Json(req) = payload?;
    let turn = state.messages.send(&session_id, req).await?;

    Ok(Json(ApiResponse::new(ChatReply {
        session_id: turn.session_id,
        response: turn.response,
        history: turn.history,
        token_count: turn.token_count,
    })))
}

/// GET /api/chat/{session_id} - Get a session with its full history
#[utoipa::path(
    get,
    path = "/api/chat/{session_id}",
    params(
        ("session_id" = String, Path, description = "Chat session ID")
    ),
    responses(
        (status = 200, description = "Chat session found", body = ApiResponse<ChatSession>),
        (status = 404, description = "Chat session not found", body = ErrorResponse)
    ),
    tag = "chat"
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<ChatSession>>, ApiError> {
    let session = state.sessions.get(&session_id).await?;
    Ok(Json(ApiResponse::new(session)))
}
