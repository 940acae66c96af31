// Agent HTTP routes

use agentry_core::{Agent, AgentSummary, ModelId};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::common::{ApiResponse, ErrorResponse};
use super::error::ApiError;
use crate::services::{AgentService, SessionService};

/// Request to create a new agent
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateAgentRequest {
    /// Display name of the agent.
    #[schema(example = "Customer Support Agent")]
    pub name: String,
    /// A human-readable description of what the agent does.
    #[schema(example = "Handles customer inquiries")]
    pub description: Option<String>,
    /// Instructions that frame every reply. At least 10 characters.
    #[schema(example = "You are a helpful customer support agent. Be polite and professional.")]
    pub behavior: String,
    /// One of the ids returned by `GET /api/models`.
    #[schema(example = "gpt-4o")]
    pub model: String,
}

/// Request to prompt an agent once, without a session
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct PromptRequest {
    #[schema(example = "How do I reset my password?")]
    pub message: String,
    /// Free-form context handed to the inference backend.
    #[schema(value_type = Option<Object>)]
    pub context: Option<serde_json::Value>,
}

/// Fields echoed back after creating an agent
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAgent {
    pub id: String,
    pub name: String,
    pub description: String,
    pub model: ModelId,
    pub created_at: DateTime<Utc>,
}

impl From<Agent> for CreatedAgent {
    fn from(agent: Agent) -> Self {
        Self {
            id: agent.id,
            name: agent.name,
            description: agent.description,
            model: agent.model,
            created_at: agent.created_at,
        }
    }
}

/// Result of a stateless prompt
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptResponse {
    pub agent_id: String,
    pub message: String,
    pub response: String,
    pub model: ModelId,
    pub token_count: u32,
    pub latency_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Agent fields returned when a session starts
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionAgent {
    pub name: String,
    pub model: ModelId,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatStarted {
    pub session_id: String,
    pub agent_id: String,
    pub agent: SessionAgent,
}

/// App state for agent routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AgentService>,
    pub sessions: Arc<SessionService>,
}

/// Create agent routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/agents", get(list_agents).post(create_agent))
        .route("/agents/:agent_id", get(get_agent))
        .route("/agents/:agent_id/prompt", post(prompt_agent))
        .route("/agents/:agent_id/chat/start", post(start_chat))
        .with_state(state)
}

/// GET /api/agents - List agents
#[utoipa::path(
    get,
    path = "/api/agents",
    responses(
        (status = 200, description = "Summaries of every agent", body = ApiResponse<Vec<AgentSummary>>)
    ),
    tag = "agents"
)]
pub async fn list_agents(State(state): State<AppState>) -> Json<ApiResponse<Vec<AgentSummary>>> {
    let listing = state.service.list().await;
    Json(ApiResponse::list(listing.iter().collect()))
}

/// POST /api/agents - Create a new agent
#[utoipa::path(
    post,
    path = "/api/agents",
    request_body = CreateAgentRequest,
    responses(
        (status = 201, description = "Agent created successfully", body = ApiResponse<CreatedAgent>),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "agents"
)]
pub async fn create_agent(
    State(state): State<AppState>,
    payload: Result<Json<CreateAgentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedAgent>>), ApiError> {
    let Json(req) = payload?;
    let agent = state.service.create(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(CreatedAgent::from(agent)).with_message("Agent created successfully")),
    ))
}

/// GET /api/agents/{agent_id} - Get agent by ID
#[utoipa::path(
    get,
    path = "/api/agents/{agent_id}",
    params(
        ("agent_id" = String, Path, description = "Agent ID")
    ),
    responses(
        (status = 200, description = "Agent found", body = ApiResponse<Agent>),
        (status = 404, description = "Agent not found", body = ErrorResponse)
    ),
    tag = "agents"
)]
pub async fn get_agent(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
) -> Result<Json<ApiResponse<Agent>>, ApiError> {
    let agent = state.service.get(&agent_id).await?;
    Ok(Json(ApiResponse::new(Agent::clone(&agent))))
}

/// POST /api/agents/{agent_id}/prompt - Prompt an agent without a session
#[utoipa::path(
    post,
    path = "/api/agents/{agent_id}/prompt",
    params(
        ("agent_id" = String, Path, description = "Agent ID")
    ),
    request_body = PromptRequest,
    responses(
        (status = 200, description = "Generated reply", body = ApiResponse<PromptResponse>),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Agent not found", body = ErrorResponse)
    ),
    tag = "agents"
)]
pub async fn prompt_agent(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PromptResponse>>, ApiError> {
    let Json(req) = payload?;
    let message = req.message.clone();
    let outcome = state.service.prompt(&agent_id, req).await?;

    Ok(Json(ApiResponse::new(PromptResponse {
        agent_id: outcome.agent.id.clone(),
        message,
        response: outcome.output.content,
        model: outcome.agent.model,
        token_count: outcome.output.token_count,
        latency_ms: outcome.output.latency_ms,
        timestamp: outcome.completed_at,
    })))
}

/// POST /api/agents/{agent_id}/chat/start - Start a chat session
#[utoipa::path(
    post,
    path = "/api/agents/{agent_id}/chat/start",
    params(
        ("agent_id" = String, Path, description = "Agent ID")
    ),
    responses(
        (status = 201, description = "Chat session started", body = ApiResponse<ChatStarted>),
        (status = 404, description = "Agent not found", body = ErrorResponse)
    ),
    tag = "chat"
)]
pub async fn start_chat(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<ChatStarted>>), ApiError> {
    let started = state.sessions.start(&agent_id).await?;

    let data = ChatStarted {
        session_id: started.session.id,
        agent_id: started.agent.id.clone(),
        agent: SessionAgent {
            name: started.agent.name.clone(),
            model: started.agent.model,
        },
    };
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(data).with_message("Chat session started")),
    ))
}
