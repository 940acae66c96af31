// OpenAPI specification generation
//
// This module defines the OpenAPI spec for the Agentry API.
// It is served by Swagger UI and printed by the export-openapi binary.
// Schemas referenced by the paths are collected automatically.

use crate::api;
use agentry_core::{
    AgentSettings, AgentStatus, FieldError, LlmProviderType, MessageRole, ModelId, SessionStatus,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the Agentry API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::agents::list_agents,
        api::agents::create_agent,
        api::agents::get_agent,
        api::agents::prompt_agent,
        api::agents::start_chat,
        api::chat::send_message,
        api::chat::get_session,
        api::llm_models::list_models,
        api::system::get_status,
        api::system::health,
    ),
    components(
        schemas(
            ModelId, LlmProviderType, AgentStatus, AgentSettings,
            SessionStatus, MessageRole, FieldError,
            api::ErrorResponse,
        )
    ),
    tags(
        (name = "agents", description = "Agent management endpoints"),
        (name = "chat", description = "Chat session endpoints"),
        (name = "models", description = "Supported model catalog"),
        (name = "system", description = "Status and health endpoints")
    ),
    info(
        title = "Agentry API",
        description = "In-memory agents and chat sessions with simulated inference",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> serde_json::Result<String> {
        Self::openapi().to_pretty_json()
    }
}
