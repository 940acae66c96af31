// Agent domain types
//
// These types represent the Agent entity, its settings and the read-only
// projection returned by listings. Used by the store, services and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm_models::ModelId;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Agent status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Active,
    Inactive,
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentStatus::Active => write!(f, "active"),
            AgentStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// Generation settings attached to every agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AgentSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    pub streaming: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2000,
            streaming: false,
        }
    }
}

/// A named configuration that frames response generation.
///
/// Agents are immutable once stored; the store hands out clones or shared
/// handles, never mutable access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub behavior: String,
    pub model: ModelId,
    pub created_at: DateTime<Utc>,
    pub status: AgentStatus,
    #[serde(default)]
    pub skills: Vec<String>,
    pub settings: AgentSettings,
}

impl Agent {
    /// Build a fresh agent from validated input.
    pub fn new(id: String, input: NewAgent, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description.unwrap_or_default(),
            behavior: input.behavior,
            model: input.model,
            created_at,
            status: AgentStatus::Active,
            skills: Vec::new(),
            settings: AgentSettings::default(),
        }
    }

    /// Listing projection. Behavior and settings are deliberately absent.
    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            model: self.model,
            created_at: self.created_at,
            status: self.status,
        }
    }
}

/// Validated input for creating an agent.
#[derive(Debug, Clone)]
pub struct NewAgent {
    pub name: String,
    pub description: Option<String>,
    pub behavior: String,
    pub model: ModelId,
}

/// Public summary of an agent, as returned by listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AgentSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub model: ModelId,
    pub created_at: DateTime<Utc>,
    pub status: AgentStatus,
}
