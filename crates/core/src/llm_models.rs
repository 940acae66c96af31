// LLM model catalog
//
// The set of models an agent may be bound to is fixed. ModelId is the
// validated form; the catalog describes each entry for the /models endpoint.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Allowed model identifiers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum ModelId {
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    #[serde(rename = "claude-3-sonnet")]
    Claude3Sonnet,
}

impl ModelId {
    pub const ALL: [ModelId; 3] = [ModelId::Gpt4o, ModelId::Gpt4oMini, ModelId::Claude3Sonnet];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Gpt4o => "gpt-4o",
            ModelId::Gpt4oMini => "gpt-4o-mini",
            ModelId::Claude3Sonnet => "claude-3-sonnet",
        }
    }

    /// Identifiers accepted on the wire, in catalog order.
    pub fn allowed_ids() -> Vec<&'static str> {
        Self::ALL.iter().map(|m| m.as_str()).collect()
    }

    pub fn descriptor(&self) -> ModelDescriptor {
        let (name, provider, description, cost_per_token) = match self {
            ModelId::Gpt4o => (
                "GPT-4 Optimized",
                LlmProviderType::Openai,
                "Most capable model for complex tasks",
                0.00003,
            ),
            ModelId::Gpt4oMini => (
                "GPT-4 Mini",
                LlmProviderType::Openai,
                "Smaller variant tuned for speed",
                0.00001,
            ),
            ModelId::Claude3Sonnet => (
                "Claude 3 Sonnet",
                LlmProviderType::Anthropic,
                "Strong at analysis and reasoning",
                0.00002,
            ),
        };
        ModelDescriptor {
            id: *self,
            name: name.to_string(),
            provider,
            description: description.to_string(),
            cost_per_token,
        }
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("Unknown model: {}", s))
    }
}

/// LLM provider type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum LlmProviderType {
    #[serde(rename = "OpenAI")]
    Openai,
    #[serde(rename = "Anthropic")]
    Anthropic,
}

impl std::fmt::Display for LlmProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProviderType::Openai => write!(f, "openai"),
            LlmProviderType::Anthropic => write!(f, "anthropic"),
        }
    }
}

/// Catalog entry for a model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub id: ModelId,
    pub name: String,
    pub provider: LlmProviderType,
    pub description: String,
    pub cost_per_token: f64,
}

/// All models in catalog order.
pub fn catalog() -> Vec<ModelDescriptor> {
    ModelId::ALL.iter().map(ModelId::descriptor).collect()
}
