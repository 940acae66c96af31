// Agent service for business logic
// Decision: Every operation validates its input before resolving or storing anything

use agentry_core::telemetry::gen_ai;
use agentry_core::{
    Agent, InferenceContext, InferenceGateway, InferenceOutput, NewAgent, Result,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::Instrument;

use crate::api::agents::{CreateAgentRequest, PromptRequest};
use crate::api::validation::{validate_create_agent, validate_message};
use crate::storage::{AgentListing, InMemoryStore};

/// Result of a stateless prompt.
#[derive(Debug, Clone)]
pub struct PromptOutcome {
    pub agent: Arc<Agent>,
    pub output: InferenceOutput,
    pub completed_at: DateTime<Utc>,
}

pub struct AgentService {
    store: Arc<InMemoryStore>,
    gateway: Arc<dyn InferenceGateway>,
}

impl AgentService {
    pub fn new(store: Arc<InMemoryStore>, gateway: Arc<dyn InferenceGateway>) -> Self {
        Self { store, gateway }
    }

    pub async fn create(&self, req: CreateAgentRequest) -> Result<Agent> {
        let input = validate_create_agent(
            &req.name,
            req.description.as_deref(),
            &req.behavior,
            &req.model,
        )?;

        // Span name format: "create_agent {agent_name}"
        let span_name = format!("create_agent {}", input.name);
        let span = tracing::info_span!(
            "gen_ai.create_agent",
            "otel.name" = %span_name,
            "otel.kind" = "internal",
            "gen_ai.operation.name" = gen_ai::operation::CREATE_AGENT,
            "gen_ai.agent.name" = %input.name,
            "gen_ai.request.model" = %input.model,
            // Filled after creation
            "gen_ai.agent.id" = tracing::field::Empty,
        );

        self.create_inner(input).instrument(span).await
    }

    async fn create_inner(&self, input: NewAgent) -> Result<Agent> {
        let agent = self.store.create_agent(input).await?;
        tracing::Span::current().record("gen_ai.agent.id", agent.id.as_str());
        tracing::info!(agent_id = %agent.id, "Agent created");
        Ok(agent)
    }

    pub async fn get(&self, id: &str) -> Result<Arc<Agent>> {
        self.store.get_agent(id).await
    }

    pub async fn list(&self) -> AgentListing {
        self.store.list_agents().await
    }

    /// Run one generation against an agent. Nothing is stored.
    pub async fn prompt(&self, agent_id: &str, req: PromptRequest) -> Result<PromptOutcome> {
        validate_message(&req.message)?;
        let agent = self.store.get_agent(agent_id).await?;

        let span_name = format!("invoke_agent {}", agent.id);
        let span = tracing::info_span!(
            "gen_ai.invoke_agent",
            "otel.name" = %span_name,
            "otel.kind" = "client",
            "gen_ai.operation.name" = gen_ai::operation::INVOKE_AGENT,
            "gen_ai.agent.id" = %agent.id,
            "gen_ai.request.model" = %agent.model,
            "gen_ai.usage.output_tokens" = tracing::field::Empty,
        );

        Ok(self.prompt_inner(agent, req).instrument(span).await)
    }

    async fn prompt_inner(&self, agent: Arc<Agent>, req: PromptRequest) -> PromptOutcome {
        let context = match &req.context {
            Some(value) => InferenceContext::Value(value),
            None => InferenceContext::None,
        };
        let output = self.gateway.generate(&agent, &req.message, context).await;
        tracing::Span::current().record("gen_ai.usage.output_tokens", output.token_count);

        PromptOutcome {
            agent,
            output,
            completed_at: Utc::now(),
        }
    }
}
