// Simulated inference
//
// Stand-in for a real model backend. It supports:
// - Template responses that mention the agent, its behavior and model
// - Fixed and echo responses for tests
// - Configurable latency simulation (random delay within a range)
// - Randomized token counts and reported latency
//
// The reported latency is independent of the actual suspension.

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::agent::Agent;
use crate::inference::{InferenceContext, InferenceGateway, InferenceOutput};

// ============================================================================
// Configuration Types
// ============================================================================

/// Response generation configuration
#[derive(Debug, Clone)]
pub enum ResponseConfig {
    /// Pick one of the built-in templates at random
    Templates,
    /// Return a fixed response
    Fixed(String),
    /// Echo back the incoming message with a prefix
    Echo,
}

/// Configuration for the simulated gateway
#[derive(Debug, Clone)]
pub struct SimulatedInferenceConfig {
    pub response: ResponseConfig,
    /// Real delay before replying, in milliseconds. `None` replies immediately.
    pub delay_ms: Option<RangeInclusive<u64>>,
    /// Range the reported token count is drawn from
    pub token_count: RangeInclusive<u32>,
    /// Range the reported latency is drawn from
    pub reported_latency_ms: RangeInclusive<u64>,
}

impl Default for SimulatedInferenceConfig {
    fn default() -> Self {
        Self {
            response: ResponseConfig::Templates,
            delay_ms: Some(1000..=3000),
            token_count: 100..=599,
            reported_latency_ms: 500..=3499,
        }
    }
}

impl SimulatedInferenceConfig {
    /// Template responses without any real delay
    pub fn instant() -> Self {
        Self {
            delay_ms: None,
            ..Default::default()
        }
    }

    /// Always answer with `response`, without delay
    pub fn fixed(response: impl Into<String>) -> Self {
        Self {
            response: ResponseConfig::Fixed(response.into()),
            ..Self::instant()
        }
    }

    /// Echo the incoming message, without delay
    pub fn echo() -> Self {
        Self {
            response: ResponseConfig::Echo,
            ..Self::instant()
        }
    }

    /// Override the real delay range. An inverted range is swapped.
    pub fn with_delay(mut self, min_ms: u64, max_ms: u64) -> Self {
        let (lo, hi) = if min_ms <= max_ms {
            (min_ms, max_ms)
        } else {
            (max_ms, min_ms)
        };
        self.delay_ms = Some(lo..=hi);
        self
    }
}

// ============================================================================
// Gateway
// ============================================================================

/// Inference gateway that fabricates replies.
#[derive(Debug, Clone, Default)]
pub struct SimulatedInference {
    config: SimulatedInferenceConfig,
}

impl SimulatedInference {
    pub fn new(config: SimulatedInferenceConfig) -> Self {
        Self { config }
    }

    fn render(&self, agent: &Agent, message: &str, template: usize) -> String {
        match &self.config.response {
            ResponseConfig::Fixed(text) => text.clone(),
            ResponseConfig::Echo => format!("Echo: {}", message),
            ResponseConfig::Templates => {
                let body = match template {
                    0 => format!(
                        "As {}, I understand your question about \"{}\". Based on my defined behavior, \"{}\", I can help you with this.",
                        agent.name, message, agent.behavior
                    ),
                    1 => format!(
                        "Processing your request with model {}. Here is my analysis of \"{}\".",
                        agent.model, message
                    ),
                    2 => "Great question. Based on my configuration and experience, I can tell you that..."
                        .to_string(),
                    _ => format!(
                        "Interesting point. Let me look at \"{}\" from my perspective as {}.",
                        message, agent.name
                    ),
                };
                format!(
                    "{} (simulated response generated at {})",
                    body,
                    Utc::now().to_rfc3339()
                )
            }
        }
    }
}

const TEMPLATE_COUNT: usize = 4;

#[async_trait]
impl InferenceGateway for SimulatedInference {
    async fn generate(
        &self,
        agent: &Agent,
        message: &str,
        context: InferenceContext<'_>,
    ) -> InferenceOutput {
        // ThreadRng is not Send; draw everything before suspending
        let (delay, template, token_count, latency_ms) = {
            let mut rng = rand::thread_rng();
            let delay = self
                .config
                .delay_ms
                .clone()
                .map(|range| Duration::from_millis(rng.gen_range(range)));
            (
                delay,
                rng.gen_range(0..TEMPLATE_COUNT),
                rng.gen_range(self.config.token_count.clone()),
                rng.gen_range(self.config.reported_latency_ms.clone()),
            )
        };

        tracing::debug!(
            agent_id = %agent.id,
            model = %agent.model,
            history_len = context.history_len(),
            delay_ms = delay.map(|d| d.as_millis() as u64).unwrap_or(0),
            "Simulating inference"
        );

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        InferenceOutput {
            content: self.render(agent, message, template),
            token_count,
            latency_ms,
        }
    }
}
