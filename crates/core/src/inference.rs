// Inference gateway
//
// The boundary between request handling and whatever produces agent replies.
// Services only see this trait; the simulator in `simulator.rs` is the default
// implementation and a real model backend can be swapped in behind it.

use async_trait::async_trait;

use crate::agent::Agent;
use crate::session::Message;

/// Extra input that accompanies a message.
#[derive(Debug, Clone, Copy)]
pub enum InferenceContext<'a> {
    /// No context supplied
    None,
    /// Caller-supplied free-form context (stateless prompts)
    Value(&'a serde_json::Value),
    /// Full conversation so far, oldest first (chat turns)
    History(&'a [Message]),
}

impl InferenceContext<'_> {
    /// Number of prior messages carried as context.
    pub fn history_len(&self) -> usize {
        match self {
            InferenceContext::History(history) => history.len(),
            _ => 0,
        }
    }
}

/// Result of one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceOutput {
    pub content: String,
    pub token_count: u32,
    pub latency_ms: u64,
}

/// Produces a reply for an agent. Always succeeds; it may suspend while the
/// reply is being generated.
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    async fn generate(
        &self,
        agent: &Agent,
        message: &str,
        context: InferenceContext<'_>,
    ) -> InferenceOutput;
}
