// Message service for chat turns
// Decision: A turn holds the session's turn lock from the user append until the agent reply is stored,
// so concurrent sends to one session run one after another and each user/agent pair stays adjacent.
// Reads of the session do not take the turn lock.

use agentry_core::telemetry::{chat_span_name, gen_ai};
use agentry_core::{InferenceContext, InferenceGateway, Message, Result};
use std::sync::Arc;
use tracing::Instrument;

use crate::api::chat::SendMessageRequest;
use crate::api::validation::validate_message;
use crate::storage::InMemoryStore;

/// Outcome of one chat turn.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub session_id: String,
    pub response: String,
    /// Trailing window of the history, oldest first
    pub history: Vec<Message>,
    pub token_count: u32,
}

pub struct MessageService {
    store: Arc<InMemoryStore>,
    gateway: Arc<dyn InferenceGateway>,
}

impl MessageService {
    pub fn new(store: Arc<InMemoryStore>, gateway: Arc<dyn InferenceGateway>) -> Self {
        Self { store, gateway }
    }

    /// Append the user's message, generate a reply with the full history as
    /// context and append the reply.
    pub async fn send(&self, session_id: &str, req: SendMessageRequest) -> Result<ChatTurn> {
        validate_message(&req.message)?;

        let span = tracing::info_span!(
            "gen_ai.chat",
            "otel.name" = tracing::field::Empty,
            "otel.kind" = "client",
            "gen_ai.operation.name" = gen_ai::operation::CHAT,
            "gen_ai.conversation.id" = %session_id,
            // Filled once the session's agent is resolved
            "gen_ai.agent.id" = tracing::field::Empty,
            "gen_ai.request.model" = tracing::field::Empty,
            "gen_ai.usage.output_tokens" = tracing::field::Empty,
        );

        self.send_inner(session_id, req).instrument(span).await
    }

    async fn send_inner(&self, session_id: &str, req: SendMessageRequest) -> Result<ChatTurn> {
        let span = tracing::Span::current();

        let turn = self.store.begin_turn(session_id).await?;
        // Resolve before appending so a failed lookup leaves the history untouched
        let agent = self.store.get_agent(&turn.agent_id()).await?;

        span.record("otel.name", chat_span_name(agent.model.as_str()).as_str());
        span.record("gen_ai.agent.id", agent.id.as_str());
        span.record("gen_ai.request.model", agent.model.as_str());

        turn.append(Message::user(req.message.as_str()));
        let history = turn.history();
        let output = self
            .gateway
            .generate(&agent, &req.message, InferenceContext::History(&history))
            .await;
        span.record("gen_ai.usage.output_tokens", output.token_count);

        let history_len = turn.append(Message::agent(output.content.as_str(), output.token_count));
        tracing::debug!(history_len, "Chat turn stored");

        Ok(ChatTurn {
            session_id: turn.id(),
            response: output.content,
            history: turn.recent_history(),
            token_count: output.token_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentry_core::{
        Error, MessageRole, ModelId, NewAgent, SequentialIds, SimulatedInference,
        SimulatedInferenceConfig, HISTORY_WINDOW,
    };

    async fn setup() -> (MessageService, Arc<InMemoryStore>, String) {
        let store = Arc::new(InMemoryStore::with_id_generator(Arc::new(
            SequentialIds::new(),
        )));
        let agent = store
            .create_agent(NewAgent {
                name: "Echo".to_string(),
                description: None,
                behavior: "Repeats what it hears".to_string(),
                model: ModelId::Gpt4oMini,
            })
            .await
            .unwrap();
        let session = store.create_session(&agent.id).await.unwrap();
        let gateway = Arc::new(SimulatedInference::new(SimulatedInferenceConfig::echo()));
        (
            MessageService::new(store.clone(), gateway),
            store,
            session.id,
        )
    }

    fn request(message: &str) -> SendMessageRequest {
        SendMessageRequest {
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_turn_appends_user_and_agent_messages() {
        let (service, store, session_id) = setup().await;

        let turn = service.send(&session_id, request("hi")).await.unwrap();
        assert_eq!(turn.response, "Echo: hi");
        assert_eq!(turn.history.len(), 2);
        assert_eq!(turn.history[0].role, MessageRole::User);
        assert_eq!(turn.history[1].role, MessageRole::Agent);
        assert_eq!(turn.history[1].token_count, Some(turn.token_count));

        assert_eq!(store.get_session(&session_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_history_window_in_response() {
        let (service, store, session_id) = setup().await;

        let mut turn = None;
        for i in 0..8 {
            turn = Some(service.send(&session_id, request(&format!("m{i}"))).await.unwrap());
        }
        let turn = turn.unwrap();
        assert_eq!(turn.history.len(), HISTORY_WINDOW);
        assert_eq!(turn.history.last().unwrap().text, "Echo: m7");
        assert_eq!(store.get_session(&session_id).await.unwrap().len(), 16);
    }

    #[tokio::test]
    async fn test_missing_session_and_empty_message() {
        let (service, store, session_id) = setup().await;

        let err = service.send("chat_missing", request("hi")).await.unwrap_err();
        assert!(matches!(err, Error::SessionNotFound(_)));

        let err = service.send(&session_id, request("")).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        assert!(store.get_session(&session_id).await.unwrap().is_empty());
    }
}
