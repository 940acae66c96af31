// Session service for business logic

use agentry_core::{Agent, ChatSession, Result};
use std::sync::Arc;

use crate::storage::InMemoryStore;

/// A freshly started session together with the agent it is bound to.
#[derive(Debug, Clone)]
pub struct StartedSession {
    pub session: ChatSession,
    pub agent: Arc<Agent>,
}

pub struct SessionService {
    store: Arc<InMemoryStore>,
}

impl SessionService {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    /// Start an empty chat session for an existing agent.
    pub async fn start(&self, agent_id: &str) -> Result<StartedSession> {
        let agent = self.store.get_agent(agent_id).await?;
        let session = self.store.create_session(&agent.id).await?;
        tracing::info!(session_id = %session.id, agent_id = %agent.id, "Chat session started");
        Ok(StartedSession { session, agent })
    }

    pub async fn get(&self, session_id: &str) -> Result<ChatSession> {
        self.store.get_session(session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentry_core::{Error, ModelId, NewAgent, SequentialIds};

    #[tokio::test]
    async fn test_start_requires_existing_agent() {
        let store = Arc::new(InMemoryStore::with_id_generator(Arc::new(
            SequentialIds::new(),
        )));
        let service = SessionService::new(store.clone());

        let err = service.start("agent_1").await.unwrap_err();
        assert!(matches!(err, Error::AgentNotFound(_)));

        store
            .create_agent(NewAgent {
                name: "Guide".to_string(),
                description: None,
                behavior: "Walks users through setup".to_string(),
                model: ModelId::Claude3Sonnet,
            })
            .await
            .unwrap();

        let started = service.start("agent_1").await.unwrap();
        assert_eq!(started.session.agent_id, "agent_1");
        assert_eq!(started.agent.model, ModelId::Claude3Sonnet);
        assert!(service.get(&started.session.id).await.unwrap().is_empty());
    }
}
