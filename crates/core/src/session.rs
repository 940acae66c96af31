// Chat session domain types
//
// A ChatSession is an append-only conversation bound to one Agent.
// History is never reordered or truncated in storage; only the views handed
// back to callers are windowed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Number of trailing messages returned alongside a chat reply.
pub const HISTORY_WINDOW: usize = 10;

/// Session status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Active,
    Closed,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Input from the user
    User,
    /// Reply produced by the agent
    Agent,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Agent => write!(f, "agent"),
        }
    }
}

/// A single entry in a session history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: MessageRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Only present on agent messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u32>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
            timestamp: Utc::now(),
            token_count: None,
        }
    }

    pub fn agent(text: impl Into<String>, token_count: u32) -> Self {
        Self {
            role: MessageRole::Agent,
            text: text.into(),
            timestamp: Utc::now(),
            token_count: Some(token_count),
        }
    }
}

/// Conversation between a user and one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    /// Back-reference to the agent; validated once at creation
    pub agent_id: String,
    #[serde(default)]
    pub history: Vec<Message>,
    pub started_at: DateTime<Utc>,
    pub status: SessionStatus,
}

impl ChatSession {
    pub fn new(id: String, agent_id: String, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            agent_id,
            history: Vec::new(),
            started_at,
            status: SessionStatus::Active,
        }
    }

    /// Append a message at the end of the history.
    pub fn append(&mut self, message: Message) {
        self.history.push(message);
    }

    /// The last `n` messages in arrival order.
    pub fn tail(&self, n: usize) -> &[Message] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    /// The windowed history view returned to API callers.
    pub fn recent_history(&self) -> Vec<Message> {
        self.tail(HISTORY_WINDOW).to_vec()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(n: usize) -> ChatSession {
        let mut session = ChatSession::new("chat_1".into(), "agent_1".into(), Utc::now());
        for i in 0..n {
            session.append(Message::user(format!("message {i}")));
        }
        session
    }

    #[test]
    fn test_tail_shorter_than_window() {
        let session = session_with(3);
        assert_eq!(session.recent_history().len(), 3);
        assert_eq!(session.tail(10)[0].text, "message 0");
    }

    #[test]
    fn test_tail_keeps_last_messages_in_order() {
        let session = session_with(15);
        let window = session.recent_history();
        assert_eq!(window.len(), HISTORY_WINDOW);
        assert_eq!(window[0].text, "message 5");
        assert_eq!(window[9].text, "message 14");
        // Storage keeps everything
        assert_eq!(session.len(), 15);
    }

    #[test]
    fn test_empty_session() {
        let session = session_with(0);
        assert!(session.is_empty());
        assert!(session.tail(HISTORY_WINDOW).is_empty());
        assert_eq!(session.status, SessionStatus::Active);
    }

    #[test]
    fn test_message_serialization() {
        let user = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(user["role"], "user");
        assert!(user.get("tokenCount").is_none());

        let agent = serde_json::to_value(Message::agent("hello", 42)).unwrap();
        assert_eq!(agent["role"], "agent");
        assert_eq!(agent["tokenCount"], 42);
    }
}
