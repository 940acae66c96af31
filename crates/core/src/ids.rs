// Identifier generation
//
// Ids are opaque strings with a kind prefix (`agent_…`, `chat_…`). The store
// asks an injected IdGenerator for them so tests can use predictable ids.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Kind of entity an id is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Agent,
    Session,
}

impl IdKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            IdKind::Agent => "agent",
            IdKind::Session => "chat",
        }
    }
}

/// Source of unique identifiers for stored entities.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self, kind: IdKind) -> String;
}

/// UUID v7 ids: millisecond timestamp plus 74 random bits.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeOrderedIds;

impl IdGenerator for TimeOrderedIds {
    fn next_id(&self, kind: IdKind) -> String {
        format!("{}_{}", kind.prefix(), Uuid::now_v7().simple())
    }
}

/// Deterministic ids (`agent_1`, `chat_2`, ...) for tests and examples.
///
/// The counter is shared across kinds.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self, kind: IdKind) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}_{}", kind.prefix(), n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_time_ordered_ids_are_unique() {
        let ids = TimeOrderedIds;
        let generated: HashSet<String> = (0..10_000).map(|_| ids.next_id(IdKind::Agent)).collect();
        assert_eq!(generated.len(), 10_000);
    }

    #[test]
    fn test_prefixes() {
        let ids = TimeOrderedIds;
        assert!(ids.next_id(IdKind::Agent).starts_with("agent_"));
        assert!(ids.next_id(IdKind::Session).starts_with("chat_"));
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new();
        assert_eq!(ids.next_id(IdKind::Agent), "agent_1");
        assert_eq!(ids.next_id(IdKind::Session), "chat_2");
        assert_eq!(ids.next_id(IdKind::Agent), "agent_3");
    }
}
