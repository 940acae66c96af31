// In-memory entity store
// Decision: Use parking_lot for the id -> record maps (short, non-async critical sections)
// Decision: Each session has a turn lock (tokio Mutex) that writers hold across inference,
// and its state behind a parking_lot Mutex that readers take without waiting on a turn
//
// All data is stored in memory and lost on restart. The store is the only
// owner of agent and session records; callers get clones or read-only views.

use agentry_core::{
    Agent, AgentSummary, ChatSession, Error, IdGenerator, IdKind, Message, NewAgent, Result,
    TimeOrderedIds, HISTORY_WINDOW,
};
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

/// One session's record plus the lock that serializes its writers.
struct SessionEntry {
    turn: Arc<tokio::sync::Mutex<()>>,
    state: Mutex<ChatSession>,
}

impl SessionEntry {
    fn new(session: ChatSession) -> Self {
        Self {
            turn: Arc::new(tokio::sync::Mutex::new(())),
            state: Mutex::new(session),
        }
    }
}

type SessionHandle = Arc<SessionEntry>;

/// Exclusive write access to one session. Other writers to the same session
/// wait until this is dropped; readers never do.
pub struct SessionTurn {
    entry: SessionHandle,
    _guard: OwnedMutexGuard<()>,
}

impl SessionTurn {
    pub fn id(&self) -> String {
        self.entry.state.lock().id.clone()
    }

    pub fn agent_id(&self) -> String {
        self.entry.state.lock().agent_id.clone()
    }

    /// Full history, oldest first.
    pub fn history(&self) -> Vec<Message> {
        self.entry.state.lock().history.clone()
    }

    /// Append one message and return the new history length.
    pub fn append(&self, message: Message) -> usize {
        let mut session = self.entry.state.lock();
        session.append(message);
        session.len()
    }

    pub fn recent_history(&self) -> Vec<Message> {
        self.entry.state.lock().recent_history()
    }
}

/// In-memory store for agents and chat sessions
pub struct InMemoryStore {
    ids: Arc<dyn IdGenerator>,
    agents: RwLock<HashMap<String, Arc<Agent>>>,
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Store with time-ordered UUID v7 ids
    pub fn new() -> Self {
        Self::with_id_generator(Arc::new(TimeOrderedIds))
    }

    pub fn with_id_generator(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            ids,
            agents: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    // ============================================
    // Agents
    // ============================================

    /// Insert a new agent under a freshly generated id.
    pub async fn create_agent(&self, input: NewAgent) -> Result<Agent> {
        let id = self.ids.next_id(IdKind::Agent);
        let agent = Agent::new(id.clone(), input, Utc::now());

        let mut agents = self.agents.write();
        if agents.contains_key(&id) {
            return Err(Error::Internal(anyhow::anyhow!(
                "id generator produced duplicate agent id {}",
                id
            )));
        }
        agents.insert(id, Arc::new(agent.clone()));
        Ok(agent)
    }

    pub async fn get_agent(&self, id: &str) -> Result<Arc<Agent>> {
        self.agents
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::agent_not_found(id))
    }

    /// Snapshot of all agents. Order is unspecified.
    pub async fn list_agents(&self) -> AgentListing {
        AgentListing {
            agents: self.agents.read().values().cloned().collect(),
        }
    }

    pub fn agent_count(&self) -> usize {
        self.agents.read().len()
    }

    // ============================================
    // Sessions
    // ============================================

    /// Start an empty session for an existing agent.
    pub async fn create_session(&self, agent_id: &str) -> Result<ChatSession> {
        // Agents are never removed, so the reference stays valid after this check
        if !self.agents.read().contains_key(agent_id) {
            return Err(Error::agent_not_found(agent_id));
        }

        let id = self.ids.next_id(IdKind::Session);
        let session = ChatSession::new(id.clone(), agent_id.to_string(), Utc::now());

        let mut sessions = self.sessions.write();
        if sessions.contains_key(&id) {
            return Err(Error::Internal(anyhow::anyhow!(
                "id generator produced duplicate session id {}",
                id
            )));
        }
        sessions.insert(id, Arc::new(SessionEntry::new(session.clone())));
        Ok(session)
    }

    /// Snapshot of a session, including its full history. Does not wait for
    /// a turn in progress; the snapshot shows whatever that turn has stored.
    pub async fn get_session(&self, id: &str) -> Result<ChatSession> {
        let handle = self.session_handle(id)?;
        let session = handle.state.lock().clone();
        Ok(session)
    }

    /// Take a session's turn lock for a multi-step update.
    pub async fn begin_turn(&self, id: &str) -> Result<SessionTurn> {
        let entry = self.session_handle(id)?;
        let guard = entry.turn.clone().lock_owned().await;
        Ok(SessionTurn {
            entry,
            _guard: guard,
        })
    }

    /// Append one message and return the windowed tail of the history.
    pub async fn append_message(&self, session_id: &str, message: Message) -> Result<Vec<Message>> {
        let turn = self.begin_turn(session_id).await?;
        turn.append(message);
        let session = turn.entry.state.lock();
        Ok(session.tail(HISTORY_WINDOW).to_vec())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    fn session_handle(&self, id: &str) -> Result<SessionHandle> {
        self.sessions
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::session_not_found(id))
    }
}

/// Point-in-time set of agents. Summaries are produced lazily and the
/// listing can be iterated any number of times.
#[derive(Debug, Clone, Default)]
pub struct AgentListing {
    agents: Vec<Arc<Agent>>,
}

impl AgentListing {
    pub fn iter(&self) -> impl Iterator<Item = AgentSummary> + '_ {
        self.agents.iter().map(|agent| agent.summary())
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
