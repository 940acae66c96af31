// System status snapshot
//
// Counts come from the store; process memory from sysinfo.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System};
use utoipa::ToSchema;

use crate::storage::InMemoryStore;

/// Process memory usage in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    pub resident_bytes: u64,
    pub virtual_bytes: u64,
}

/// Point-in-time view of the running service.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    #[schema(example = "0.1.0")]
    pub version: String,
    #[schema(example = "operational")]
    pub status: String,
    pub active_agents: usize,
    pub chat_sessions: usize,
    pub uptime_seconds: u64,
    /// Null only when the platform cannot report on the current process
    pub memory: Option<MemoryUsage>,
    pub timestamp: DateTime<Utc>,
}

pub struct SystemService {
    store: Arc<InMemoryStore>,
    started_at: Instant,
    pid: Pid,
    system: Mutex<System>,
}

impl SystemService {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        let system = System::new_with_specifics(
            RefreshKind::new().with_processes(ProcessRefreshKind::new().with_memory()),
        );

        Self {
            store,
            started_at: Instant::now(),
            pid: Pid::from_u32(std::process::id()),
            system: Mutex::new(system),
        }
    }

    pub fn status(&self) -> SystemStatus {
        SystemStatus {
            version: env!("CARGO_PKG_VERSION").to_string(),
            status: "operational".to_string(),
            active_agents: self.store.agent_count(),
            chat_sessions: self.store.session_count(),
            uptime_seconds: self.started_at.elapsed().as_secs(),
            memory: self.memory_usage(),
            timestamp: Utc::now(),
        }
    }

    fn memory_usage(&self) -> Option<MemoryUsage> {
        let mut system = self.system.lock();
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[self.pid]),
            true,
            ProcessRefreshKind::new().with_memory(),
        );

        system.process(self.pid).map(|process| MemoryUsage {
            resident_bytes: process.memory(),
            virtual_bytes: process.virtual_memory(),
        })
    }
}
