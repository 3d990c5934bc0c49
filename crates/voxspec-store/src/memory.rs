//! In-memory implementations of `SessionStore` and `AgentStore`.
//!
//! Both keep their records in a map behind `Arc<Mutex<_>>`. Cloning a store
//! clones the handle, not the data, so a clone handed to `AgentBuilder` and
//! one kept by the caller observe the same records.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use voxspec_contracts::{
    builder::{AgentId, AgentRecord, BuilderSession, BuilderStatus, SessionId},
    error::{VoxspecError, VoxspecResult},
};
use voxspec_core::traits::{AgentStore, SessionStore};

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> VoxspecResult<MutexGuard<'a, T>> {
    mutex.lock().map_err(|e| VoxspecError::Store {
        reason: format!("{what} lock poisoned: {e}"),
    })
}

// ── Sessions ──────────────────────────────────────────────────────────────────

/// Builder sessions keyed by id. Saving replaces the stored copy.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, BuilderSession>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub fn len(&self) -> VoxspecResult<usize> {
        Ok(lock(&self.sessions, "session store")?.len())
    }

    pub fn is_empty(&self) -> VoxspecResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, id: &SessionId) -> VoxspecResult<Option<BuilderSession>> {
        Ok(lock(&self.sessions, "session store")?.get(id).cloned())
    }

    fn find_active_by_user(&self, user_id: &str) -> VoxspecResult<Option<BuilderSession>> {
        let sessions = lock(&self.sessions, "session store")?;
        Ok(sessions
            .values()
            .filter(|s| s.user_id.as_deref() == Some(user_id))
            .filter(|s| s.state.status == BuilderStatus::Active)
            .max_by_key(|s| s.updated_at)
            .cloned())
    }

    fn save(&self, session: &BuilderSession) -> VoxspecResult<()> {
        let mut sessions = lock(&self.sessions, "session store")?;
        sessions.insert(session.id, session.clone());
        debug!(
            session_id = %session.id,
            step = %session.state.current_step,
            "session saved"
        );
        Ok(())
    }
}

// ── Agents ────────────────────────────────────────────────────────────────────

/// Completed agents keyed by id. Records are never replaced.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentStore {
    agents: Arc<Mutex<HashMap<AgentId, AgentRecord>>>,
}

impl InMemoryAgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored agent, oldest first.
    pub fn all(&self) -> VoxspecResult<Vec<AgentRecord>> {
        let agents = lock(&self.agents, "agent store")?;
        let mut records: Vec<AgentRecord> = agents.values().cloned().collect();
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }
}

impl AgentStore for InMemoryAgentStore {
    fn create(&self, record: &AgentRecord) -> VoxspecResult<()> {
        let mut agents = lock(&self.agents, "agent store")?;
        if agents.contains_key(&record.id) {
            return Err(VoxspecError::Store {
                reason: format!("agent '{}' already exists", record.id),
            });
        }
        agents.insert(record.id, record.clone());
        debug!(agent_id = %record.id, name = %record.name, "agent stored");
        Ok(())
    }

    fn get(&self, id: &AgentId) -> VoxspecResult<Option<AgentRecord>> {
        Ok(lock(&self.agents, "agent store")?.get(id).cloned())
    }
}
