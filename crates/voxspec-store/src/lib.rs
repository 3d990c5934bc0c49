//! # voxspec-store
//!
//! In-memory session and agent stores for the agent builder.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use voxspec_core::AgentBuilder;
//! use voxspec_store::{InMemoryAgentStore, InMemorySessionStore};
//!
//! let agents = InMemoryAgentStore::new();
//! let builder = AgentBuilder::new(
//!     Box::new(InMemorySessionStore::new()),
//!     Box::new(agents.clone()),
//!     Arc::new(generator),
//! );
//! // ... drive the interview, then read back what was built:
//! let built = agents.all()?;
//! ```
//!
//! Nothing is written to disk; a process restart loses every session.

pub mod memory;

pub use memory::{InMemoryAgentStore, InMemorySessionStore};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use chrono::{Duration, Utc};
    use voxspec_contracts::{
        builder::{AgentId, BuilderSession, BuilderStatus, BuilderStep},
        error::{VoxspecError, VoxspecResult},
        spec::{CallFlow, CallFlowRequest},
    };
    use voxspec_core::{
        agent_record, AgentBuilder, AgentStore, CallFlowGenerator, SessionStore,
    };

    use super::*;

    // ── Helpers ───────────────────────────────────────────────────────────────

    struct FixedGenerator;

    impl CallFlowGenerator for FixedGenerator {
        fn generate(&self, request: &CallFlowRequest) -> VoxspecResult<CallFlow> {
            Ok(CallFlow {
                introduction: format!("Hello, this is your {}.", request.agent_role),
                verification: "Who am I speaking with?".to_string(),
                purpose: request.objective.clone(),
                information_gathering: vec![],
                closing: "Goodbye.".to_string(),
            })
        }
    }

    fn session_for(user: &str) -> BuilderSession {
        BuilderSession::start(Some(user.to_string()))
    }

    // ── 1. session store ──────────────────────────────────────────────────────

    #[test]
    fn test_save_then_load_roundtrip() {
        let store = InMemorySessionStore::new();
        let session = session_for("u1");

        assert!(store.load(&session.id).unwrap().is_none());
        store.save(&session).unwrap();

        assert_eq!(store.load(&session.id).unwrap(), Some(session));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_save_replaces_existing() {
        let store = InMemorySessionStore::new();
        let mut session = session_for("u1");
        store.save(&session).unwrap();

        session.state.current_step = BuilderStep::CollectTone;
        store.save(&session).unwrap();

        let loaded = store.load(&session.id).unwrap().unwrap();
        assert_eq!(loaded.state.current_step, BuilderStep::CollectTone);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_find_active_by_user_prefers_latest_active() {
        let store = InMemorySessionStore::new();

        let mut old = session_for("u1");
        old.updated_at = Utc::now() - Duration::minutes(10);
        let mut done = session_for("u1");
        done.state.status = BuilderStatus::Completed;
        let latest = session_for("u1");
        let other = session_for("u2");

        for s in [&old, &done, &latest, &other] {
            store.save(s).unwrap();
        }

        let found = store.find_active_by_user("u1").unwrap().unwrap();
        assert_eq!(found.id, latest.id);
        assert!(store.find_active_by_user("nobody").unwrap().is_none());
    }

    #[test]
    fn test_clones_share_records() {
        let store = InMemorySessionStore::new();
        let handle = store.clone();
        let session = session_for("u1");

        thread::spawn(move || handle.save(&session_for("u2")).unwrap())
            .join()
            .unwrap();
        store.save(&session).unwrap();

        assert_eq!(store.len().unwrap(), 2);
        assert!(!store.is_empty().unwrap());
    }

    // ── 2. agent store ────────────────────────────────────────────────────────

    #[test]
    fn test_agent_create_and_get() {
        let store = InMemoryAgentStore::new();
        let spec = serde_json::from_value(serde_json::json!({
            "business_type": "travel",
            "agent_role": "travel consultant",
            "objective": "Book trips",
            "tone": "cheerful",
            "constraints": [],
            "call_flow": {
                "introduction": "Hi!",
                "verification": "Name?",
                "purpose": "Trips.",
                "information_gathering": [],
                "closing": "Bye."
            }
        }))
        .unwrap();
        let record = agent_record(spec);

        store.create(&record).unwrap();

        assert_eq!(store.get(&record.id).unwrap(), Some(record.clone()));
        assert!(store.get(&AgentId::new()).unwrap().is_none());
        assert_eq!(store.all().unwrap(), vec![record.clone()]);

        match store.create(&record) {
            Err(VoxspecError::Store { reason }) => assert!(reason.contains("already exists")),
            other => panic!("expected Store error, got {other:?}"),
        }
    }

    // ── 3. builder over in-memory stores ──────────────────────────────────────

    #[test]
    fn test_builder_runs_against_memory_stores() {
        let sessions = InMemorySessionStore::new();
        let agents = InMemoryAgentStore::new();
        let builder = AgentBuilder::new(
            Box::new(sessions.clone()),
            Box::new(agents.clone()),
            Arc::new(FixedGenerator),
        );

        let id = builder.start(Some("u1".into())).unwrap().session.id;
        let mut last = None;
        for answer in ["healthcare", "receptionist", "Book appointments", "calm", "none"] {
            last = Some(builder.submit(&id, answer).unwrap());
        }
        let last = last.unwrap();

        assert_eq!(last.state().status, BuilderStatus::Completed);
        let stored = agents.all().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(Some(stored[0].id), last.agent_id);
        assert_eq!(
            stored[0].spec.call_flow.introduction,
            "Hello, this is your receptionist."
        );

        let persisted = sessions.load(&id).unwrap().unwrap();
        assert_eq!(persisted.agent_id, last.agent_id);
        assert!(sessions.find_active_by_user("u1").unwrap().is_none());
    }
}
