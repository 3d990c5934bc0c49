//! Collaborator traits for the agent builder.
//!
//! The builder itself is deterministic; everything stateful or remote sits
//! behind one of these three seams:
//!
//! - `SessionStore`      — persists builder sessions between answers
//! - `AgentStore`        — receives the finished agent record
//! - `CallFlowGenerator` — expands the collected answers into a call flow
//!
//! Implementations live in `voxspec-store` and `voxspec-openai`; tests use
//! hand-written mocks.

use voxspec_contracts::{
    builder::{AgentId, AgentRecord, BuilderSession, SessionId},
    error::VoxspecResult,
    spec::{CallFlow, CallFlowRequest},
};

/// Storage for builder sessions, one record per session id.
pub trait SessionStore: Send + Sync {
    /// Load the session stored under `id`, or `None` if there is none.
    fn load(&self, id: &SessionId) -> VoxspecResult<Option<BuilderSession>>;

    /// The most recently updated active session started by `user_id`.
    fn find_active_by_user(&self, user_id: &str) -> VoxspecResult<Option<BuilderSession>>;

    /// Insert or replace `session` under its id.
    fn save(&self, session: &BuilderSession) -> VoxspecResult<()>;
}

/// Storage for completed agents.
pub trait AgentStore: Send + Sync {
    /// Persist a new agent. Fails if the id is already taken.
    fn create(&self, record: &AgentRecord) -> VoxspecResult<()>;

    fn get(&self, id: &AgentId) -> VoxspecResult<Option<AgentRecord>>;
}

/// The single non-deterministic step of the builder.
///
/// Implementations may block on the network. The builder runs each call on
/// a worker thread so it can enforce a timeout, hence `Send + Sync`.
pub trait CallFlowGenerator: Send + Sync {
    /// Expand `request` into a call flow.
    ///
    /// A reply that parses but is missing fields should come back as a
    /// `CallFlow` with empty strings, not as an error; the builder's
    /// completeness check decides what to do with it.
    fn generate(&self, request: &CallFlowRequest) -> VoxspecResult<CallFlow>;
}
