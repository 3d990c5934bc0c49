//! Builder session and agent record types.
//!
//! A builder session is the stateful interview that fills a
//! `PartialAgentSpec` one answer at a time. These types define what the
//! session stores persist and what the builder entry point exchanges with its
//! callers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::VoxspecError,
    spec::{AgentSpec, PartialAgentSpec},
};

/// Unique identifier for one builder session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a persisted agent record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub uuid::Uuid);

impl AgentId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The closed, ordered set of interview steps.
///
/// Serialized as the snake_case names used in persisted sessions
/// (`"collect_business_type"`, ..., `"complete"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuilderStep {
    CollectBusinessType,
    CollectAgentRole,
    CollectObjective,
    CollectTone,
    CollectConstraints,
    GenerateCallFlow,
    Complete,
}

impl BuilderStep {
    /// All steps in interview order.
    pub const ORDER: [BuilderStep; 7] = [
        BuilderStep::CollectBusinessType,
        BuilderStep::CollectAgentRole,
        BuilderStep::CollectObjective,
        BuilderStep::CollectTone,
        BuilderStep::CollectConstraints,
        BuilderStep::GenerateCallFlow,
        BuilderStep::Complete,
    ];

    pub fn first() -> Self {
        Self::ORDER[0]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuilderStep::CollectBusinessType => "collect_business_type",
            BuilderStep::CollectAgentRole => "collect_agent_role",
            BuilderStep::CollectObjective => "collect_objective",
            BuilderStep::CollectTone => "collect_tone",
            BuilderStep::CollectConstraints => "collect_constraints",
            BuilderStep::GenerateCallFlow => "generate_call_flow",
            BuilderStep::Complete => "complete",
        }
    }
}

impl fmt::Display for BuilderStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuilderStep {
    type Err = VoxspecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .iter()
            .copied()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| VoxspecError::UnknownStep {
                name: s.to_string(),
            })
    }
}

/// Lifecycle status of a builder session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuilderStatus {
    Active,
    Completed,
}

/// The mutable part of a builder session.
///
/// `current_step` is a stored pointer only; readers always recompute the
/// effective step from `collected_data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderState {
    pub current_step: BuilderStep,
    pub collected_data: PartialAgentSpec,
    pub status: BuilderStatus,
}

impl BuilderState {
    /// A fresh interview: first step, nothing collected, active.
    pub fn new() -> Self {
        Self {
            current_step: BuilderStep::first(),
            collected_data: PartialAgentSpec::default(),
            status: BuilderStatus::Active,
        }
    }
}

impl Default for BuilderState {
    fn default() -> Self {
        Self::new()
    }
}

/// One persisted builder session (one row per session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderSession {
    pub id: SessionId,
    pub user_id: Option<String>,
    pub state: BuilderState,
    /// Set once the completed spec has been stored as an agent.
    pub agent_id: Option<AgentId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BuilderSession {
    pub fn start(user_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            user_id,
            state: BuilderState::new(),
            agent_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A persisted agent created from a completed spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: AgentId,
    pub name: String,
    pub description: Option<String>,
    pub spec: AgentSpec,
    pub version: u32,
    /// SHA-256 hex digest of the guarded compiled prompt for `spec`.
    pub prompt_fingerprint: String,
    pub created_at: DateTime<Utc>,
}

/// The builder entry point's request shape.
///
/// ```json
/// {"action": "start"}
/// {"action": "submit", "sessionId": "…", "message": "banking"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BuilderRequest {
    Start {
        #[serde(default, rename = "userId", skip_serializing_if = "Option::is_none")]
        user_id: Option<String>,
    },
    Submit {
        #[serde(default, rename = "sessionId")]
        session_id: Option<SessionId>,
        #[serde(default)]
        message: String,
    },
}

/// The builder entry point's reply: the session, the next question, and the
/// agent id once the build has completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderResponse {
    pub session: BuilderSession,
    pub question: String,
    #[serde(rename = "agentId")]
    pub agent_id: Option<AgentId>,
}

impl BuilderResponse {
    pub fn state(&self) -> &BuilderState {
        &self.session.state
    }
}
