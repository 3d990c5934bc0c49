//! Agent specification types.
//!
//! `AgentSpec` is the canonical, fully-typed description of a voice agent.
//! `PartialAgentSpec` is the same shape with every field optional; it is what
//! a builder session accumulates one answer at a time and what gets persisted
//! as `collected_data`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The five-part conversation script compiled into the final prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFlow {
    pub introduction: String,
    pub verification: String,
    pub purpose: String,
    /// Ordered questions the agent asks. May be empty.
    pub information_gathering: Vec<String>,
    pub closing: String,
}

impl CallFlow {
    /// True when the four scripted lines carry text.
    ///
    /// `information_gathering` may be empty; an empty question list is a valid
    /// script, an empty introduction is not.
    pub fn is_complete(&self) -> bool {
        [
            &self.introduction,
            &self.verification,
            &self.purpose,
            &self.closing,
        ]
        .iter()
        .all(|s| !s.trim().is_empty())
    }
}

/// Structured configuration of a voice agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Domain or industry (e.g. "banking").
    pub business_type: String,
    /// Job title or persona (e.g. "loan advisor").
    pub agent_role: String,
    /// One-sentence primary goal.
    pub objective: String,
    /// Style descriptor (e.g. "professional and warm").
    pub tone: String,
    /// Hard rules. Empty means "no constraints".
    pub constraints: Vec<String>,
    pub call_flow: CallFlow,
}

impl AgentSpec {
    /// Completeness gate checked by callers before compilation.
    ///
    /// The typed struct always carries `constraints` and a `call_flow`, so only
    /// the scalar fields can be missing here.
    pub fn is_complete(&self) -> bool {
        [
            &self.business_type,
            &self.agent_role,
            &self.objective,
            &self.tone,
        ]
        .iter()
        .all(|s| !s.trim().is_empty())
    }
}

/// A call flow as it appears inside persisted `collected_data`.
///
/// Every field is optional so that a stored document missing a key still
/// deserializes; the builder treats absent keys as "not yet generated".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialCallFlow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information_gathering: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing: Option<String>,
}

impl PartialCallFlow {
    /// Convert into a typed `CallFlow` when every sub-field is present and
    /// the result passes `CallFlow::is_complete`.
    pub fn to_complete(&self) -> Option<CallFlow> {
        let flow = CallFlow {
            introduction: self.introduction.clone()?,
            verification: self.verification.clone()?,
            purpose: self.purpose.clone()?,
            information_gathering: self.information_gathering.clone()?,
            closing: self.closing.clone()?,
        };
        flow.is_complete().then_some(flow)
    }

    pub fn is_complete(&self) -> bool {
        self.to_complete().is_some()
    }
}

impl From<CallFlow> for PartialCallFlow {
    fn from(flow: CallFlow) -> Self {
        Self {
            introduction: Some(flow.introduction),
            verification: Some(flow.verification),
            purpose: Some(flow.purpose),
            information_gathering: Some(flow.information_gathering),
            closing: Some(flow.closing),
        }
    }
}

/// The answers a builder session has collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialAgentSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    /// `None` means "not yet answered"; `Some(vec![])` means "no constraints".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_flow: Option<PartialCallFlow>,
}

impl PartialAgentSpec {
    /// Build the typed spec once everything has been collected.
    ///
    /// Returns `None` while any scalar is blank, constraints are unanswered, or
    /// the call flow is absent or incomplete.
    pub fn to_spec(&self) -> Option<AgentSpec> {
        let filled = |v: &Option<String>| {
            v.as_ref()
                .filter(|s| !s.trim().is_empty())
                .cloned()
        };
        Some(AgentSpec {
            business_type: filled(&self.business_type)?,
            agent_role: filled(&self.agent_role)?,
            objective: filled(&self.objective)?,
            tone: filled(&self.tone)?,
            constraints: self.constraints.clone()?,
            call_flow: self.call_flow.as_ref()?.to_complete()?,
        })
    }
}

impl From<AgentSpec> for PartialAgentSpec {
    fn from(spec: AgentSpec) -> Self {
        Self {
            business_type: Some(spec.business_type),
            agent_role: Some(spec.agent_role),
            objective: Some(spec.objective),
            tone: Some(spec.tone),
            constraints: Some(spec.constraints),
            call_flow: Some(spec.call_flow.into()),
        }
    }
}

/// The collected answers a call-flow generator expands into a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFlowRequest {
    pub business_type: String,
    pub agent_role: String,
    pub objective: String,
    pub tone: String,
    pub constraints: Vec<String>,
}

impl CallFlowRequest {
    /// `None` until every scalar is filled and constraints are answered.
    pub fn from_partial(data: &PartialAgentSpec) -> Option<Self> {
        let filled = |v: &Option<String>| v.as_ref().filter(|s| !s.trim().is_empty()).cloned();
        Some(Self {
            business_type: filled(&data.business_type)?,
            agent_role: filled(&data.agent_role)?,
            objective: filled(&data.objective)?,
            tone: filled(&data.tone)?,
            constraints: data.constraints.clone()?,
        })
    }
}

/// Prior-conversation context injected into a compiled prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Additional key-value context (preferences, last booking, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl MemoryContext {
    /// Context carrying only a summary string.
    pub fn with_summary(summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            extra: BTreeMap::new(),
        }
    }

    /// Build a summary from a stored JSON value.
    ///
    /// Strings are used verbatim; any other value is pretty-printed.
    pub fn from_summary_value(value: &serde_json::Value) -> Self {
        let summary = match value {
            serde_json::Value::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        };
        Self::with_summary(summary)
    }

    /// The trimmed summary, or `None` when absent or blank.
    pub fn summary_text(&self) -> Option<&str> {
        self.summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
