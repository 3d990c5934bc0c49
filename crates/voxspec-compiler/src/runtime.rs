//! Call-time prompt assembly.
//!
//! Picks the spec prompt when a complete spec is available and the fixed
//! fallback otherwise, and always applies the acknowledgment guard.

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use voxspec_contracts::spec::{AgentSpec, MemoryContext};

use crate::{guard::ensure_no_role_acknowledgment, template::compile_system_prompt};

/// Used when no complete agent spec is available for a call.
pub const FALLBACK_PROMPT: &str = "You are a helpful voice AI agent. Be concise and natural.";

/// The prompt a live model should receive for `spec` and `memory`.
pub fn runtime_prompt(spec: Option<&AgentSpec>, memory: Option<&MemoryContext>) -> String {
    let raw = match spec {
        Some(spec) if spec.is_complete() => {
            debug!(
                business_type = %spec.business_type,
                agent_role = %spec.agent_role,
                has_memory = memory.and_then(MemoryContext::summary_text).is_some(),
                "compiling spec prompt"
            );
            compile_system_prompt(spec, memory)
        }
        Some(_) => {
            warn!("agent spec is incomplete; using fallback prompt");
            FALLBACK_PROMPT.to_string()
        }
        None => FALLBACK_PROMPT.to_string(),
    };
    ensure_no_role_acknowledgment(&raw)
}

/// Lowercase hex SHA-256 of `prompt`.
///
/// Stored next to persisted agents so a changed template or spec is visible
/// without diffing the full prompt text.
pub fn prompt_fingerprint(prompt: &str) -> String {
    hex::encode(Sha256::digest(prompt.as_bytes()))
}
