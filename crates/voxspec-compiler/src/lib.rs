//! # voxspec-compiler
//!
//! Deterministic system-prompt compilation for structured agent specs.
//!
//! - [`compile_system_prompt`] renders an `AgentSpec` (+ optional memory)
//!   through a fixed template.
//! - [`ensure_no_role_acknowledgment`] appends the anti-meta-commentary rule;
//!   apply it to every prompt before a live model sees it.
//! - [`extract_greeting_from_compiled_prompt`] finds the opening utterance.
//! - [`runtime_prompt`] combines the above with a fallback for calls that have
//!   no complete spec.
//!
//! Every function here is pure and safe to call from any thread.

pub mod greeting;
pub mod guard;
pub mod runtime;
pub mod template;

pub use greeting::{extract_greeting_from_compiled_prompt, DEFAULT_GREETING};
pub use guard::{ensure_no_role_acknowledgment, NO_ROLE_ACKNOWLEDGMENT_RULE};
pub use runtime::{prompt_fingerprint, runtime_prompt, FALLBACK_PROMPT};
pub use template::compile_system_prompt;

// ── Tests ─────────────────────────────────────────────────────────────────────
