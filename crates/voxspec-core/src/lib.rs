//! # voxspec-core
//!
//! The agent builder: a deterministic interview that collects an agent spec
//! one answer at a time, then asks a generator for the call flow.
//!
//! - [`machine`] holds the pure step logic (effective step, questions,
//!   constraint parsing).
//! - [`AgentBuilder`] wires that logic to the [`traits`] collaborators and
//!   enforces the generation timeout and retry policy from [`retry`].

pub mod builder;
pub mod machine;
pub mod retry;
pub mod traits;

pub use builder::{agent_record, AgentBuilder, MAX_AGENT_NAME_CHARS};
pub use machine::{
    apply_answer, effective_step, next_builder_question, next_step, parse_constraints_input,
    question_for, COMPLETE_QUESTION,
};
pub use retry::{generate_with_policy, GenerationPolicy, RetryPolicy};
pub use traits::{AgentStore, CallFlowGenerator, SessionStore};

// ── Tests ─────────────────────────────────────────────────────────────────────
