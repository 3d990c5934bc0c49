//! # voxspec-callflow
//!
//! The model-facing half of call-flow generation, without any transport.
//!
//! [`render_generation_prompt`] turns the collected builder answers into the
//! user message sent to a chat model. [`sanitise_call_flow_response`] turns
//! whatever the model answered into a typed `CallFlow`, tolerating prose
//! around the JSON and coercing mistyped fields.
//!
//! Any transport (see `voxspec-openai`) can combine the two.

pub mod request;
pub mod sanitise;

pub use request::{render_generation_prompt, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
pub use sanitise::{
    call_flow_schema, extract_json_object, sanitise_call_flow_response, SanitisedCallFlow,
};

// ── Tests ─────────────────────────────────────────────────────────────────────
