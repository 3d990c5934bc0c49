//! # voxspec-openai
//!
//! [`OpenAiClient`] implements `CallFlowGenerator` over the chat-completions
//! API with a blocking `reqwest` client.
//!
//! ```rust,ignore
//! use voxspec_openai::OpenAiClient;
//!
//! let generator = OpenAiClient::from_env()?; // needs OPENAI_API_KEY
//! ```

pub mod client;

pub use client::{ChatRequest, ChatResponse, OpenAiClient, OpenAiConfig, DEFAULT_BASE_URL};

// ── Tests ─────────────────────────────────────────────────────────────────────
