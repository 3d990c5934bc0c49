//! Error types shared by every voxspec crate.
//!
//! The pure prompt transforms never fail; everything that touches a store, a
//! configuration file, or the call-flow generator returns `VoxspecResult<T>`.

use thiserror::Error;

/// The unified error type for the voxspec workspace.
#[derive(Debug, Error)]
pub enum VoxspecError {
    /// No builder session exists under the given id.
    #[error("builder session '{session_id}' not found")]
    SessionNotFound { session_id: String },

    /// A submit request arrived without a session id.
    #[error("sessionId required for submit")]
    MissingSessionId,

    /// A persisted step name is not one of the known builder steps.
    #[error("unknown builder step '{name}'")]
    UnknownStep { name: String },

    /// The call-flow generator could not be reached or answered with an error.
    ///
    /// `status` is the HTTP status when the generator answered at all.
    #[error("call flow generation failed: {reason}")]
    CallFlowGeneration { status: Option<u16>, reason: String },

    /// The generator answered, but not with a JSON object.
    #[error("call flow response could not be parsed: {reason}")]
    CallFlowParse { reason: String },

    /// The generator did not answer within the configured timeout.
    #[error("call flow generation timed out after {timeout_ms} ms")]
    GenerationTimeout { timeout_ms: u64 },

    /// A session or agent store failed to read or write.
    #[error("store error: {reason}")]
    Store { reason: String },

    /// A configuration value or file is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// Reading an input file or stream, or writing output, failed.
    #[error("i/o error: {reason}")]
    Io { reason: String },

    /// A spec was handed to an operation that requires a complete one.
    #[error("incomplete agent spec: {reason}")]
    IncompleteSpec { reason: String },
}

impl VoxspecError {
    /// Whether retrying the same generation attempt could succeed.
    ///
    /// Connection failures, timeouts, 429 and 5xx answers are transient. A
    /// rejected request (4xx) or a reply that is not JSON will not improve on
    /// a second identical attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            VoxspecError::GenerationTimeout { .. } => true,
            VoxspecError::CallFlowGeneration { status: None, .. } => true,
            VoxspecError::CallFlowGeneration {
                status: Some(code), ..
            } => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}

/// Convenience alias used throughout the voxspec crates.
pub type VoxspecResult<T> = Result<T, VoxspecError>;
