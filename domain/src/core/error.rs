//! Domain error types

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the dispatch core.
///
/// A command that runs and exits non-zero is *not* an error: it is returned
/// as an [`ExecutionResult`](crate::execution::ExecutionResult) with
/// `success == false` so the caller can still read its output.
///
/// | Variant | Code | Raised by |
/// |---------|------|-----------|
/// | `InvalidInput` | `INVALID_INPUT` | request validation |
/// | `NotAllowed` | `NOT_ALLOWED` | program / module / host allow-lists |
/// | `RateLimited` | `RATE_LIMITED` | admission control |
/// | `Timeout` | `TIMEOUT` | executor deadline |
/// | `SpawnFailed` | `SPAWN_FAILED` | OS process creation |
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not allowed: {0}")]
    NotAllowed(String),

    #[error("Too many commands in flight (max {max_concurrent})")]
    RateLimited { max_concurrent: usize },

    #[error("Command '{program}' timed out after {}s", .timeout.as_secs_f64())]
    Timeout { program: String, timeout: Duration },

    #[error("Failed to spawn '{program}': {message}")]
    SpawnFailed { program: String, message: String },
}

impl DispatchError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn not_allowed(message: impl Into<String>) -> Self {
        Self::NotAllowed(message.into())
    }

    /// Stable error code for protocol payloads.
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::InvalidInput(_) => "INVALID_INPUT",
            DispatchError::NotAllowed(_) => "NOT_ALLOWED",
            DispatchError::RateLimited { .. } => "RATE_LIMITED",
            DispatchError::Timeout { .. } => "TIMEOUT",
            DispatchError::SpawnFailed { .. } => "SPAWN_FAILED",
        }
    }

    /// Whether the error was raised before any process was started.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            DispatchError::InvalidInput(_)
                | DispatchError::NotAllowed(_)
                | DispatchError::RateLimited { .. }
        )
    }
}
