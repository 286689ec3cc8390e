//! Execution requests.

use super::host::HostId;
use crate::core::error::DispatchError;
use crate::routing::Backend;
use serde::{Deserialize, Serialize};

/// A validated request to run `command` on `target_host` through `backend`.
///
/// Construction via [`new`](Self::new) guarantees a well-formed host and a
/// non-empty command without NUL bytes (which cannot be passed in `argv`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub backend: Backend,
    pub target_host: HostId,
    pub command: String,
    pub privilege_escalation: bool,
}

impl ExecutionRequest {
    pub fn new(
        backend: Backend,
        target_host: &str,
        command: impl Into<String>,
        privilege_escalation: bool,
    ) -> Result<Self, DispatchError> {
        let target_host = HostId::parse(target_host)?;
        let command = validate_command(command.into())?;

        Ok(Self {
            backend,
            target_host,
            command,
            privilege_escalation,
        })
    }
}

/// Reject empty or NUL-containing commands; return the trimmed command.
pub fn validate_command(command: String) -> Result<String, DispatchError> {
    let trimmed = command.trim();
    if trimmed.is_empty() {
        return Err(DispatchError::invalid_input("command cannot be empty"));
    }
    if trimmed.contains('\0') {
        return Err(DispatchError::invalid_input(
            "command cannot contain NUL bytes",
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        let request =
            ExecutionRequest::new(Backend::DirectExec, "web01", "  uptime \n", false).unwrap();
        assert_eq!(request.command, "uptime");
        assert_eq!(request.target_host.as_str(), "web01");
    }

    #[test]
    fn test_empty_command_rejected() {
        let err = ExecutionRequest::new(Backend::DirectExec, "web01", "   ", false).unwrap_err();
        assert_eq!(err, DispatchError::invalid_input("command cannot be empty"));
    }

    #[test]
    fn test_nul_command_rejected() {
        let err =
            ExecutionRequest::new(Backend::DirectExec, "web01", "echo a\0b", false).unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[test]
    fn test_bad_host_rejected() {
        let err = ExecutionRequest::new(Backend::ConfigManagement, "-x", "uptime", true)
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }
}
