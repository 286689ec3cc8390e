//! Execution backends a command can be routed to.

use serde::{Deserialize, Serialize};

/// The two execution paths available to the dispatcher.
///
/// - `ConfigManagement`: idempotent, declarative, privilege-aware execution
///   through a configuration-management tool (ansible).
/// - `DirectExec`: read-only / status commands run directly on the target
///   host over a remote shell (ssh).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    ConfigManagement,
    DirectExec,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::ConfigManagement => "config_management",
            Backend::DirectExec => "direct_exec",
        }
    }

    /// Whether this backend is expected to mutate the target system.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Backend::ConfigManagement)
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "config_management" | "ansible" => Ok(Backend::ConfigManagement),
            "direct_exec" | "ssh" => Ok(Backend::DirectExec),
            _ => Err(format!(
                "Unknown backend: {}. Valid: config_management (ansible), direct_exec (ssh)",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend() {
        assert_eq!(
            "ansible".parse::<Backend>().unwrap(),
            Backend::ConfigManagement
        );
        assert_eq!("SSH".parse::<Backend>().unwrap(), Backend::DirectExec);
        assert_eq!(
            "direct_exec".parse::<Backend>().unwrap(),
            Backend::DirectExec
        );
        assert!("telnet".parse::<Backend>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Backend::ConfigManagement).unwrap();
        assert_eq!(json, "\"config_management\"");
        let parsed: Backend = serde_json::from_str("\"direct_exec\"").unwrap();
        assert_eq!(parsed, Backend::DirectExec);
    }
}
