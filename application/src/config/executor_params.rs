//! Executor parameters: admission control and process limits.
//!
//! [`ExecutorParams`] groups the static parameters that bound the process
//! executor. They are read once at startup and never mutated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Default maximum number of simultaneously running processes.
pub const DEFAULT_MAX_CONCURRENT: usize = 3;

/// Default hard deadline for a single process.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Grace period between SIGTERM and SIGKILL when a deadline expires.
pub const DEFAULT_KILL_GRACE: Duration = Duration::from_secs(2);

/// Programs the executor may spawn unless configured otherwise.
pub const DEFAULT_ALLOWED_PROGRAMS: &[&str] = &["ansible", "ssh"];

/// Process executor limits.
///
/// | Field | Default | Meaning |
/// |-------|---------|---------|
/// | `max_concurrent` | 3 | ceiling of the active command set |
/// | `command_timeout` | 30s | deadline when an invocation sets none |
/// | `kill_grace` | 2s | SIGTERM → SIGKILL escalation delay |
/// | `allowed_programs` | `ansible`, `ssh` | exact program names that may be spawned |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorParams {
    pub max_concurrent: usize,
    pub command_timeout: Duration,
    pub kill_grace: Duration,
    pub allowed_programs: Vec<String>,
    /// Working directory applied when an invocation sets none.
    pub working_dir: Option<PathBuf>,
    /// Environment overrides applied to every spawned process.
    pub env: BTreeMap<String, String>,
}

impl Default for ExecutorParams {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            kill_grace: DEFAULT_KILL_GRACE,
            allowed_programs: DEFAULT_ALLOWED_PROGRAMS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            working_dir: None,
            env: BTreeMap::new(),
        }
    }
}

impl ExecutorParams {
    // ==================== Builder Methods ====================

    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn with_kill_grace(mut self, grace: Duration) -> Self {
        self.kill_grace = grace;
        self
    }

    pub fn with_allowed_programs<I, S>(mut self, programs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_programs = programs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    // ==================== Queries ====================

    pub fn is_program_allowed(&self, program: &str) -> bool {
        self.allowed_programs.iter().any(|p| p == program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ExecutorParams::default();
        assert_eq!(params.max_concurrent, 3);
        assert_eq!(params.command_timeout, Duration::from_secs(30));
        assert!(params.is_program_allowed("ansible"));
        assert!(params.is_program_allowed("ssh"));
        assert!(!params.is_program_allowed("bash"));
    }

    #[test]
    fn test_allow_list_is_exact_match() {
        let params = ExecutorParams::default();
        assert!(!params.is_program_allowed("/usr/bin/ssh"));
        assert!(!params.is_program_allowed("ssh "));
    }

    #[test]
    fn test_builder_chain() {
        let params = ExecutorParams::default()
            .with_max_concurrent(1)
            .with_command_timeout(Duration::from_millis(250))
            .with_allowed_programs(["echo"])
            .with_env("LC_ALL", "C");

        assert_eq!(params.max_concurrent, 1);
        assert_eq!(params.command_timeout, Duration::from_millis(250));
        assert_eq!(params.allowed_programs, vec!["echo"]);
        assert_eq!(params.env.len(), 1);
    }
}
