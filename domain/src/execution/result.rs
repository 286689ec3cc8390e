//! Execution results.

use serde::{Deserialize, Serialize};

/// Exit code reported when a process was terminated by a signal.
pub const SIGNAL_EXIT_CODE: i32 = -1;

/// Outcome of one completed process run.
///
/// Created once by the executor and never mutated. `success` is derived from
/// `exit_code` at construction, and both output streams are stored trimmed.
/// A serialized `success` field is ignored on deserialization and recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ResultRecord")]
pub struct ExecutionResult {
    exit_code: i32,
    stdout: String,
    stderr: String,
    success: bool,
    duration_ms: u64,
}

/// Wire shape accepted when deserializing an [`ExecutionResult`].
#[derive(Deserialize)]
struct ResultRecord {
    exit_code: i32,
    #[serde(default)]
    stdout: String,
    #[serde(default)]
    stderr: String,
    #[serde(default)]
    duration_ms: u64,
}

impl From<ResultRecord> for ExecutionResult {
    fn from(record: ResultRecord) -> Self {
        Self::new(
            record.exit_code,
            record.stdout,
            record.stderr,
            record.duration_ms,
        )
    }
}

impl ExecutionResult {
    pub fn new(
        exit_code: i32,
        stdout: impl AsRef<str>,
        stderr: impl AsRef<str>,
        duration_ms: u64,
    ) -> Self {
        Self {
            exit_code,
            stdout: stdout.as_ref().trim().to_string(),
            stderr: stderr.as_ref().trim().to_string(),
            success: exit_code == 0,
            duration_ms,
        }
    }

    /// Build a result from raw process output bytes (lossy UTF-8).
    pub fn from_output(
        exit_code: Option<i32>,
        stdout: &[u8],
        stderr: &[u8],
        duration_ms: u64,
    ) -> Self {
        Self::new(
            exit_code.unwrap_or(SIGNAL_EXIT_CODE),
            String::from_utf8_lossy(stdout),
            String::from_utf8_lossy(stderr),
            duration_ms,
        )
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// `true` exactly when the exit code is 0.
    pub fn success(&self) -> bool {
        self.success
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}
