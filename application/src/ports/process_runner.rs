//! Process Runner port
//!
//! Defines the interface for spawning an allow-listed program and collecting
//! its result.

use async_trait::async_trait;
use opsroute_domain::{DispatchError, ExecutionResult, ProcessInvocation};

/// Port for process execution
///
/// Implementations (adapters) live in the infrastructure layer and are
/// responsible for the allow-list, admission control and the deadline.
///
/// # Contract
///
/// - `Ok(result)` whenever the process ran to completion, including a
///   non-zero exit (`result.success()` is false).
/// - `Err(NotAllowed)` if the program is not allow-listed.
/// - `Err(RateLimited)` if the concurrency ceiling is reached; the call is
///   rejected immediately, never queued.
/// - `Err(Timeout)` if the deadline expired; the process has been killed and
///   partial output is discarded.
/// - `Err(SpawnFailed)` if the OS could not start the process.
#[async_trait]
pub trait ProcessRunnerPort: Send + Sync {
    /// Run one invocation to completion.
    async fn run(&self, invocation: &ProcessInvocation) -> Result<ExecutionResult, DispatchError>;

    /// Number of executions currently in flight.
    fn active_count(&self) -> usize;
}
