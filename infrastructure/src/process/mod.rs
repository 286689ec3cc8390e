//! Process execution: the concrete implementation of [`ProcessRunnerPort`].
//!
//! [`GuardedProcessExecutor`] is the infrastructure-layer adapter that spawns
//! allow-listed programs with an argument vector, bounded by a global
//! concurrency ceiling ([`ActiveCommandSet`]) and a hard deadline.
//!
//! # Execution Path
//!
//! ```text
//! ProcessRunnerPort::run()
//!   ├─ allow-list check          → NotAllowed
//!   ├─ working dir check         → InvalidInput
//!   ├─ ActiveCommandSet::try_acquire
//!   │     └─ at capacity         → RateLimited (immediate, no queue)
//!   ├─ spawn (argv, no shell,    → SpawnFailed
//!   │        own process group)
//!   ├─ wait with deadline
//!   │     └─ expired             → group SIGTERM → grace → group SIGKILL → Timeout
//!   └─ ExecutionResult (any exit code)
//!   (slot released on every path)
//! ```
//!
//! [`ProcessRunnerPort`]: opsroute_application::ports::process_runner::ProcessRunnerPort

mod active_set;
mod guarded_executor;
mod terminate;

pub use active_set::{ActiveCommandSet, ActiveSlot};
pub use guarded_executor::{GuardedProcessExecutor, MAX_OUTPUT_SIZE};
