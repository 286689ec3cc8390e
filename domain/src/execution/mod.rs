//! Execution domain module
//!
//! Value objects for running a routed command on a target host:
//!
//! - [`ExecutionRequest`]: validated (backend, host, command, escalation)
//! - [`HostId`] / [`HostPolicy`]: target-host validation and allow-listing
//! - [`BackendProfile`]: turns a request into a [`ProcessInvocation`]
//! - [`ExecutionResult`]: immutable outcome of one process run
//! - [`ExecutionId`]: identifier of an in-flight execution
//!
//! # Argument Vectors Only
//!
//! A [`ProcessInvocation`] is a program name plus an argument vector. Nothing
//! in this module ever joins arguments into a local shell string; each
//! element reaches the spawned program as its own `argv` entry.

pub mod host;
pub mod id;
pub mod invocation;
pub mod profile;
pub mod request;
pub mod result;

pub use host::{HostId, HostPolicy};
pub use id::ExecutionId;
pub use invocation::ProcessInvocation;
pub use profile::{AnsibleProfile, BackendProfile, SshProfile};
pub use request::ExecutionRequest;
pub use result::ExecutionResult;
