//! Domain layer for opsroute
//!
//! This crate contains the routing decision engine and the value objects
//! used to execute a routed command. It performs no I/O.
//!
//! # Core Concepts
//!
//! ## Routing
//!
//! Every remote operation is classified into one of two backends:
//!
//! - **ConfigManagement**: idempotent, privilege-aware execution (ansible)
//! - **DirectExec**: read-only / status commands over a remote shell (ssh)
//!
//! The [`IntentClassifier`] decides with an ordered keyword-rule cascade; see
//! [`routing`] for the rule table.
//!
//! ## Execution
//!
//! A routed command becomes an [`ExecutionRequest`], which a
//! [`BackendProfile`] turns into a [`ProcessInvocation`] (program plus
//! argument vector). The executor adapter produces an [`ExecutionResult`].

pub mod core;
pub mod execution;
pub mod routing;

// Re-export commonly used types
pub use core::error::DispatchError;
pub use execution::{
    AnsibleProfile, BackendProfile, ExecutionId, ExecutionRequest, ExecutionResult, HostId,
    HostPolicy, ProcessInvocation, SshProfile,
};
pub use routing::{
    Backend, ClassificationRequest, IntentClassifier, RoutingDecision, RoutingRule, RuleId,
};
