//! Application layer for opsroute
//!
//! This crate contains the dispatch use case, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DispatchSettings, ExecutorParams};
pub use ports::{
    audit_logger::{AuditEvent, AuditLogger, NoAuditLogger},
    process_runner::ProcessRunnerPort,
};
pub use use_cases::dispatch_command::{DispatchCommandUseCase, DispatchInput, DispatchOutput};
