//! Logging infrastructure.
//!
//! - [`JsonlAuditLogger`]: JSONL file writer implementing the
//!   [`AuditLogger`](opsroute_application::AuditLogger) port
//! - [`init_tracing`]: diagnostic `tracing` subscriber setup

mod jsonl_audit_logger;
mod subscriber;

pub use jsonl_audit_logger::JsonlAuditLogger;
pub use subscriber::{env_filter, init_tracing, init_tracing_from_config, verbosity_level};
