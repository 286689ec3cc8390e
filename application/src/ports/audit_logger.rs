//! Port for structured audit logging.
//!
//! Defines the [`AuditLogger`] trait for recording routing decisions and
//! execution outcomes to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures a
//! machine-readable trail (JSONL) of what ran where and why.

use serde_json::Value;

/// Event type for a classifier decision.
pub const ROUTING_DECISION: &str = "routing_decision";
/// Event type for a process that ran to completion (any exit code).
pub const EXECUTION_COMPLETED: &str = "execution_completed";
/// Event type for a dispatch that ended in a [`DispatchError`](opsroute_domain::DispatchError).
pub const EXECUTION_FAILED: &str = "execution_failed";

/// A structured audit event.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. The adapter adds the timestamp.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub event_type: &'static str,
    pub payload: Value,
}

impl AuditEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging audit events.
///
/// `log` is synchronous and infallible: a failing sink never changes the
/// outcome of a dispatch.
pub trait AuditLogger: Send + Sync {
    fn log(&self, event: AuditEvent);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLogger;

impl AuditLogger for NoAuditLogger {
    fn log(&self, _event: AuditEvent) {}
}
