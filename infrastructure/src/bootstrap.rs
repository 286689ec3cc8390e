//! Dependency wiring from a loaded [`FileConfig`].
//!
//! Builds the guarded executor, the optional JSONL audit logger, and the
//! dispatch use case that ties them together.

use crate::config::{ConfigValidationError, FileConfig};
use crate::logging::JsonlAuditLogger;
use crate::process::GuardedProcessExecutor;
use opsroute_application::DispatchCommandUseCase;
use std::sync::Arc;
use tracing::info;

/// Dispatch use case backed by real processes.
pub type Dispatcher = DispatchCommandUseCase<GuardedProcessExecutor>;

/// Validate `config` and wire a [`Dispatcher`].
///
/// An audit log path that cannot be opened disables auditing with a warning
/// instead of failing.
pub fn build_dispatcher(config: &FileConfig) -> Result<Dispatcher, ConfigValidationError> {
    config.validate()?;

    let executor = Arc::new(GuardedProcessExecutor::new(config.to_executor_params()));
    let mut dispatcher = DispatchCommandUseCase::new(executor, config.to_dispatch_settings());

    if let Some(path) = &config.logging.audit_log
        && let Some(logger) = JsonlAuditLogger::new(path)
    {
        info!("Audit log: {}", logger.path().display());
        dispatcher = dispatcher.with_audit_logger(Arc::new(logger));
    }

    Ok(dispatcher)
}
