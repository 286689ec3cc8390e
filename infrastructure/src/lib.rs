//! Infrastructure layer for opsroute
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: process execution, configuration file
//! loading, and logging.

pub mod bootstrap;
pub mod config;
pub mod logging;
pub mod process;

// Re-export commonly used types
pub use bootstrap::{Dispatcher, build_dispatcher};
pub use config::{
    ConfigLoader, ConfigValidationError, FileAnsibleConfig, FileConfig, FileExecutorConfig,
    FileHostsConfig, FileLoggingConfig, FileSshConfig,
};
pub use logging::{JsonlAuditLogger, init_tracing, init_tracing_from_config};
pub use process::{ActiveCommandSet, ActiveSlot, GuardedProcessExecutor, MAX_OUTPUT_SIZE};
