//! Configuration file loading for opsroute
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MAX_CONCURRENT` / `COMMAND_TIMEOUT` environment variables
//! 2. `OPSROUTE_<SECTION>__<KEY>` environment variables
//! 3. Explicitly passed config file
//! 4. Project root: `./opsroute.toml` or `./.opsroute.toml`
//! 5. Global: `$XDG_CONFIG_HOME/opsroute/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAnsibleConfig, FileConfig, FileExecutorConfig, FileHostsConfig,
    FileLoggingConfig, FileSshConfig,
};
pub use loader::ConfigLoader;
