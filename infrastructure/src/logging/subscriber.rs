//! `tracing` subscriber setup.
//!
//! Diagnostic output goes to stderr, or to a daily-rotated file when a log
//! directory is given. `RUST_LOG` always wins over the verbosity level.

use crate::config::FileLoggingConfig;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// File name prefix of rotated diagnostic logs.
const LOG_FILE_PREFIX: &str = "opsroute.log";

/// Map a `-v` count to a filter directive.
pub fn verbosity_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Build the filter: `RUST_LOG` if set, otherwise `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber.
///
/// Returns the appender guard when logging to a file; keep it alive for the
/// lifetime of the process or buffered lines are lost. Installing twice is
/// a no-op.
pub fn init_tracing(verbosity: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    install(env_filter(verbosity_level(verbosity)), log_dir)
}

/// Install the global subscriber from the `[logging]` config section.
pub fn init_tracing_from_config(config: &FileLoggingConfig) -> Option<WorkerGuard> {
    install(env_filter(&config.level), config.directory.as_deref())
}

fn install(filter: EnvFilter, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init();
            None
        }
    }
}
