//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;
use tracing::debug;

/// Project-level config file names, checked in order.
const PROJECT_FILES: &[&str] = &["opsroute.toml", ".opsroute.toml"];

/// Prefix for structured environment overrides (`OPSROUTE_EXECUTOR__MAX_CONCURRENT`).
const ENV_PREFIX: &str = "OPSROUTE_";

/// Bare environment variables mapped onto `[executor]`.
const EXECUTOR_ENV_VARS: &[&str] = &["MAX_CONCURRENT", "COMMAND_TIMEOUT"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `MAX_CONCURRENT` / `COMMAND_TIMEOUT`
    /// 2. `OPSROUTE_<SECTION>__<KEY>` environment variables
    /// 3. Explicit config path (if provided)
    /// 4. Project root: `./opsroute.toml` or `./.opsroute.toml`
    /// 5. Global: `$XDG_CONFIG_HOME/opsroute/config.toml`
    /// 6. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Build the merged figment without extracting it.
    pub fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Merging global config: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            debug!("Merging project config: {}", path.display());
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            debug!("Merging explicit config: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        Self::merge_env(figment)
    }

    /// Load only default configuration
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("opsroute").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    fn merge_env(figment: Figment) -> Figment {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(EXECUTOR_ENV_VARS)
                    .map(|key| format!("executor.{}", key.as_str().to_ascii_lowercase()).into()),
            )
    }
}
