//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application/domain
//! types via the `to_*` methods.
//!
//! ```toml
//! [executor]
//! max_concurrent = 3
//! command_timeout = 30          # seconds
//! allowed_programs = ["ansible", "ssh"]
//!
//! [ansible]
//! inventory = "/etc/ansible/hosts"
//! module = "shell"
//!
//! [ssh]
//! connect_timeout = 10
//! options = ["StrictHostKeyChecking=accept-new"]
//!
//! [hosts]
//! allowed = ["web01", "db01"]
//!
//! [logging]
//! level = "info"
//! audit_log = "/var/log/opsroute/audit.jsonl"
//! ```

use opsroute_application::{DispatchSettings, ExecutorParams};
use opsroute_application::config::executor_params::{
    DEFAULT_ALLOWED_PROGRAMS, DEFAULT_COMMAND_TIMEOUT, DEFAULT_MAX_CONCURRENT,
};
use opsroute_domain::{AnsibleProfile, BackendProfile, HostPolicy, SshProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("executor.max_concurrent cannot be 0")]
    InvalidConcurrency,

    #[error("executor.command_timeout cannot be 0")]
    InvalidTimeout,

    #[error("executor.allowed_programs cannot be empty")]
    EmptyAllowList,

    #[error("{backend} program '{program}' is not in executor.allowed_programs")]
    ProgramNotAllowed {
        backend: &'static str,
        program: String,
    },

    #[error("ansible.module '{0}' is not in ansible.allowed_modules")]
    ModuleNotAllowed(String),
}

/// Raw executor configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutorConfig {
    /// Maximum simultaneously running processes
    pub max_concurrent: usize,
    /// Per-command deadline in seconds
    pub command_timeout: u64,
    /// Seconds between SIGTERM and SIGKILL on timeout
    pub kill_grace: u64,
    /// Programs that may be spawned (exact names)
    pub allowed_programs: Vec<String>,
    /// Default working directory for spawned processes
    pub working_dir: Option<PathBuf>,
    /// Environment overrides for spawned processes
    pub env: BTreeMap<String, String>,
}

impl Default for FileExecutorConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT.as_secs(),
            kill_grace: 2,
            allowed_programs: DEFAULT_ALLOWED_PROGRAMS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            working_dir: None,
            env: BTreeMap::new(),
        }
    }
}

/// Raw ansible configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnsibleConfig {
    pub program: String,
    /// Inventory path passed with `-i`
    pub inventory: Option<PathBuf>,
    /// Ad-hoc module (`shell` or `command`)
    pub module: String,
    pub allowed_modules: Vec<String>,
}

impl Default for FileAnsibleConfig {
    fn default() -> Self {
        let profile = AnsibleProfile::default();
        Self {
            program: profile.program,
            inventory: profile.inventory,
            module: profile.module,
            allowed_modules: profile.allowed_modules,
        }
    }
}

/// Raw ssh configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSshConfig {
    pub program: String,
    /// `ConnectTimeout` in seconds
    pub connect_timeout: u64,
    /// Extra `-o` options
    pub options: Vec<String>,
    /// Default login user
    pub user: Option<String>,
}

impl Default for FileSshConfig {
    fn default() -> Self {
        let profile = SshProfile::default();
        Self {
            program: profile.program,
            connect_timeout: profile.connect_timeout,
            options: profile.options,
            user: profile.user,
        }
    }
}

/// Raw host inventory configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHostsConfig {
    /// Known hosts; empty admits any valid host identifier
    pub allowed: Vec<String>,
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Directory for daily-rotated diagnostic logs (stderr when unset)
    pub directory: Option<PathBuf>,
    /// JSONL audit trail path (disabled when unset)
    pub audit_log: Option<PathBuf>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            directory: None,
            audit_log: None,
        }
    }
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub executor: FileExecutorConfig,
    pub ansible: FileAnsibleConfig,
    pub ssh: FileSshConfig,
    pub hosts: FileHostsConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.executor.max_concurrent == 0 {
            return Err(ConfigValidationError::InvalidConcurrency);
        }

        if self.executor.command_timeout == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if self.executor.allowed_programs.is_empty() {
            return Err(ConfigValidationError::EmptyAllowList);
        }

        for (backend, program) in [
            ("ansible", &self.ansible.program),
            ("ssh", &self.ssh.program),
        ] {
            if !self.executor.allowed_programs.contains(program) {
                return Err(ConfigValidationError::ProgramNotAllowed {
                    backend,
                    program: program.clone(),
                });
            }
        }

        if !self.ansible.allowed_modules.contains(&self.ansible.module) {
            return Err(ConfigValidationError::ModuleNotAllowed(
                self.ansible.module.clone(),
            ));
        }

        Ok(())
    }

    pub fn to_executor_params(&self) -> ExecutorParams {
        let mut params = ExecutorParams::default()
            .with_max_concurrent(self.executor.max_concurrent)
            .with_command_timeout(Duration::from_secs(self.executor.command_timeout))
            .with_kill_grace(Duration::from_secs(self.executor.kill_grace))
            .with_allowed_programs(self.executor.allowed_programs.iter().cloned());
        if let Some(dir) = &self.executor.working_dir {
            params = params.with_working_dir(dir.clone());
        }
        for (key, value) in &self.executor.env {
            params = params.with_env(key.clone(), value.clone());
        }
        params
    }

    pub fn to_backend_profile(&self) -> BackendProfile {
        BackendProfile {
            ansible: AnsibleProfile {
                program: self.ansible.program.clone(),
                inventory: self.ansible.inventory.clone(),
                module: self.ansible.module.clone(),
                allowed_modules: self.ansible.allowed_modules.clone(),
            },
            ssh: SshProfile {
                program: self.ssh.program.clone(),
                connect_timeout: self.ssh.connect_timeout,
                options: self.ssh.options.clone(),
                user: self.ssh.user.clone(),
            },
        }
    }

    pub fn to_host_policy(&self) -> HostPolicy {
        HostPolicy::from_hosts(self.hosts.allowed.iter().cloned())
    }

    pub fn to_dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings::new(self.to_backend_profile(), self.to_host_policy())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
