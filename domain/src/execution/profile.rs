//! Backend profiles: how each backend turns a request into an `argv`.
//!
//! ```text
//! ConfigManagement → ansible <host> [-u <user>] [-i <inventory>] -m <module> -a <command> [--become]
//! DirectExec       → ssh -o BatchMode=yes -o ConnectTimeout=<n> [-o <opt>]... [-l <user>]
//!                        -- <user@host> <command>
//!                  | ssh ... -- <user@host> sudo -n -- sh -c '<command>'
//! ```
//!
//! ssh hands everything after the host to the remote login shell as one
//! line. An escalated command is therefore quoted for that shell and run by
//! `sh -c` under `sudo`, so pipes and redirects are elevated as a whole, the
//! same as `--become` with the ansible `shell` module.

use super::invocation::ProcessInvocation;
use super::request::ExecutionRequest;
use crate::core::error::DispatchError;
use crate::routing::Backend;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for the configuration-management backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsibleProfile {
    /// Program name; must also appear in the executor's allow-list.
    pub program: String,
    pub inventory: Option<PathBuf>,
    /// Ad-hoc module used to run the command.
    pub module: String,
    /// Modules the dispatcher is permitted to use.
    pub allowed_modules: Vec<String>,
}

impl Default for AnsibleProfile {
    fn default() -> Self {
        Self {
            program: "ansible".to_string(),
            inventory: None,
            module: "shell".to_string(),
            allowed_modules: vec!["shell".to_string(), "command".to_string()],
        }
    }
}

impl AnsibleProfile {
    fn invocation(&self, request: &ExecutionRequest) -> Result<ProcessInvocation, DispatchError> {
        if !self.allowed_modules.iter().any(|m| m == &self.module) {
            return Err(DispatchError::not_allowed(format!(
                "ansible module '{}' is not allowed",
                self.module
            )));
        }

        let mut invocation =
            ProcessInvocation::new(&self.program).arg(request.target_host.host());
        if let Some(user) = request.target_host.user() {
            invocation = invocation.args(["-u", user]);
        }
        if let Some(inventory) = &self.inventory {
            invocation = invocation
                .arg("-i")
                .arg(inventory.to_string_lossy().into_owned());
        }
        invocation = invocation
            .args(["-m", self.module.as_str(), "-a", request.command.as_str()]);
        if request.privilege_escalation {
            invocation = invocation.arg("--become");
        }
        Ok(invocation)
    }
}

/// Settings for the direct-execution backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshProfile {
    pub program: String,
    /// Seconds passed as `ConnectTimeout`.
    pub connect_timeout: u64,
    /// Extra `-o` options (e.g. `StrictHostKeyChecking=accept-new`).
    pub options: Vec<String>,
    /// Login user used when the host carries no `user@` prefix.
    pub user: Option<String>,
}

impl Default for SshProfile {
    fn default() -> Self {
        Self {
            program: "ssh".to_string(),
            connect_timeout: 10,
            options: Vec::new(),
            user: None,
        }
    }
}

impl SshProfile {
    fn invocation(&self, request: &ExecutionRequest) -> ProcessInvocation {
        let mut invocation = ProcessInvocation::new(&self.program).args([
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.connect_timeout),
        ]);
        for option in &self.options {
            invocation = invocation.arg("-o").arg(option);
        }
        if request.target_host.user().is_none()
            && let Some(user) = &self.user
        {
            invocation = invocation.arg("-l").arg(user);
        }
        invocation = invocation.arg("--").arg(request.target_host.as_str());
        if request.privilege_escalation {
            invocation
                .args(["sudo", "-n", "--", "sh", "-c"])
                .arg(quote_for_remote_shell(&request.command))
        } else {
            invocation.arg(request.command.as_str())
        }
    }
}

/// Single-quote `text` for a POSIX shell (`'` becomes `'\''`).
fn quote_for_remote_shell(text: &str) -> String {
    format!("'{}'", text.replace('\'', "'\\''"))
}

/// Per-backend invocation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendProfile {
    pub ansible: AnsibleProfile,
    pub ssh: SshProfile,
}

impl BackendProfile {
    /// Program that will be spawned for `backend`.
    pub fn program_for(&self, backend: Backend) -> &str {
        match backend {
            Backend::ConfigManagement => &self.ansible.program,
            Backend::DirectExec => &self.ssh.program,
        }
    }

    /// Build the argument vector for a validated request.
    pub fn invocation(&self, request: &ExecutionRequest) -> Result<ProcessInvocation, DispatchError> {
        match request.backend {
            Backend::ConfigManagement => self.ansible.invocation(request),
            Backend::DirectExec => Ok(self.ssh.invocation(request)),
        }
    }
}
