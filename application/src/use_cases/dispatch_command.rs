//! Dispatch Command use case
//!
//! Classifies a (description, command) pair, builds the backend's argument
//! vector and runs it through the [`ProcessRunnerPort`].
//!
//! ```text
//! DispatchInput
//!   ├─ validate command + host        → InvalidInput
//!   ├─ IntentClassifier::classify     → RoutingDecision   (audited)
//!   ├─ HostPolicy::check              → NotAllowed
//!   ├─ BackendProfile::invocation     → ProcessInvocation (NotAllowed: module)
//!   └─ ProcessRunnerPort::run         → ExecutionResult   (audited)
//! ```
//!
//! Nothing is retried here; retry policy belongs to the caller.

use crate::config::DispatchSettings;
use crate::ports::audit_logger::{
    AuditEvent, AuditLogger, EXECUTION_COMPLETED, EXECUTION_FAILED, NoAuditLogger,
    ROUTING_DECISION,
};
use crate::ports::process_runner::ProcessRunnerPort;
use opsroute_domain::core::string::{first_line, truncate};
use opsroute_domain::execution::request::validate_command;
use opsroute_domain::{
    ClassificationRequest, DispatchError, ExecutionRequest, ExecutionResult, HostId,
    IntentClassifier, RoutingDecision,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Maximum bytes of output copied into an audit record.
const AUDIT_PREVIEW_LEN: usize = 512;

/// Input for the DispatchCommand use case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchInput {
    /// Human-readable intent; may be empty
    #[serde(default)]
    pub description: String,
    /// Shell command to run on the target host
    pub command: String,
    /// Target host identifier (`host` or `user@host`)
    pub target_host: String,
    /// Run with elevated privileges (`--become` / `sudo -n`)
    #[serde(default)]
    pub privilege_escalation: bool,
    /// Per-call deadline overriding the executor default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl DispatchInput {
    pub fn new(
        description: impl Into<String>,
        command: impl Into<String>,
        target_host: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            command: command.into(),
            target_host: target_host.into(),
            privilege_escalation: false,
            timeout: None,
        }
    }

    pub fn with_privilege_escalation(mut self) -> Self {
        self.privilege_escalation = true;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Output of a successful dispatch.
///
/// "Successful" means the process ran; check `result.success()` for the
/// command's own exit status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutput {
    pub decision: RoutingDecision,
    pub request: ExecutionRequest,
    pub result: ExecutionResult,
}

/// Use case for classifying and running a remote command
pub struct DispatchCommandUseCase<R: ProcessRunnerPort + 'static> {
    runner: Arc<R>,
    classifier: IntentClassifier,
    settings: DispatchSettings,
    audit: Arc<dyn AuditLogger>,
}

impl<R: ProcessRunnerPort + 'static> DispatchCommandUseCase<R> {
    pub fn new(runner: Arc<R>, settings: DispatchSettings) -> Self {
        Self {
            runner,
            classifier: IntentClassifier::new(),
            settings,
            audit: Arc::new(NoAuditLogger),
        }
    }

    pub fn with_classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Classify without executing anything.
    pub fn classify(&self, description: &str, command: &str) -> RoutingDecision {
        self.classifier.classify_parts(description, command)
    }

    /// Classify the input, then run it on the decided backend.
    pub async fn execute(&self, input: DispatchInput) -> Result<DispatchOutput, DispatchError> {
        let command = validate_command(input.command.clone())?;
        let host = HostId::parse(input.target_host.as_str())?;

        let decision = self
            .classifier
            .classify(&ClassificationRequest::new(&input.description, &command));

        info!(
            "Routing '{}' on {} to {}",
            first_line(&command, 80),
            host,
            decision
        );
        self.audit.log(AuditEvent::new(
            ROUTING_DECISION,
            json!({
                "host": host.as_str(),
                "description": input.description,
                "command": command,
                "backend": decision.backend,
                "rule": decision.rule,
                "rule_index": decision.rule_index(),
                "matched": decision.matched,
                "keyword": decision.keyword,
            }),
        ));

        let request = ExecutionRequest::new(
            decision.backend,
            host.as_str(),
            command,
            input.privilege_escalation,
        )?;

        let result = self.run_request(&request, input.timeout).await?;

        Ok(DispatchOutput {
            decision,
            request,
            result,
        })
    }

    /// Run a request whose backend was decided by the caller.
    pub async fn execute_request(
        &self,
        request: &ExecutionRequest,
    ) -> Result<ExecutionResult, DispatchError> {
        self.run_request(request, None).await
    }

    async fn run_request(
        &self,
        request: &ExecutionRequest,
        timeout: Option<Duration>,
    ) -> Result<ExecutionResult, DispatchError> {
        let outcome = self.try_run(request, timeout).await;

        match &outcome {
            Ok(result) => {
                if result.success() {
                    debug!(
                        "{} on {} exited 0 in {}ms",
                        request.backend, request.target_host, result.duration_ms()
                    );
                } else {
                    warn!(
                        "{} on {} exited with code {}",
                        request.backend, request.target_host, result.exit_code()
                    );
                }
                self.audit.log(AuditEvent::new(
                    EXECUTION_COMPLETED,
                    json!({
                        "host": request.target_host.as_str(),
                        "backend": request.backend,
                        "privilege_escalation": request.privilege_escalation,
                        "exit_code": result.exit_code(),
                        "success": result.success(),
                        "duration_ms": result.duration_ms(),
                        "stdout": truncate(result.stdout(), AUDIT_PREVIEW_LEN),
                        "stderr": truncate(result.stderr(), AUDIT_PREVIEW_LEN),
                    }),
                ));
            }
            Err(e) => {
                warn!(
                    "{} on {} failed: {}",
                    request.backend, request.target_host, e
                );
                self.audit.log(AuditEvent::new(
                    EXECUTION_FAILED,
                    json!({
                        "host": request.target_host.as_str(),
                        "backend": request.backend,
                        "code": e.code(),
                        "error": e.to_string(),
                    }),
                ));
            }
        }

        outcome
    }

    async fn try_run(
        &self,
        request: &ExecutionRequest,
        timeout: Option<Duration>,
    ) -> Result<ExecutionResult, DispatchError> {
        self.settings.hosts.check(&request.target_host)?;

        let mut invocation = self.settings.profile.invocation(request)?;
        if let Some(timeout) = timeout {
            invocation = invocation.with_timeout(timeout);
        }

        debug!("Invoking {}", invocation.display_line());
        self.runner.run(&invocation).await
    }
}
