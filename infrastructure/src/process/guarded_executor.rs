//! Guarded process executor.

use super::active_set::ActiveCommandSet;
use super::terminate::terminate;
#[cfg(unix)]
use super::terminate::signal_group;
use async_trait::async_trait;
use opsroute_application::ExecutorParams;
use opsroute_application::ports::process_runner::ProcessRunnerPort;
use opsroute_domain::{DispatchError, ExecutionResult, ProcessInvocation};
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Maximum bytes kept per output stream (1 MB); the rest is drained and dropped.
pub const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

const TRUNCATION_MARKER: &str = "\n... (output truncated)";

/// Executor that spawns allow-listed programs on the local machine.
///
/// Implements [`ProcessRunnerPort`]. The executor is stateless apart from
/// its shared [`ActiveCommandSet`]; clones share the same set and therefore
/// the same concurrency ceiling.
#[derive(Debug, Clone)]
pub struct GuardedProcessExecutor {
    params: ExecutorParams,
    active: Arc<ActiveCommandSet>,
}

impl GuardedProcessExecutor {
    /// Create an executor with its own active set sized from `params`.
    pub fn new(params: ExecutorParams) -> Self {
        let active = ActiveCommandSet::new(params.max_concurrent);
        let executor = Self { params, active };

        let missing = executor.unavailable_programs();
        if !missing.is_empty() {
            warn!(
                "Allow-listed programs not found on PATH: {}",
                missing.join(", ")
            );
        }
        info!(
            "Process executor ready (max_concurrent={}, timeout={:?}, allowed=[{}])",
            executor.params.max_concurrent,
            executor.params.command_timeout,
            executor.params.allowed_programs.join(", ")
        );

        executor
    }

    pub fn params(&self) -> &ExecutorParams {
        &self.params
    }

    pub fn active_set(&self) -> &Arc<ActiveCommandSet> {
        &self.active
    }

    /// Allow-listed programs that cannot be resolved on `PATH`.
    pub fn unavailable_programs(&self) -> Vec<String> {
        self.params
            .allowed_programs
            .iter()
            .filter(|program| which::which(program.as_str()).is_err())
            .cloned()
            .collect()
    }

    fn build_command(&self, invocation: &ProcessInvocation) -> Command {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .envs(&self.params.env)
            .envs(&invocation.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = self.working_dir(invocation) {
            cmd.current_dir(dir);
        }

        // New process group led by the child; `terminate` signals the group.
        #[cfg(unix)]
        cmd.process_group(0);

        // Linux: the kernel sends SIGTERM to the child when this process dies,
        // including deaths where kill_on_drop never runs (SIGKILL, OOM kill).
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        cmd
    }

    fn working_dir<'a>(&'a self, invocation: &'a ProcessInvocation) -> Option<&'a Path> {
        invocation
            .working_dir
            .as_deref()
            .or(self.params.working_dir.as_deref())
    }

    async fn execute(&self, invocation: &ProcessInvocation) -> Result<ExecutionResult, DispatchError> {
        let program = invocation.program.as_str();

        if !self.params.is_program_allowed(program) {
            return Err(DispatchError::not_allowed(format!(
                "program '{}' is not in the allow-list",
                program
            )));
        }

        if let Some(dir) = self.working_dir(invocation)
            && !dir.is_dir()
        {
            return Err(DispatchError::invalid_input(format!(
                "working directory does not exist: {}",
                dir.display()
            )));
        }

        let slot = self
            .active
            .try_acquire()
            .ok_or(DispatchError::RateLimited {
                max_concurrent: self.active.capacity(),
            })?;

        let timeout = invocation.timeout.unwrap_or(self.params.command_timeout);
        debug!(
            "[{}] spawning {} (timeout {:?})",
            slot.id(),
            invocation.display_line(),
            timeout
        );

        let start = Instant::now();
        let mut child = self
            .build_command(invocation)
            .spawn()
            .map_err(|e| DispatchError::SpawnFailed {
                program: program.to_string(),
                message: e.to_string(),
            })?;

        #[cfg(unix)]
        let pgid = child.id();
        let mut stdout_task = spawn_reader(child.stdout.take());
        let mut stderr_task = spawn_reader(child.stderr.take());

        let waited = tokio::time::timeout(timeout, child.wait()).await;
        let status = match waited {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                stdout_task.abort();
                stderr_task.abort();
                return Err(DispatchError::SpawnFailed {
                    program: program.to_string(),
                    message: format!("failed to wait for process: {}", e),
                });
            }
            Err(_) => {
                warn!("[{}] {} exceeded {:?}, terminating", slot.id(), program, timeout);
                terminate(&mut child, self.params.kill_grace).await;
                stdout_task.abort();
                stderr_task.abort();
                return Err(DispatchError::Timeout {
                    program: program.to_string(),
                    timeout,
                });
            }
        };

        // A background descendant may keep the pipes open after the main
        // process exits; the overall deadline still bounds the wait.
        let remaining = timeout.saturating_sub(start.elapsed());
        let collected = tokio::time::timeout(remaining, async {
            let stdout = (&mut stdout_task).await.unwrap_or_default();
            let stderr = (&mut stderr_task).await.unwrap_or_default();
            (stdout, stderr)
        })
        .await;

        let Ok((stdout, stderr)) = collected else {
            warn!("[{}] {} left its output open past the deadline", slot.id(), program);
            stdout_task.abort();
            stderr_task.abort();
            #[cfg(unix)]
            if let Some(pgid) = pgid {
                signal_group(pgid, libc::SIGKILL);
            }
            return Err(DispatchError::Timeout {
                program: program.to_string(),
                timeout,
            });
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let result = ExecutionResult::from_output(status.code(), &stdout, &stderr, duration_ms);
        debug!(
            "[{}] {} exited with {} in {}ms",
            slot.id(),
            program,
            result.exit_code(),
            duration_ms
        );

        Ok(result)
    }
}

/// Read a pipe to EOF on a separate task, keeping at most [`MAX_OUTPUT_SIZE`] bytes.
fn spawn_reader<R>(pipe: Option<R>) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut kept = Vec::new();
        let Some(mut pipe) = pipe else {
            return kept;
        };

        let mut truncated = false;
        let mut chunk = [0u8; 8192];
        loop {
            match pipe.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    let room = MAX_OUTPUT_SIZE.saturating_sub(kept.len());
                    if n > room {
                        truncated = true;
                    }
                    kept.extend_from_slice(&chunk[..n.min(room)]);
                }
            }
        }

        if truncated {
            kept.extend_from_slice(TRUNCATION_MARKER.as_bytes());
        }
        kept
    })
}

#[async_trait]
impl ProcessRunnerPort for GuardedProcessExecutor {
    async fn run(&self, invocation: &ProcessInvocation) -> Result<ExecutionResult, DispatchError> {
        self.execute(invocation).await
    }

    fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::task::JoinSet;

    fn executor(programs: &[&str]) -> GuardedProcessExecutor {
        GuardedProcessExecutor::new(
            ExecutorParams::default()
                .with_allowed_programs(programs.iter().copied())
                .with_command_timeout(Duration::from_secs(10))
                .with_kill_grace(Duration::from_millis(300)),
        )
    }

    fn sleep_for(seconds: &str) -> ProcessInvocation {
        ProcessInvocation::new("sleep").arg(seconds)
    }

    #[tokio::test]
    async fn test_echo_output_is_trimmed() {
        let executor = executor(&["echo"]);
        let result = executor
            .run(&ProcessInvocation::new("echo").args(["  hello", "world  "]))
            .await
            .unwrap();

        assert!(result.success());
        assert_eq!(result.exit_code(), 0);
        assert_eq!(result.stdout(), "hello world");
        assert_eq!(result.stderr(), "");
        assert_eq!(executor.active_count(), 0);
    }

    #[tokio::test]
    async fn test_arguments_are_not_shell_interpreted() {
        let executor = executor(&["echo"]);
        let result = executor
            .run(&ProcessInvocation::new("echo").arg("$(id); `whoami` > /tmp/x"))
            .await
            .unwrap();

        assert_eq!(result.stdout(), "$(id); `whoami` > /tmp/x");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_a_normal_result() {
        let executor = executor(&["sh"]);
        let result = executor
            .run(&ProcessInvocation::new("sh").args(["-c", "echo out; echo err 1>&2; exit 3"]))
            .await
            .unwrap();

        assert!(!result.success());
        assert_eq!(result.exit_code(), 3);
        assert_eq!(result.stdout(), "out");
        assert_eq!(result.stderr(), "err");
    }

    #[tokio::test]
    async fn test_program_outside_allow_list() {
        let executor = executor(&["echo"]);
        let err = executor
            .run(&ProcessInvocation::new("rm").args(["-rf", "/tmp/nothing"]))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "NOT_ALLOWED");
        assert_eq!(executor.active_set().peak(), 0);
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let missing = "opsroute-definitely-missing-binary";
        let executor = executor(&[missing]);
        let err = executor
            .run(&ProcessInvocation::new(missing))
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::SpawnFailed { ref program, .. } if program == missing));
        assert_eq!(executor.active_count(), 0);
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let executor = executor(&["sleep"]);
        let started = Instant::now();
        let err = executor
            .run(&sleep_for("5").with_timeout(Duration::from_millis(200)))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DispatchError::Timeout {
                program: "sleep".to_string(),
                timeout: Duration::from_millis(200),
            }
        );
        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(executor.active_count(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_escalates_when_sigterm_is_ignored() {
        let executor = executor(&["sh"]);
        let started = Instant::now();
        let err = executor
            .run(
                &ProcessInvocation::new("sh")
                    .args(["-c", "trap '' TERM; sleep 5"])
                    .with_timeout(Duration::from_millis(200)),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code(), "TIMEOUT");
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    /// Whether `pid` names a live (non-zombie) process.
    #[cfg(target_os = "linux")]
    fn process_alive(pid: &str) -> bool {
        match std::fs::read_to_string(format!("/proc/{}/stat", pid.trim())) {
            Ok(stat) => stat
                .rsplit_once(") ")
                .is_some_and(|(_, rest)| !rest.starts_with('Z')),
            Err(_) => false,
        }
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_timeout_kills_descendants() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("grandchild.pid");
        let script = format!("sleep 30 & echo $! > {}; wait", pid_file.display());

        let executor = executor(&["sh"]);
        let err = executor
            .run(
                &ProcessInvocation::new("sh")
                    .args(["-c", script.as_str()])
                    .with_timeout(Duration::from_millis(300)),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "TIMEOUT");

        tokio::time::sleep(Duration::from_millis(200)).await;
        let pid = std::fs::read_to_string(&pid_file).unwrap();
        assert!(!process_alive(&pid), "grandchild {} survived", pid.trim());
        assert_eq!(executor.active_count(), 0);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_background_job_holding_output_is_killed() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("background.pid");
        // The shell exits at once; the background sleep keeps stdout open.
        let script = format!("sleep 30 & echo $! > {}; exit 0", pid_file.display());

        let executor = executor(&["sh"]);
        let started = Instant::now();
        let err = executor
            .run(
                &ProcessInvocation::new("sh")
                    .args(["-c", script.as_str()])
                    .with_timeout(Duration::from_millis(300)),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "TIMEOUT");
        assert!(started.elapsed() < Duration::from_secs(3));

        tokio::time::sleep(Duration::from_millis(200)).await;
        let pid = std::fs::read_to_string(&pid_file).unwrap();
        assert!(!process_alive(&pid), "background job {} survived", pid.trim());
        assert_eq!(executor.active_count(), 0);
    }

    #[tokio::test]
    async fn test_rejects_immediately_at_capacity() {
        let executor = Arc::new(GuardedProcessExecutor::new(
            ExecutorParams::default()
                .with_max_concurrent(1)
                .with_allowed_programs(["sleep", "echo"]),
        ));

        let busy = {
            let executor = Arc::clone(&executor);
            tokio::spawn(async move { executor.run(&sleep_for("1")).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(executor.active_count(), 1);

        let started = Instant::now();
        let err = executor
            .run(&ProcessInvocation::new("echo").arg("hi"))
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::RateLimited { max_concurrent: 1 });
        assert!(started.elapsed() < Duration::from_millis(500));

        assert!(busy.await.unwrap().unwrap().success());
        assert_eq!(executor.active_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_load_never_exceeds_ceiling() {
        let executor = Arc::new(GuardedProcessExecutor::new(
            ExecutorParams::default()
                .with_max_concurrent(3)
                .with_allowed_programs(["sleep"]),
        ));

        let mut calls = JoinSet::new();
        for _ in 0..6 {
            let executor = Arc::clone(&executor);
            calls.spawn(async move { executor.run(&sleep_for("1")).await });
        }

        let mut completed = 0;
        let mut limited = 0;
        while let Some(joined) = calls.join_next().await {
            match joined.unwrap() {
                Ok(result) => {
                    assert!(result.success());
                    completed += 1;
                }
                Err(DispatchError::RateLimited { max_concurrent }) => {
                    assert_eq!(max_concurrent, 3);
                    limited += 1;
                }
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(completed, 3);
        assert_eq!(limited, 3);
        assert_eq!(executor.active_set().peak(), 3);
        assert_eq!(executor.active_count(), 0);
    }

    #[tokio::test]
    async fn test_slots_released_after_timeouts_and_errors() {
        let missing = "opsroute-definitely-missing-binary";
        let executor = executor(&["sleep", "echo", missing]);
        let max = executor.params().max_concurrent;

        for _ in 0..max {
            let err = executor
                .run(&sleep_for("5").with_timeout(Duration::from_millis(100)))
                .await
                .unwrap_err();
            assert_eq!(err.code(), "TIMEOUT");
        }
        let err = executor
            .run(&ProcessInvocation::new(missing))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "SPAWN_FAILED");

        let result = executor
            .run(&ProcessInvocation::new("echo").arg("still admitted"))
            .await
            .unwrap();
        assert_eq!(result.stdout(), "still admitted");
        assert_eq!(executor.active_count(), 0);
    }

    #[tokio::test]
    async fn test_working_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let executor = executor(&["pwd"]);
        let result = executor
            .run(&ProcessInvocation::new("pwd").with_working_dir(temp_dir.path()))
            .await
            .unwrap();

        let dir_name = temp_dir.path().file_name().unwrap().to_str().unwrap();
        assert!(result.stdout().ends_with(dir_name));
    }

    #[tokio::test]
    async fn test_missing_working_dir_is_invalid_input() {
        let executor = executor(&["pwd"]);
        let err = executor
            .run(&ProcessInvocation::new("pwd").with_working_dir("/nonexistent/opsroute/dir"))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "INVALID_INPUT");
        assert_eq!(executor.active_set().peak(), 0);
    }

    #[tokio::test]
    async fn test_env_overrides() {
        let executor = GuardedProcessExecutor::new(
            ExecutorParams::default()
                .with_allowed_programs(["printenv"])
                .with_env("OPSROUTE_BASE", "base")
                .with_env("OPSROUTE_SHADOWED", "from-params"),
        );
        let invocation = ProcessInvocation::new("printenv")
            .args(["OPSROUTE_BASE", "OPSROUTE_SHADOWED"])
            .with_env("OPSROUTE_SHADOWED", "from-invocation");

        let result = executor.run(&invocation).await.unwrap();
        assert_eq!(result.stdout(), "base\nfrom-invocation");
    }

    #[tokio::test]
    async fn test_large_output_is_capped() {
        let executor = executor(&["head"]);
        let size = (MAX_OUTPUT_SIZE + 4096).to_string();
        let result = executor
            .run(&ProcessInvocation::new("head").args(["-c", size.as_str(), "/dev/zero"]))
            .await
            .unwrap();

        assert!(result.success());
        assert!(result.stdout().ends_with("(output truncated)"));
        assert!(result.stdout().len() <= MAX_OUTPUT_SIZE + TRUNCATION_MARKER.len());
    }

    #[test]
    fn test_unavailable_programs() {
        let executor = GuardedProcessExecutor::new(
            ExecutorParams::default()
                .with_allowed_programs(["sh", "opsroute-definitely-missing-binary"]),
        );
        assert_eq!(
            executor.unavailable_programs(),
            vec!["opsroute-definitely-missing-binary".to_string()]
        );
    }
}
