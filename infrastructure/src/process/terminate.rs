//! Forced termination of a child that outlived its deadline.
//!
//! Every child is spawned as the leader of its own process group, so the
//! signals below reach everything it started (ansible workers, a shell's
//! pipeline stages, background jobs).

use std::time::Duration;
use tokio::process::Child;
use tracing::{debug, warn};

/// Send `signal` to the process group led by `pgid`.
///
/// Returns `false` if no process in the group could be signalled.
#[cfg(unix)]
pub(crate) fn signal_group(pgid: u32, signal: libc::c_int) -> bool {
    // SAFETY: `pgid` is the pid of a child we spawned with `process_group(0)`;
    // the group id stays reserved while any member is alive.
    unsafe { libc::killpg(pgid as libc::pid_t, signal) == 0 }
}

/// Stop `child` and its process group: SIGTERM first, SIGKILL after `grace`.
///
/// The group always receives SIGKILL at the end, even when the leader exited
/// on SIGTERM, so descendants cannot outlive the deadline. The leader is
/// reaped before returning (unless the kill itself fails).
pub(crate) async fn terminate(child: &mut Child, grace: Duration) {
    #[cfg(unix)]
    {
        if let Some(pid) = child.id() {
            let delivered = signal_group(pid, libc::SIGTERM);
            let exited = delivered
                && matches!(
                    tokio::time::timeout(grace, child.wait()).await,
                    Ok(Ok(_))
                );
            signal_group(pid, libc::SIGKILL);

            if exited {
                debug!("Process group {} exited after SIGTERM", pid);
                return;
            }
            debug!("Process group {} ignored SIGTERM, sent SIGKILL", pid);
        }
    }

    #[cfg(not(unix))]
    let _ = grace;

    if let Err(e) = child.kill().await {
        warn!("Failed to kill timed-out process: {}", e);
    }
}
