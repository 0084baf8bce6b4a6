//! Process supervisor for the external transcoder
//!
//! Owns launch, liveness checks, and graceful-then-forceful termination of
//! at most one transcoding process. Termination always waits for OS-level
//! exit confirmation so no zombie encoder keeps the output directory or the
//! source socket open.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// A running transcode process. Created on successful launch, destroyed on
/// confirmed exit or stop. Exclusively owned by the lifecycle controller.
#[derive(Debug)]
pub struct StreamHandle {
    child: Child,
    launched_at: Instant,
    log_path: PathBuf,
}

impl StreamHandle {
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    #[must_use]
    pub fn launched_at(&self) -> Instant {
        self.launched_at
    }
}

/// Spawns and reaps transcoder processes, one at a time.
#[derive(Debug, Clone)]
pub struct ProcessSupervisor {
    log_dir: PathBuf,
    launch_grace: Duration,
}

impl ProcessSupervisor {
    #[must_use]
    pub fn new(log_dir: PathBuf, launch_grace: Duration) -> Self {
        Self {
            log_dir,
            launch_grace,
        }
    }

    /// Spawn the transcoder with stderr redirected to a fresh, uniquely named
    /// log file.
    ///
    /// After spawning, waits the launch grace window and polls the process
    /// once without blocking: a transcoder that exits this quickly almost
    /// always means a malformed or unreachable source URL, and failing here
    /// beats hanging for the full readiness deadline. The returned error
    /// carries the log path for diagnosis.
    pub async fn launch(&self, mut command: Command) -> Result<StreamHandle> {
        let log_path = self.new_log_path();
        let log_file = std::fs::File::create(&log_path)?;

        info!(log = %log_path.display(), "launching transcoder");

        let child = command
            .stderr(Stdio::from(log_file))
            .spawn()
            .map_err(|e| {
                warn!(error = %e, "failed to spawn transcoder");
                Error::LaunchFailure {
                    log_path: log_path.clone(),
                }
            })?;

        let mut handle = StreamHandle {
            child,
            launched_at: Instant::now(),
            log_path,
        };

        tokio::time::sleep(self.launch_grace).await;

        if let Ok(Some(status)) = handle.child.try_wait() {
            warn!(%status, log = %handle.log_path.display(), "transcoder exited immediately after launch");
            return Err(Error::LaunchFailure {
                log_path: handle.log_path,
            });
        }

        Ok(handle)
    }

    /// Stop the process behind `handle`, if any: graceful signal first, wait
    /// up to `grace`, then force-kill. Always waits for exit confirmation.
    /// Calling with an absent or already-exited handle is a no-op.
    pub async fn terminate(&self, handle: &mut Option<StreamHandle>, grace: Duration) {
        let Some(mut h) = handle.take() else {
            return;
        };

        match h.child.try_wait() {
            Ok(Some(status)) => {
                debug!(%status, "transcoder already exited");
                return;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "could not poll transcoder, force-killing");
                let _ = h.child.kill().await;
                return;
            }
        }

        send_graceful_stop(&mut h.child);

        match tokio::time::timeout(grace, h.child.wait()).await {
            Ok(Ok(status)) => {
                info!(%status, "transcoder stopped gracefully");
            }
            Ok(Err(e)) => {
                warn!(error = %e, "error waiting for transcoder, force-killing");
                let _ = h.child.kill().await;
            }
            Err(_) => {
                warn!("transcoder ignored graceful stop, force-killing");
                // kill() sends SIGKILL and awaits the exit status
                if let Err(e) = h.child.kill().await {
                    warn!(error = %e, "force kill failed");
                }
            }
        }
    }

    /// Non-blocking liveness check. Clears the handle once the process is
    /// observed to have exited.
    pub fn is_running(&self, handle: &mut Option<StreamHandle>) -> bool {
        let Some(h) = handle.as_mut() else {
            return false;
        };
        match h.child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                debug!(%status, "transcoder exited");
                *handle = None;
                false
            }
            Err(_) => {
                *handle = None;
                false
            }
        }
    }

    fn new_log_path(&self) -> PathBuf {
        // Timestamp plus a random suffix: restarts within the same second
        // must not clobber the previous launch's log.
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let suffix = nanoid::nanoid!(6);
        self.log_dir.join(format!("ffmpeg_{stamp}_{suffix}.log"))
    }
}

/// Ask the process to stop without killing it outright, so the encoder can
/// flush its last segment.
fn send_graceful_stop(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Some(pid) = child.id() {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;
            if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                warn!(error = %e, "failed to send SIGTERM");
            }
            return;
        }
    }
    // Non-unix, or the process already reaped: fall back to a kill signal;
    // the caller still waits for exit.
    let _ = child.start_kill();
}
