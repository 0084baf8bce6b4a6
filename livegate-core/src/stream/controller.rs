//! Stream lifecycle controller
//!
//! Single source of truth for "is a stream active". Serializes start/stop
//! against one shared handle: both operations hold the lifecycle mutex for
//! their full duration, including the bounded readiness wait, so two
//! launches can never race and a stop issued during an in-flight start
//! queues behind the lock. Status reads a lock-free snapshot instead.
//!
//! Controller state does not survive a process restart; a transcoder left
//! over from a previous life is orphaned. Residual artifacts from such a
//! life are removed by `startup_cleanup`.

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::artifacts::ArtifactStore;
use super::ffmpeg::{self, PLAYLIST_NAME};
use super::readiness;
use super::supervisor::{ProcessSupervisor, StreamHandle};
use crate::config::StreamConfig;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamState {
    Idle,
    Starting,
    Active,
    Stopping,
}

/// Point-in-time view of the controller, safe to read concurrently with a
/// long-running start.
#[derive(Debug, Clone, Serialize)]
pub struct StreamStatus {
    pub is_active: bool,
    pub hls_url: Option<String>,
}

pub struct StreamController {
    config: StreamConfig,
    supervisor: ProcessSupervisor,
    artifacts: ArtifactStore,
    public_base_url: String,
    /// Guards the handle across whole lifecycle operations.
    lifecycle: Mutex<Option<StreamHandle>>,
    /// Snapshot for non-blocking status queries.
    state: RwLock<StreamState>,
}

impl StreamController {
    #[must_use]
    pub fn new(config: StreamConfig, public_base_url: String) -> Self {
        let supervisor = ProcessSupervisor::new(config.log_dir.clone(), config.launch_grace());
        let artifacts = ArtifactStore::new(config.output_dir.clone());
        Self {
            config,
            supervisor,
            artifacts,
            public_base_url,
            lifecycle: Mutex::new(None),
            state: RwLock::new(StreamState::Idle),
        }
    }

    #[must_use]
    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Remove artifacts left on disk by a previous controller life.
    pub async fn startup_cleanup(&self) -> Result<()> {
        self.artifacts.ensure_dir().await?;
        let deleted = self.artifacts.clear_residuals().await?;
        if deleted > 0 {
            info!(deleted, "removed artifacts from a previous run");
        }
        Ok(())
    }

    /// Start transcoding `source_url` into the HLS output directory.
    ///
    /// Terminates any currently running transcoder first, so at most one
    /// process exists at any instant. Returns the public playlist URL once
    /// the output is confirmed playable. Any failure resolves back to idle
    /// with the output directory cleared.
    pub async fn start(&self, source_url: &str) -> Result<String> {
        if source_url.trim().is_empty() {
            return Err(Error::InvalidInput("source URL is required".to_string()));
        }

        let mut handle = self.lifecycle.lock().await;

        if self.supervisor.is_running(&mut handle) {
            info!("terminating previous transcoder before restart");
            self.set_state(StreamState::Stopping);
            self.supervisor
                .terminate(&mut handle, self.config.stop_grace())
                .await;
        }

        self.artifacts.ensure_dir().await?;
        self.artifacts.clear_residuals().await?;

        self.set_state(StreamState::Starting);
        info!(source = %source_url, "starting stream");

        let command = ffmpeg::hls_command(&self.config, source_url);
        let launched = match self.supervisor.launch(command).await {
            Ok(h) => h,
            Err(e) => {
                // The transcoder may have written a partial playlist during
                // the grace window before dying; it must not be served.
                self.clear_residuals_best_effort().await;
                self.set_state(StreamState::Idle);
                return Err(e);
            }
        };
        let log_path = launched.log_path().to_path_buf();
        *handle = Some(launched);

        let ready = readiness::await_ready(
            &self.artifacts,
            self.config.min_segment_bytes,
            self.config.readiness_timeout(),
            self.config.poll_interval(),
        )
        .await;

        if !ready {
            warn!(log = %log_path.display(), "stream never became ready, tearing down");
            self.supervisor
                .terminate(&mut handle, self.config.stop_grace())
                .await;
            self.clear_residuals_best_effort().await;
            self.set_state(StreamState::Idle);
            return Err(Error::ReadinessTimeout { log_path });
        }

        self.set_state(StreamState::Active);
        info!("stream is live");
        Ok(self.hls_url())
    }

    /// Stop the active stream, if any, and clear its artifacts. Idempotent:
    /// stopping an idle controller is a successful no-op.
    pub async fn stop(&self) -> Result<()> {
        let mut handle = self.lifecycle.lock().await;

        if handle.is_none() {
            self.set_state(StreamState::Idle);
            return Ok(());
        }

        self.set_state(StreamState::Stopping);
        self.supervisor
            .terminate(&mut handle, self.config.stop_grace())
            .await;
        self.clear_residuals_best_effort().await;
        self.set_state(StreamState::Idle);
        info!("stream stopped");
        Ok(())
    }

    /// Cleanup on teardown paths must not mask the operation's outcome or
    /// block the transition back to idle; the process is already confirmed
    /// dead by the time this runs.
    async fn clear_residuals_best_effort(&self) {
        if let Err(e) = self.artifacts.clear_residuals().await {
            warn!(error = %e, "failed to clear residual artifacts");
        }
    }

    /// Non-blocking status snapshot.
    ///
    /// When the lifecycle lock is free, also polls the process so a
    /// transcoder that died on its own is reported inactive. When the lock
    /// is held (a start or stop is in flight) the last snapshot is returned
    /// as-is rather than waiting.
    pub fn status(&self) -> StreamStatus {
        if let Ok(mut handle) = self.lifecycle.try_lock() {
            if *self.state.read() == StreamState::Active && !self.supervisor.is_running(&mut handle)
            {
                warn!("transcoder exited on its own");
                self.set_state(StreamState::Idle);
            }
        }

        let is_active = *self.state.read() == StreamState::Active;
        StreamStatus {
            is_active,
            hls_url: is_active.then(|| self.hls_url()),
        }
    }

    /// Best-effort teardown for server shutdown.
    pub async fn shutdown(&self) {
        if let Err(e) = self.stop().await {
            warn!(error = %e, "failed to stop stream during shutdown");
        }
    }

    fn set_state(&self, state: StreamState) {
        *self.state.write() = state;
    }

    fn hls_url(&self) -> String {
        format!(
            "{}/static/{}",
            self.public_base_url.trim_end_matches('/'),
            PLAYLIST_NAME
        )
    }
}
