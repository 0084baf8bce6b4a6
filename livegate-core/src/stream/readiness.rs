//! Readiness poller
//!
//! Startup latency of the transcoder depends on the source and the network,
//! and process liveness alone says nothing about output validity. The only
//! reliable signal is the artifacts themselves: poll until a non-empty
//! playlist and a real first segment exist, or the deadline elapses.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use super::artifacts::ArtifactStore;

/// Poll the artifact store every `interval` until both readiness predicates
/// hold, or `deadline` elapses. Returns true on readiness, false on timeout.
///
/// Bounded and synchronous from the caller's point of view: the start
/// request awaits this. Termination of a process that never became ready is
/// the caller's job.
pub async fn await_ready(
    artifacts: &ArtifactStore,
    min_segment_bytes: u64,
    deadline: Duration,
    interval: Duration,
) -> bool {
    let started = Instant::now();
    loop {
        if artifacts.playlist_ready().await && artifacts.first_segment_ready(min_segment_bytes).await
        {
            debug!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "playlist and first segment ready"
            );
            return true;
        }
        if started.elapsed() >= deadline {
            return false;
        }
        tokio::time::sleep(interval).await;
    }
}
