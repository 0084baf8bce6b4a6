// Module: stream
// RTSP-to-HLS stream lifecycle: supervise one transcoder process, detect
// readiness from its output artifacts, tear down cleanly.

pub mod artifacts;
pub mod controller;
pub mod ffmpeg;
pub mod readiness;
pub mod supervisor;

pub use artifacts::ArtifactStore;
pub use controller::{StreamController, StreamState, StreamStatus};
pub use supervisor::{ProcessSupervisor, StreamHandle};
