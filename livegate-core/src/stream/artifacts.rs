//! Artifact store for HLS output
//!
//! Manages the output directory: enumerates and deletes playlist/segment
//! files by naming convention, and answers the readiness predicates the
//! poller evaluates. At most one stream epoch's artifacts exist on disk at
//! a time; the controller clears residuals before each launch and after
//! each stop.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, trace};

use super::ffmpeg::{FIRST_SEGMENT_NAME, PLAYLIST_NAME, SEGMENT_PREFIX};
use crate::error::Result;

/// Check whether a file name belongs to the stream artifact set.
/// Only these are ever deleted or served, which protects unrelated files
/// when `output_dir` points somewhere unexpected.
fn is_artifact_name(name: &str) -> bool {
    name.starts_with(SEGMENT_PREFIX) && (name.ends_with(".m3u8") || name.ends_with(".ts"))
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    output_dir: PathBuf,
}

impl ArtifactStore {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn playlist_path(&self) -> PathBuf {
        self.output_dir.join(PLAYLIST_NAME)
    }

    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).await?;
        Ok(())
    }

    /// Delete every playlist/segment file from the previous epoch.
    /// Returns how many files were removed.
    pub async fn clear_residuals(&self) -> Result<usize> {
        if !fs::try_exists(&self.output_dir).await.unwrap_or(false) {
            return Ok(0);
        }

        let mut deleted = 0;
        let mut entries = fs::read_dir(&self.output_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if !is_artifact_name(&name) {
                continue;
            }
            match entry.file_type().await {
                Ok(ft) if ft.is_file() => {}
                _ => continue,
            }
            fs::remove_file(entry.path()).await?;
            trace!(file = %name, "removed residual artifact");
            deleted += 1;
        }

        if deleted > 0 {
            debug!(deleted, "cleared residual artifacts");
        }
        Ok(deleted)
    }

    /// Playlist exists and is non-empty.
    pub async fn playlist_ready(&self) -> bool {
        file_size(&self.playlist_path()).await.is_some_and(|s| s > 0)
    }

    /// First segment exists and exceeds `min_bytes`, distinguishing a real
    /// keyframe-bearing segment from an empty or truncated placeholder.
    pub async fn first_segment_ready(&self, min_bytes: u64) -> bool {
        file_size(&self.output_dir.join(FIRST_SEGMENT_NAME))
            .await
            .is_some_and(|s| s > min_bytes)
    }

    /// Resolve a client-supplied file name to a servable path.
    ///
    /// Only plain names matching the artifact convention resolve; anything
    /// with a path separator or `..` is rejected outright.
    pub async fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return None;
        }
        if !is_artifact_name(name) {
            return None;
        }
        let path = self.output_dir.join(name);
        if fs::try_exists(&path).await.unwrap_or(false) {
            Some(path)
        } else {
            None
        }
    }
}

async fn file_size(path: &Path) -> Option<u64> {
    fs::metadata(path).await.ok().filter(|m| m.is_file()).map(|m| m.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn store() -> (TempDir, ArtifactStore) {
        let dir = TempDir::new().expect("tempdir");
        let store = ArtifactStore::new(dir.path());
        store.ensure_dir().await.expect("ensure_dir");
        (dir, store)
    }

    #[tokio::test]
    async fn test_clear_residuals_only_touches_artifacts() {
        let (dir, store) = store().await;
        std::fs::write(dir.path().join("stream.m3u8"), "#EXTM3U").expect("write");
        std::fs::write(dir.path().join("stream000.ts"), "x").expect("write");
        std::fs::write(dir.path().join("stream001.ts"), "x").expect("write");
        std::fs::write(dir.path().join("notes.txt"), "keep me").expect("write");
        std::fs::write(dir.path().join("other.ts"), "keep me too").expect("write");

        let deleted = store.clear_residuals().await.expect("clear");
        assert_eq!(deleted, 3);
        assert!(dir.path().join("notes.txt").exists());
        assert!(dir.path().join("other.ts").exists());
        assert!(!dir.path().join("stream.m3u8").exists());
    }

    #[tokio::test]
    async fn test_clear_residuals_on_missing_dir_is_noop() {
        let store = ArtifactStore::new("/nonexistent/livegate-test-dir");
        assert_eq!(store.clear_residuals().await.expect("clear"), 0);
    }

    #[tokio::test]
    async fn test_playlist_ready_requires_content() {
        let (dir, store) = store().await;
        assert!(!store.playlist_ready().await);

        std::fs::write(dir.path().join("stream.m3u8"), "").expect("write");
        assert!(!store.playlist_ready().await);

        std::fs::write(dir.path().join("stream.m3u8"), "#EXTM3U").expect("write");
        assert!(store.playlist_ready().await);
    }

    #[tokio::test]
    async fn test_first_segment_ready_threshold() {
        let (dir, store) = store().await;
        assert!(!store.first_segment_ready(100).await);

        std::fs::write(dir.path().join("stream000.ts"), vec![0u8; 100]).expect("write");
        assert!(!store.first_segment_ready(100).await);

        std::fs::write(dir.path().join("stream000.ts"), vec![0u8; 101]).expect("write");
        assert!(store.first_segment_ready(100).await);
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal_and_foreign_names() {
        let (dir, store) = store().await;
        std::fs::write(dir.path().join("stream000.ts"), "x").expect("write");

        assert!(store.resolve("stream000.ts").await.is_some());
        assert!(store.resolve("stream001.ts").await.is_none()); // absent
        assert!(store.resolve("../stream000.ts").await.is_none());
        assert!(store.resolve("sub/stream000.ts").await.is_none());
        assert!(store.resolve("secrets.txt").await.is_none());
    }
}
