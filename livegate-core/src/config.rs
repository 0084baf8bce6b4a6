use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub stream: StreamConfig,
    pub overlay: OverlayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base URL clients use to reach this server; prefixed onto the
    /// playlist path in start/status responses.
    pub public_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            public_base_url: "http://localhost:5001".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

/// Transcoding pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Directory where the HLS playlist and segments are written and served from
    pub output_dir: PathBuf,
    /// Transcoder binary, resolved via PATH if not absolute
    pub ffmpeg_path: PathBuf,
    /// Directory for per-launch transcoder log files
    pub log_dir: PathBuf,
    /// Total time allowed for the transcoder to produce a playable playlist + first segment
    pub readiness_timeout_secs: u64,
    /// Interval between readiness checks
    pub poll_interval_ms: u64,
    /// How long after spawn to check for an immediate exit (unreachable source fast-fail)
    pub launch_grace_ms: u64,
    /// How long to wait after a graceful stop signal before force-killing
    pub stop_grace_secs: u64,
    /// First segment must exceed this size to count as real keyframe-bearing output
    pub min_segment_bytes: u64,
    /// HLS segment duration passed to the transcoder
    pub hls_segment_seconds: u32,
    pub video_bitrate: String,
    pub audio_bitrate: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./static"),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            log_dir: std::env::temp_dir(),
            readiness_timeout_secs: 15,
            poll_interval_ms: 500,
            launch_grace_ms: 1000,
            stop_grace_secs: 5,
            min_segment_bytes: 50_000,
            hls_segment_seconds: 2,
            video_bitrate: "2M".to_string(),
            audio_bitrate: "128k".to_string(),
        }
    }
}

impl StreamConfig {
    #[must_use]
    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_secs(self.readiness_timeout_secs)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn launch_grace(&self) -> Duration {
        Duration::from_millis(self.launch_grace_ms)
    }

    #[must_use]
    pub fn stop_grace(&self) -> Duration {
        Duration::from_secs(self.stop_grace_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// JSON document file backing the overlay store
    pub store_path: PathBuf,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("./overlays.json"),
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // Override with environment variables (LIVEGATE_SERVER_PORT, etc.)
        builder = builder.add_source(
            Environment::with_prefix("LIVEGATE")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only (for Docker/K8s)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load from file path
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Get HTTP bind address
    #[must_use]
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Fail-fast validation of values a misconfigured deployment commonly gets wrong.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push("server.port must be non-zero".to_string());
        }
        if self.server.public_base_url.is_empty() {
            errors.push("server.public_base_url must not be empty".to_string());
        }
        if self.stream.output_dir.as_os_str().is_empty() {
            errors.push("stream.output_dir must not be empty".to_string());
        }
        if self.stream.ffmpeg_path.as_os_str().is_empty() {
            errors.push("stream.ffmpeg_path must not be empty".to_string());
        }
        if self.stream.readiness_timeout_secs == 0 {
            errors.push("stream.readiness_timeout_secs must be non-zero".to_string());
        }
        if self.stream.poll_interval_ms == 0 {
            errors.push("stream.poll_interval_ms must be non-zero".to_string());
        }
        if !matches!(
            self.logging.level.to_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "warning" | "error"
        ) {
            errors.push(format!("logging.level is not a valid level: {}", self.logging.level));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
