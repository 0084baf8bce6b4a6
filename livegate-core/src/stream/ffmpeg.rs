//! Transcode command builder
//!
//! Builds the ffmpeg invocation that pulls an RTSP feed and writes a live
//! HLS window (playlist + rolling segments) into the output directory.
//! Segment naming is fixed for player compatibility: `stream.m3u8`,
//! `stream000.ts`, `stream001.ts`, ...

use std::process::Stdio;
use tokio::process::Command;

use crate::config::StreamConfig;

/// Playlist file name inside the output directory
pub const PLAYLIST_NAME: &str = "stream.m3u8";

/// Common prefix of all artifacts (playlist and segments)
pub const SEGMENT_PREFIX: &str = "stream";

/// The first segment the transcoder writes; its size is the readiness signal
pub const FIRST_SEGMENT_NAME: &str = "stream000.ts";

/// Build the transcoder command for the given RTSP source.
///
/// Stderr is left piped; the supervisor redirects it into a per-launch log
/// file before spawning.
#[must_use]
pub fn hls_command(config: &StreamConfig, source_url: &str) -> Command {
    let playlist_path = config.output_dir.join(PLAYLIST_NAME);
    let segment_pattern = config.output_dir.join(format!("{SEGMENT_PREFIX}%03d.ts"));

    let mut command = Command::new(&config.ffmpeg_path);
    command
        .arg("-hide_banner")
        // Input: low-latency RTSP pull
        .arg("-fflags")
        .arg("nobuffer")
        .arg("-flags")
        .arg("low_delay")
        .arg("-i")
        .arg(source_url)
        // Video: fast software encode tuned for live latency
        .arg("-c:v")
        .arg("libx264")
        .arg("-preset")
        .arg("ultrafast")
        .arg("-tune")
        .arg("zerolatency")
        .arg("-x264-params")
        .arg("keyint=120:min-keyint=120:no-scenecut=1")
        .arg("-b:v")
        .arg(&config.video_bitrate)
        .arg("-maxrate")
        .arg(&config.video_bitrate)
        .arg("-bufsize")
        .arg("4M")
        // Audio: AAC in LATM framing for segment muxing
        .arg("-c:a")
        .arg("aac")
        .arg("-mpegts_flags")
        .arg("latm")
        .arg("-ar")
        .arg("48000")
        .arg("-ac")
        .arg("2")
        .arg("-b:a")
        .arg(&config.audio_bitrate)
        // Output: HLS with a bounded live window, old segments deleted
        .arg("-f")
        .arg("hls")
        .arg("-hls_time")
        .arg(config.hls_segment_seconds.to_string())
        .arg("-hls_flags")
        .arg("delete_segments+append_list")
        .arg("-hls_segment_filename")
        .arg(&segment_pattern)
        .arg(&playlist_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null());

    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args_of(command: &Command) -> Vec<String> {
        command
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_command_targets_configured_binary() {
        let config = StreamConfig {
            ffmpeg_path: PathBuf::from("/opt/ffmpeg/bin/ffmpeg"),
            ..StreamConfig::default()
        };
        let command = hls_command(&config, "rtsp://camera/stream");
        assert_eq!(
            command.as_std().get_program().to_string_lossy(),
            "/opt/ffmpeg/bin/ffmpeg"
        );
    }

    #[test]
    fn test_command_wires_source_and_outputs() {
        let config = StreamConfig {
            output_dir: PathBuf::from("/tmp/hls"),
            ..StreamConfig::default()
        };
        let command = hls_command(&config, "rtsp://camera/stream");
        let args = args_of(&command);

        let input_pos = args.iter().position(|a| a == "-i").expect("-i flag");
        assert_eq!(args[input_pos + 1], "rtsp://camera/stream");
        assert!(args.contains(&"/tmp/hls/stream%03d.ts".to_string()));
        // Playlist path is the final positional argument
        assert_eq!(args.last().map(String::as_str), Some("/tmp/hls/stream.m3u8"));
    }

    #[test]
    fn test_command_requests_rolling_segment_deletion() {
        let command = hls_command(&StreamConfig::default(), "rtsp://x");
        let args = args_of(&command);
        assert!(args.contains(&"delete_segments+append_list".to_string()));
    }

    #[test]
    fn test_command_keeps_latm_audio_framing() {
        let command = hls_command(&StreamConfig::default(), "rtsp://x");
        let args = args_of(&command);
        let pos = args
            .iter()
            .position(|a| a == "-mpegts_flags")
            .expect("-mpegts_flags flag");
        assert_eq!(args[pos + 1], "latm");
    }
}
