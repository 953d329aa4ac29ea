//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Every field has a serde default so a partial (or absent) config file
//! always yields a usable configuration.

use serde::{Deserialize, Serialize};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// External tool locations and timeouts.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Marker scan window settings.
    #[serde(default)]
    pub scan: ScanSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Path configuration for temp and log directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Root folder for per-job working files (WAV artifacts).
    #[serde(default = "default_temp_root")]
    pub temp_root: String,

    /// Folder for per-job log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_temp_root() -> String {
    ".ltc-work".to_string()
}

fn default_logs_folder() -> String {
    ".ltc-logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            temp_root: default_temp_root(),
            logs_folder: default_logs_folder(),
        }
    }
}

/// External tool locations. Empty string means "find on PATH".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Path to ffmpeg (empty = PATH lookup).
    #[serde(default)]
    pub ffmpeg: String,

    /// Path to ffprobe (empty = PATH lookup).
    #[serde(default)]
    pub ffprobe: String,

    /// Path to zbarimg (empty = PATH lookup).
    #[serde(default)]
    pub zbarimg: String,

    /// Timeout for probe calls, seconds.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Timeout for frame extraction and marker decoding, seconds.
    #[serde(default = "default_decode_timeout")]
    pub decode_timeout_secs: u64,

    /// Timeout for the remux call, seconds.
    #[serde(default = "default_mux_timeout")]
    pub mux_timeout_secs: u64,
}

fn default_probe_timeout() -> u64 {
    60
}

fn default_decode_timeout() -> u64 {
    120
}

fn default_mux_timeout() -> u64 {
    1800
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffmpeg: String::new(),
            ffprobe: String::new(),
            zbarimg: String::new(),
            probe_timeout_secs: default_probe_timeout(),
            decode_timeout_secs: default_decode_timeout(),
            mux_timeout_secs: default_mux_timeout(),
        }
    }
}

/// Marker scan window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Seconds of video to scan from the head of the clip.
    #[serde(default = "default_window_seconds")]
    pub window_seconds: f64,

    /// Never scan fewer frames than this, regardless of frame rate.
    #[serde(default = "default_min_window_frames")]
    pub min_window_frames: u32,
}

fn default_window_seconds() -> f64 {
    10.0
}

fn default_min_window_frames() -> u32 {
    50
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            window_seconds: default_window_seconds(),
            min_window_frames: default_min_window_frames(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Use compact log format (filter progress, keep a tail for errors).
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of external-tool output lines kept for error diagnosis.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Progress update step percentage.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,

    /// Show the full ffmpeg argument list in per-job logs.
    #[serde(default)]
    pub show_args_pretty: bool,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

fn default_progress_step() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            compact: true,
            error_tail: default_error_tail(),
            progress_step: default_progress_step(),
            show_args_pretty: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.scan.window_seconds, 10.0);
        assert_eq!(s.scan.min_window_frames, 50);
        assert!(s.tools.ffmpeg.is_empty());
        assert_eq!(s.logging.error_tail, 20);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let s: Settings = toml::from_str(
            r#"
            [tools]
            ffmpeg = "/opt/ffmpeg/bin/ffmpeg"
            "#,
        )
        .unwrap();
        assert_eq!(s.tools.ffmpeg, "/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(s.tools.probe_timeout_secs, 60);
        assert_eq!(s.paths.temp_root, ".ltc-work");
    }

    #[test]
    fn round_trips_through_toml() {
        let s = Settings::default();
        let text = toml::to_string_pretty(&s).unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back.scan.min_window_frames, s.scan.min_window_frames);
    }
}
