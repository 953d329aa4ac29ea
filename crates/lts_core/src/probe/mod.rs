//! Media probing using ffprobe.
//!
//! The probe seam is a trait so the pipeline has no hard dependency on a
//! specific probing tool; the shipped implementation shells out to
//! `ffprobe -of json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::models::{FrameRate, MediaInfo};
use crate::tools::{self, ToolError};

/// Errors from probing a media file.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Input file does not exist.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// The probe tool itself failed (missing, non-zero exit, timeout).
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Probe output was not valid JSON.
    #[error("probe output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Container duration missing or unparsable.
    #[error("no usable duration for {path}: {detail}")]
    MissingDuration { path: PathBuf, detail: String },

    /// No video stream, or its frame rate was unusable.
    #[error("no usable video frame rate for {path}: {detail}")]
    BadFrameRate { path: PathBuf, detail: String },
}

/// Result type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Reports a clip's duration, frame rate, and audio stream count.
pub trait MediaProbe {
    fn probe(&self, path: &Path) -> ProbeResult<MediaInfo>;
}

/// ffprobe-based probe.
pub struct FfprobeProbe {
    ffprobe: PathBuf,
    timeout: Duration,
}

impl FfprobeProbe {
    pub fn new(ffprobe: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            ffprobe: ffprobe.into(),
            timeout,
        }
    }
}

impl MediaProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> ProbeResult<MediaInfo> {
        if !path.exists() {
            return Err(ProbeError::FileNotFound(path.to_path_buf()));
        }

        tracing::debug!("probing {}", path.display());

        let path_arg = path.to_string_lossy();
        let output = tools::run_checked(
            &self.ffprobe,
            &[
                "-v",
                "error",
                "-show_entries",
                "format=duration:stream=codec_type,avg_frame_rate",
                "-of",
                "json",
                path_arg.as_ref(),
            ],
            self.timeout,
        )?;

        let json: Value = serde_json::from_str(&output.stdout)?;
        parse_probe_json(&json, path)
    }
}

/// Parse the JSON output from ffprobe into [`MediaInfo`].
fn parse_probe_json(json: &Value, path: &Path) -> ProbeResult<MediaInfo> {
    let duration_str = json
        .get("format")
        .and_then(|f| f.get("duration"))
        .and_then(|d| d.as_str())
        .ok_or_else(|| ProbeError::MissingDuration {
            path: path.to_path_buf(),
            detail: "format.duration absent".to_string(),
        })?;
    let duration_secs: f64 = duration_str
        .parse()
        .map_err(|_| ProbeError::MissingDuration {
            path: path.to_path_buf(),
            detail: format!("unparsable duration {duration_str:?}"),
        })?;

    let streams = json
        .get("streams")
        .and_then(|s| s.as_array())
        .cloned()
        .unwrap_or_default();

    let mut frame_rate = None;
    let mut audio_streams = 0;
    for stream in &streams {
        match stream.get("codec_type").and_then(|t| t.as_str()) {
            Some("video") if frame_rate.is_none() => {
                let raw = stream
                    .get("avg_frame_rate")
                    .and_then(|r| r.as_str())
                    .unwrap_or("");
                frame_rate = Some(FrameRate::parse(raw).map_err(|e| ProbeError::BadFrameRate {
                    path: path.to_path_buf(),
                    detail: e.to_string(),
                })?);
            }
            Some("audio") => audio_streams += 1,
            _ => {}
        }
    }

    let frame_rate = frame_rate.ok_or_else(|| ProbeError::BadFrameRate {
        path: path.to_path_buf(),
        detail: "no video stream".to_string(),
    })?;

    tracing::debug!(
        "{}: duration={:.3}s rate={} existing_audio={}",
        path.display(),
        duration_secs,
        frame_rate,
        audio_streams
    );

    Ok(MediaInfo::new(duration_secs, frame_rate, audio_streams))
}
