//! Probed media properties.

use serde::{Deserialize, Serialize};

use super::timecode::FrameRate;

/// Container-level facts about a clip, as reported by the probe collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Container duration in seconds.
    pub duration_secs: f64,
    /// Primary video stream frame rate (exact rational).
    pub frame_rate: FrameRate,
    /// Number of pre-existing audio streams. The synthesized track is
    /// appended after these, which fixes its output stream index.
    pub audio_streams: usize,
}

impl MediaInfo {
    pub fn new(duration_secs: f64, frame_rate: FrameRate, audio_streams: usize) -> Self {
        Self {
            duration_secs,
            frame_rate,
            audio_streams,
        }
    }
}
