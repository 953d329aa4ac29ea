//! Core types for the clip pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::jobs::ClipJob;
use crate::logging::JobLogger;
use crate::models::MediaInfo;

/// Read-only context passed to pipeline steps.
///
/// Contains the job, configuration, and shared resources that steps can
/// read but not modify. Mutable results go in [`JobState`].
pub struct Context {
    /// The clip being processed.
    pub job: ClipJob,
    /// Application settings.
    pub settings: Settings,
    /// Job-specific working directory (under temp_root); holds the
    /// temporary WAV artifact.
    pub work_dir: PathBuf,
    /// Root of the output tree.
    pub output_root: PathBuf,
    /// Per-job logger.
    pub logger: Arc<JobLogger>,
}

impl Context {
    /// Create a new context for a job.
    pub fn new(
        job: ClipJob,
        settings: Settings,
        work_dir: PathBuf,
        output_root: PathBuf,
        logger: Arc<JobLogger>,
    ) -> Self {
        Self {
            job,
            settings,
            work_dir,
            output_root,
            logger,
        }
    }

    /// The clip's output path under the output root.
    pub fn output_path(&self) -> PathBuf {
        self.job.output_path(&self.output_root)
    }
}

/// Mutable job state that accumulates results from pipeline steps.
///
/// This is the write-once manifest: each step records its output in its
/// own section and never overwrites another step's data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobState {
    /// Unique job identifier.
    pub job_id: String,
    /// When the job started.
    pub started_at: Option<String>,
    /// Probe results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<ProbeOutput>,
    /// Marker scan results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<ScanOutput>,
    /// Signal synthesis results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<SynthOutput>,
    /// Mux results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mux: Option<MuxOutput>,
}

impl JobState {
    /// Create a new job state with the given ID.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    /// Check if probing has been completed.
    pub fn has_probe(&self) -> bool {
        self.probe.is_some()
    }

    /// Check if a marker has been found.
    pub fn has_marker(&self) -> bool {
        self.marker.is_some()
    }

    /// Check if the signal artifact has been written.
    pub fn has_signal(&self) -> bool {
        self.signal.is_some()
    }
}

/// Output from the Probe step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeOutput {
    /// Probed media facts.
    pub media: MediaInfo,
}

/// Output from the ScanMarker step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutput {
    /// Recording start instant (UTC).
    pub timestamp: DateTime<Utc>,
    /// Frame index the marker was read from.
    pub frame_index: u32,
}

/// Output from the Synthesize step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthOutput {
    /// Path to the temporary WAV artifact (inside the job work dir).
    pub wav_path: PathBuf,
    /// Number of PCM samples written.
    pub samples: usize,
}

/// Output from the Mux step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuxOutput {
    /// Path to the final output file.
    pub output_path: PathBuf,
    /// ffmpeg exit code.
    pub exit_code: i32,
    /// The ffmpeg command that was run.
    pub command: String,
}

/// Result of executing a pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step completed successfully.
    Success,
    /// Step was skipped (preconditions not met, but not an error).
    Skipped(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FrameRate;

    #[test]
    fn job_state_tracks_completion() {
        let mut state = JobState::new("job_123");
        assert!(!state.has_probe());

        state.probe = Some(ProbeOutput {
            media: MediaInfo::new(10.0, FrameRate::new(25, 1).unwrap(), 1),
        });

        assert!(state.has_probe());
        assert!(!state.has_marker());
    }

    #[test]
    fn job_state_serializes() {
        let state = JobState::new("job_456");
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"job_id\":\"job_456\""));
    }
}
