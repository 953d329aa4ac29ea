//! Clip processing pipeline: validated steps, per-job state, and the
//! batch queue processor.

pub mod errors;
pub mod pipeline;
pub mod queue_processor;
pub mod step;
pub mod steps;
pub mod types;

use std::time::Duration;

use crate::config::Settings;
use crate::marker::ZbarMarkerDecoder;
use crate::probe::FfprobeProbe;
use crate::tools::ToolPaths;

pub use errors::{PipelineError, PipelineResult, StepError, StepResult};
pub use pipeline::{Pipeline, PipelineRunResult};
pub use queue_processor::{JobResult, QueueProcessor};
pub use step::PipelineStep;
pub use steps::{MuxStep, ProbeStep, ScanMarkerStep, SynthesizeStep};
pub use types::{Context, JobState, StepOutcome};

/// Build the standard clip pipeline: Probe → ScanMarker → Synthesize → Mux.
pub fn create_clip_pipeline(tools: &ToolPaths, settings: &Settings) -> Pipeline {
    let probe_timeout = Duration::from_secs(settings.tools.probe_timeout_secs);
    let decode_timeout = Duration::from_secs(settings.tools.decode_timeout_secs);

    Pipeline::new()
        .with_step(ProbeStep::new(Box::new(FfprobeProbe::new(
            &tools.ffprobe,
            probe_timeout,
        ))))
        .with_step(ScanMarkerStep::new(Box::new(ZbarMarkerDecoder::new(
            &tools.ffmpeg,
            &tools.zbarimg,
            decode_timeout,
        ))))
        .with_step(SynthesizeStep::new())
        .with_step(MuxStep::new(&tools.ffmpeg))
}
