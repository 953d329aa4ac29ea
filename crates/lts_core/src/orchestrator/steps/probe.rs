//! Probe step - reads duration, frame rate, and audio stream count.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, ProbeOutput, StepOutcome};
use crate::probe::MediaProbe;

/// Probe step backed by a [`MediaProbe`] provider.
pub struct ProbeStep {
    probe: Box<dyn MediaProbe>,
}

impl ProbeStep {
    pub fn new(probe: Box<dyn MediaProbe>) -> Self {
        Self { probe }
    }
}

impl PipelineStep for ProbeStep {
    fn name(&self) -> &str {
        "Probe"
    }

    fn description(&self) -> &str {
        "Read clip duration and frame rate"
    }

    fn validate_input(&self, ctx: &Context, _state: &JobState) -> StepResult<()> {
        if !ctx.job.input_path.exists() {
            return Err(StepError::invalid_input(format!(
                "input file missing: {}",
                ctx.job.input_path.display()
            )));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let media = self.probe.probe(&ctx.job.input_path)?;

        ctx.logger.info(&format!(
            "duration {:.3}s, {} fps, {} existing audio stream(s)",
            media.duration_secs, media.frame_rate, media.audio_streams
        ));

        state.probe = Some(ProbeOutput { media });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let probe = state
            .probe
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("probe results not recorded"))?;

        if probe.media.duration_secs <= 0.0 {
            return Err(StepError::invalid_output(format!(
                "non-positive duration: {}",
                probe.media.duration_secs
            )));
        }
        Ok(())
    }
}
