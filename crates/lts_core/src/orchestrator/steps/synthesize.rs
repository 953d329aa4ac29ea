//! Synthesize step - generates the LTC waveform and writes the WAV artifact.

use crate::ltc::SmpteFrameEncoder;
use crate::models::FrameOfDayTimecode;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, StepOutcome, SynthOutput};
use crate::signal::{self, SAMPLE_RATE};

/// Signal synthesis step.
pub struct SynthesizeStep;

impl SynthesizeStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SynthesizeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for SynthesizeStep {
    fn name(&self) -> &str {
        "Synthesize"
    }

    fn description(&self) -> &str {
        "Generate the LTC audio artifact"
    }

    fn validate_input(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if !state.has_probe() {
            return Err(StepError::invalid_input("probe data not available"));
        }
        if !state.has_marker() {
            return Err(StepError::invalid_input("no marker timestamp available"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let media = state.probe.as_ref().expect("validated").media.clone();
        let marker = state.marker.as_ref().expect("validated").clone();

        let start = FrameOfDayTimecode::from_datetime(&marker.timestamp, media.frame_rate);
        ctx.logger.info(&format!(
            "start timecode {} at {} fps",
            start, media.frame_rate
        ));

        let encoder = SmpteFrameEncoder::new(media.frame_rate);
        let pcm = signal::synthesize(start, media.frame_rate, media.duration_secs, &encoder)?;

        std::fs::create_dir_all(&ctx.work_dir)
            .map_err(|e| StepError::io_error("creating work directory", e))?;
        let wav_path = ctx.work_dir.join(format!("{}_ltc.wav", ctx.job.id));
        signal::write_wav(&wav_path, &pcm)?;

        ctx.logger.info(&format!(
            "wrote {} samples ({:.2}s at {} Hz) to {}",
            pcm.len(),
            pcm.len() as f64 / f64::from(SAMPLE_RATE),
            SAMPLE_RATE,
            wav_path.display()
        ));

        state.signal = Some(SynthOutput {
            wav_path,
            samples: pcm.len(),
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let signal = state
            .signal
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("signal artifact not recorded"))?;

        if !signal.wav_path.exists() {
            return Err(StepError::invalid_output(format!(
                "WAV artifact missing: {}",
                signal.wav_path.display()
            )));
        }

        let media = &state.probe.as_ref().expect("probed").media;
        let expected = (f64::from(SAMPLE_RATE) * media.duration_secs).floor() as usize;
        if signal.samples != expected {
            return Err(StepError::invalid_output(format!(
                "sample count {} does not match expected {}",
                signal.samples, expected
            )));
        }
        Ok(())
    }
}
