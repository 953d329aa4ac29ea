//! Mux step - merges the synthesized track into a copy of the clip.

use std::path::PathBuf;
use std::time::Duration;

use crate::mux::{self, FfmpegOptionsBuilder};
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, MuxOutput, StepOutcome};

/// Mux step running the external remux tool.
pub struct MuxStep {
    ffmpeg: PathBuf,
}

impl MuxStep {
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
        }
    }
}

impl PipelineStep for MuxStep {
    fn name(&self) -> &str {
        "Mux"
    }

    fn description(&self) -> &str {
        "Add the LTC track to a copy of the clip"
    }

    fn validate_input(&self, ctx: &Context, state: &JobState) -> StepResult<()> {
        if !state.has_probe() {
            return Err(StepError::invalid_input("probe data not available"));
        }
        if !state.has_marker() {
            return Err(StepError::invalid_input("no marker timestamp available"));
        }
        let signal = state
            .signal
            .as_ref()
            .ok_or_else(|| StepError::invalid_input("no signal artifact available"))?;
        if !signal.wav_path.exists() {
            return Err(StepError::invalid_input(format!(
                "WAV artifact missing: {}",
                signal.wav_path.display()
            )));
        }

        let output_path = ctx.output_path();
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StepError::io_error("creating output directory", e))?;
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let media = state.probe.as_ref().expect("probed").media.clone();
        let marker = state.marker.as_ref().expect("validated").clone();
        let wav_path = state.signal.as_ref().expect("validated").wav_path.clone();

        let output_path = ctx.output_path();
        ctx.logger
            .info(&format!("output: {}", output_path.display()));

        let tokens = FfmpegOptionsBuilder::new(
            &ctx.job.input_path,
            &wav_path,
            &output_path,
            &marker.timestamp,
            media.audio_streams,
        )
        .build();

        if ctx.settings.logging.show_args_pretty {
            ctx.logger.log_args_pretty("ffmpeg", &tokens);
        }

        let timeout = Duration::from_secs(ctx.settings.tools.mux_timeout_secs);
        mux::run_remux(&self.ffmpeg, &tokens, &ctx.logger, timeout)?;

        state.mux = Some(MuxOutput {
            output_path: output_path.clone(),
            exit_code: 0,
            command: format!("{} {}", self.ffmpeg.to_string_lossy(), tokens.join(" ")),
        });

        ctx.logger.success(&format!(
            "muxed: {}",
            output_path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
        ));
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let mux = state
            .mux
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("mux results not recorded"))?;

        if !mux.output_path.exists() {
            return Err(StepError::invalid_output(format!(
                "output file not created: {}",
                mux.output_path.display()
            )));
        }
        Ok(())
    }
}
