//! ScanMarker step - finds the recording start marker in the clip head.

use crate::marker::{scanner, MarkerDecoder};
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, ScanOutput, StepOutcome};

/// Marker scan step backed by a [`MarkerDecoder`] provider.
pub struct ScanMarkerStep {
    decoder: Box<dyn MarkerDecoder>,
}

impl ScanMarkerStep {
    pub fn new(decoder: Box<dyn MarkerDecoder>) -> Self {
        Self { decoder }
    }
}

impl PipelineStep for ScanMarkerStep {
    fn name(&self) -> &str {
        "ScanMarker"
    }

    fn description(&self) -> &str {
        "Scan leading frames for a timecode marker"
    }

    fn validate_input(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if !state.has_probe() {
            return Err(StepError::invalid_input("probe data not available"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let rate = state.probe.as_ref().expect("validated").media.frame_rate;

        let window = scanner::window_frames(
            rate,
            ctx.settings.scan.window_seconds,
            ctx.settings.scan.min_window_frames,
        );
        ctx.logger
            .info(&format!("scanning up to {} frames for a marker", window));

        let frames = self
            .decoder
            .open(&ctx.job.input_path, window)
            .map_err(crate::marker::ScanError::from)?;
        let hit = scanner::scan(frames, window)?;

        ctx.logger.info(&format!(
            "marker in frame {}: start {}",
            hit.frame_index,
            hit.timestamp.to_rfc3339()
        ));

        state.marker = Some(ScanOutput {
            timestamp: hit.timestamp,
            frame_index: hit.frame_index,
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if !state.has_marker() {
            return Err(StepError::invalid_output("marker not recorded"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FrameRate, MediaInfo};
    use crate::orchestrator::test_support::{test_context, StubDecoder};
    use crate::orchestrator::types::ProbeOutput;
    use tempfile::tempdir;

    fn state_with_probe() -> JobState {
        let mut state = JobState::new("j");
        state.probe = Some(ProbeOutput {
            media: MediaInfo::new(10.0, FrameRate::new(25, 1).unwrap(), 1),
        });
        state
    }

    #[test]
    fn requires_probe_data() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path());
        let step = ScanMarkerStep::new(Box::new(StubDecoder::with_frames(vec![])));

        let state = JobState::new("j");
        let err = step.validate_input(&ctx, &state).unwrap_err();
        assert!(matches!(err, StepError::InvalidInput(_)));
    }

    #[test]
    fn records_the_marker_hit() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path());
        let step = ScanMarkerStep::new(Box::new(StubDecoder::with_frames(vec![
            vec![],
            vec!["oT250618091541.679oTD1oTZ2oTI0".to_string()],
        ])));

        let mut state = state_with_probe();
        let outcome = step.execute(&ctx, &mut state).unwrap();
        assert_eq!(outcome, StepOutcome::Success);

        let marker = state.marker.unwrap();
        assert_eq!(marker.frame_index, 1);
        assert_eq!(
            marker.timestamp.to_rfc3339(),
            "2025-06-18T09:15:41.679+00:00"
        );
    }

    #[test]
    fn markerless_clip_fails_the_step() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path());
        let step = ScanMarkerStep::new(Box::new(StubDecoder::with_frames(vec![vec![], vec![]])));

        let mut state = state_with_probe();
        let err = step.execute(&ctx, &mut state).unwrap_err();
        assert!(matches!(err, StepError::Scan(_)));
    }
}
