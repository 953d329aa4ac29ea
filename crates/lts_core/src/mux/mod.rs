//! Remuxing: ffmpeg command construction and execution.

pub mod options_builder;

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::logging::JobLogger;
use crate::tools::{self, ToolError};

pub use options_builder::FfmpegOptionsBuilder;

/// Errors from the remux step.
#[derive(Error, Debug)]
pub enum MuxError {
    /// ffmpeg missing, non-zero exit, or timeout.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// ffmpeg reported success but the output file is absent.
    #[error("remux produced no output file at {0}")]
    MissingOutput(PathBuf),

    /// Filesystem trouble around the remux call.
    #[error("I/O error during remux: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the remux command, streaming tool output into the job logger.
///
/// The captured stderr tail is replayed through the logger when ffmpeg
/// fails, so the per-job log always carries the diagnostic text.
pub fn run_remux(
    ffmpeg: &Path,
    tokens: &[String],
    logger: &JobLogger,
    timeout: Duration,
) -> Result<(), MuxError> {
    logger.command(&format!(
        "{} {}",
        ffmpeg.to_string_lossy(),
        tokens.join(" ")
    ));

    let output = tools::run_command(ffmpeg, tokens, timeout)?;

    for line in output.stdout.lines() {
        logger.output_line(line, false);
    }
    for line in output.stderr.lines() {
        logger.output_line(line, true);
    }

    if !output.success() {
        logger.show_tail("ffmpeg output");
        return Err(MuxError::Tool(ToolError::CommandFailed {
            tool: "ffmpeg".to_string(),
            exit_code: output.exit_code,
            stderr: output.stderr.trim().to_string(),
        }));
    }

    Ok(())
}
