//! Marker decode provider: turns the leading frames of a clip into
//! candidate payload strings.
//!
//! The decode seam is a trait so the scanner has no dependency on a
//! specific barcode library. The shipped implementation dumps the scan
//! window as PNG frames with one ffmpeg call, then decodes each frame
//! lazily with `zbarimg` - frames past the first hit never touch the
//! decoder.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use thiserror::Error;

use crate::tools::{self, ToolError};

/// zbarimg exit status meaning "ran fine, no symbols in this image".
const ZBAR_NO_SYMBOLS: i32 = 4;

/// Errors from the decode provider.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Could not open or read the clip at all.
    #[error("failed to open {path}: {message}")]
    OpenFailed { path: PathBuf, message: String },

    /// Decode tool failure on a frame image.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Filesystem trouble with the frame dump.
    #[error("I/O error in frame dump: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-frame candidate payloads, in presentation order.
pub type FrameCandidateIter = Box<dyn Iterator<Item = Result<Vec<String>, DecodeError>>>;

/// Decodes candidate marker payloads from the leading frames of a clip.
pub trait MarkerDecoder {
    /// Open `path` and yield candidate payloads per frame, at most
    /// `max_frames` frames from frame 0.
    fn open(&self, path: &Path, max_frames: u32) -> Result<FrameCandidateIter, DecodeError>;
}

/// ffmpeg + zbarimg decode provider.
pub struct ZbarMarkerDecoder {
    ffmpeg: PathBuf,
    zbarimg: PathBuf,
    timeout: Duration,
}

impl ZbarMarkerDecoder {
    pub fn new(ffmpeg: impl Into<PathBuf>, zbarimg: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            zbarimg: zbarimg.into(),
            timeout,
        }
    }
}

impl MarkerDecoder for ZbarMarkerDecoder {
    fn open(&self, path: &Path, max_frames: u32) -> Result<FrameCandidateIter, DecodeError> {
        if !path.exists() {
            return Err(DecodeError::OpenFailed {
                path: path.to_path_buf(),
                message: "file does not exist".to_string(),
            });
        }

        let dump = TempDir::new()?;
        let pattern = dump.path().join("frame_%05d.png");

        tracing::debug!(
            "dumping up to {} frames of {} for marker scan",
            max_frames,
            path.display()
        );

        let input_arg = path.to_string_lossy().to_string();
        let pattern_arg = pattern.to_string_lossy().to_string();
        tools::run_checked(
            &self.ffmpeg,
            &[
                "-hide_banner",
                "-loglevel",
                "error",
                "-i",
                &input_arg,
                "-frames:v",
                &max_frames.to_string(),
                "-f",
                "image2",
                &pattern_arg,
            ],
            self.timeout,
        )
        .map_err(|e| DecodeError::OpenFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Box::new(ZbarFrames {
            dump,
            zbarimg: self.zbarimg.clone(),
            timeout: self.timeout,
            next_index: 1, // ffmpeg image2 numbering starts at 1
            max_index: max_frames,
        }))
    }
}

/// Lazy iterator over dumped frames; owns the dump directory so it is
/// removed as soon as scanning stops.
struct ZbarFrames {
    dump: TempDir,
    zbarimg: PathBuf,
    timeout: Duration,
    next_index: u32,
    max_index: u32,
}

impl ZbarFrames {
    fn decode_frame(&self, frame_path: &Path) -> Result<Vec<String>, DecodeError> {
        let frame_arg = frame_path.to_string_lossy().to_string();
        let output = tools::run_command(
            &self.zbarimg,
            &["--quiet", "--raw", &frame_arg],
            self.timeout,
        )?;

        match output.exit_code {
            0 => Ok(output
                .stdout
                .lines()
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()),
            ZBAR_NO_SYMBOLS => Ok(Vec::new()),
            code => Err(DecodeError::Tool(ToolError::CommandFailed {
                tool: "zbarimg".to_string(),
                exit_code: code,
                stderr: output.stderr.trim().to_string(),
            })),
        }
    }
}

impl Iterator for ZbarFrames {
    type Item = Result<Vec<String>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index > self.max_index {
            return None;
        }
        let frame_path = self
            .dump
            .path()
            .join(format!("frame_{:05}.png", self.next_index));
        // The clip ended before the window: end of stream.
        if !frame_path.exists() {
            return None;
        }
        self.next_index += 1;
        Some(self.decode_frame(&frame_path))
    }
}
