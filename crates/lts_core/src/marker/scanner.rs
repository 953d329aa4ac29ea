//! Bounded sequential scan of decoded frames for a parsable marker.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::decode::DecodeError;
use super::parser;
use crate::models::FrameRate;

/// Errors from scanning a clip for a marker.
#[derive(Error, Debug)]
pub enum ScanError {
    /// No frame in the window carried a parsable marker.
    #[error("no valid marker in the first {frames_scanned} frames")]
    NotFound { frames_scanned: u32 },

    /// The decode provider failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A successfully decoded marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerHit {
    /// Recording start instant, normalized to UTC.
    pub timestamp: DateTime<Utc>,
    /// Zero-based index of the frame the marker was read from.
    pub frame_index: u32,
}

/// Scan window in frames: `window_seconds` worth of frames, but never
/// fewer than `min_frames`.
pub fn window_frames(rate: FrameRate, window_seconds: f64, min_frames: u32) -> u32 {
    let by_rate = (rate.as_f64() * window_seconds).round() as u32;
    by_rate.max(min_frames)
}

/// Scan per-frame candidate payloads for the first one the parser accepts.
///
/// Frames are consumed strictly in order; within a frame, candidates are
/// tried in the order the decode provider yields them, and the first
/// successful parse ends the scan immediately. Unparsable candidates are
/// skipped; decode failures abort the scan.
pub fn scan<I>(frames: I, max_frames: u32) -> Result<MarkerHit, ScanError>
where
    I: IntoIterator<Item = Result<Vec<String>, DecodeError>>,
{
    let mut frames_scanned = 0u32;

    for (index, frame) in frames.into_iter().take(max_frames as usize).enumerate() {
        let candidates = frame?;
        frames_scanned += 1;

        for candidate in candidates {
            match parser::parse(&candidate) {
                Ok(timestamp) => {
                    tracing::debug!(
                        "marker found in frame {}: {}",
                        index,
                        timestamp.to_rfc3339()
                    );
                    return Ok(MarkerHit {
                        timestamp,
                        frame_index: index as u32,
                    });
                }
                Err(e) => {
                    tracing::trace!("frame {}: skipping candidate ({})", index, e);
                }
            }
        }
    }

    Err(ScanError::NotFound { frames_scanned })
}
