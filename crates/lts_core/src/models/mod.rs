//! Core data model: frame rates, timecodes, and probed media properties.

pub mod media;
pub mod timecode;

pub use media::MediaInfo;
pub use timecode::{FrameOfDayTimecode, FrameRate, FrameRateError};
