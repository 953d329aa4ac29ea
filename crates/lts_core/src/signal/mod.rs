//! LTC signal synthesis: bitstream, biphase transform, PCM, WAV artifact.

pub mod biphase;
pub mod synth;
pub mod wav;

pub use biphase::biphase_mark;
pub use synth::{synthesize, SynthesisError, SAMPLE_RATE};
pub use wav::write_wav;
