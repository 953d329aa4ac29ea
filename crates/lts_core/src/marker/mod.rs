//! Marker acquisition: payload parsing, frame decoding, and the bounded scan.

pub mod decode;
pub mod parser;
pub mod scanner;

pub use decode::{DecodeError, FrameCandidateIter, MarkerDecoder, ZbarMarkerDecoder};
pub use parser::ParseError;
pub use scanner::{MarkerHit, ScanError};
