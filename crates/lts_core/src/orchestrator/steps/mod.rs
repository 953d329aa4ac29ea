//! Pipeline step implementations.

pub mod mux;
pub mod probe;
pub mod scan;
pub mod synthesize;

pub use mux::MuxStep;
pub use probe::ProbeStep;
pub use scan::ScanMarkerStep;
pub use synthesize::SynthesizeStep;
