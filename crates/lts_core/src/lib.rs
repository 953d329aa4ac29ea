//! lts_core - backend logic for ltc-stamper.
//!
//! Reads a timecode marker from the head of each video clip, synthesizes
//! a matching LTC audio track, and remuxes it into a copy of the clip.
//! This crate contains all pipeline logic with zero CLI dependencies.

pub mod config;
pub mod jobs;
pub mod logging;
pub mod ltc;
pub mod marker;
pub mod models;
pub mod mux;
pub mod orchestrator;
pub mod probe;
pub mod signal;
pub mod tools;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
