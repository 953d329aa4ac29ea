//! Error types for the clip pipeline.
//!
//! Errors carry context that chains through layers:
//! Job → Step → module error.

use std::io;

use thiserror::Error;

use crate::marker::ScanError;
use crate::mux::MuxError;
use crate::probe::ProbeError;
use crate::signal::SynthesisError;

/// Top-level pipeline error with job context.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A step failed during execution.
    #[error("job '{job_name}' failed at step '{step_name}': {source}")]
    StepFailed {
        job_name: String,
        step_name: String,
        #[source]
        source: StepError,
    },

    /// Failed to set up the job (create directories, logger, etc.).
    #[error("job '{job_name}' setup failed: {message}")]
    SetupFailed { job_name: String, message: String },
}

impl PipelineError {
    /// Create a step failed error.
    pub fn step_failed(
        job_name: impl Into<String>,
        step_name: impl Into<String>,
        source: StepError,
    ) -> Self {
        Self::StepFailed {
            job_name: job_name.into(),
            step_name: step_name.into(),
            source,
        }
    }

    /// Create a setup failed error.
    pub fn setup_failed(job_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SetupFailed {
            job_name: job_name.into(),
            message: message.into(),
        }
    }
}

/// Error from a pipeline step.
#[derive(Error, Debug)]
pub enum StepError {
    /// Input validation failed.
    #[error("input validation failed: {0}")]
    InvalidInput(String),

    /// Output validation failed.
    #[error("output validation failed: {0}")]
    InvalidOutput(String),

    /// Probing the clip failed.
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// Marker scan failed (no marker, or decode trouble).
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Signal synthesis failed.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// Remuxing failed.
    #[error(transparent)]
    Mux(#[from] MuxError),

    /// File I/O error with operation context.
    #[error("I/O error in {operation}: {source}")]
    IoError {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl StepError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an invalid output error.
    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }

    /// Create an I/O error with context.
    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::IoError {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type for step operations.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
