//! Per-job logging: dedicated log files with console echo and an
//! error-diagnosis tail buffer.

pub mod job_logger;
pub mod types;

pub use job_logger::JobLogger;
pub use types::{LogCallback, LogConfig, LogLevel, MessagePrefix};
