//! Queue processor for running discovered clips through the pipeline.
//!
//! Per-job failures become [`JobResult::failure`] values; the queue
//! always continues with the next clip.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::jobs::ClipJob;
use crate::logging::{JobLogger, LogCallback, LogConfig};
use crate::tools::ToolPaths;

use super::pipeline::{Pipeline, PipelineRunResult};
use super::types::{Context, JobState};
use super::create_clip_pipeline;

/// Result of processing a single clip.
#[derive(Debug, Clone)]
pub struct JobResult {
    /// Job ID that was processed.
    pub job_id: String,
    /// Display name of the clip.
    pub name: String,
    /// Input path of the clip.
    pub input_path: PathBuf,
    /// Whether the job completed successfully.
    pub success: bool,
    /// Path to the output file (if successful).
    pub output_path: Option<PathBuf>,
    /// Error message (if failed).
    pub error: Option<String>,
    /// Steps that completed.
    pub steps_completed: Vec<String>,
    /// Steps that were skipped.
    pub steps_skipped: Vec<String>,
}

impl JobResult {
    /// Create a successful result.
    pub fn success(job: &ClipJob, output_path: PathBuf, run_result: PipelineRunResult) -> Self {
        Self {
            job_id: job.id.clone(),
            name: job.name.clone(),
            input_path: job.input_path.clone(),
            success: true,
            output_path: Some(output_path),
            error: None,
            steps_completed: run_result.steps_completed,
            steps_skipped: run_result.steps_skipped,
        }
    }

    /// Create a failed result.
    pub fn failure(job: &ClipJob, error: impl Into<String>) -> Self {
        Self {
            job_id: job.id.clone(),
            name: job.name.clone(),
            input_path: job.input_path.clone(),
            success: false,
            output_path: None,
            error: Some(error.into()),
            steps_completed: Vec::new(),
            steps_skipped: Vec::new(),
        }
    }
}

/// Removes the job's work directory (and its WAV artifact) when the job
/// scope ends, whatever the outcome.
struct WorkDirGuard {
    path: PathBuf,
}

impl WorkDirGuard {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Drop for WorkDirGuard {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_dir_all(&self.path) {
                tracing::warn!(
                    "failed to remove work directory {}: {}",
                    self.path.display(),
                    e
                );
            } else {
                tracing::debug!("removed work directory {}", self.path.display());
            }
        }
    }
}

/// Processor for running clip jobs through the pipeline.
pub struct QueueProcessor {
    /// Application settings.
    settings: Settings,
    /// Resolved external tools.
    tools: ToolPaths,
    /// Directory for per-job log files.
    log_dir: PathBuf,
    /// Root for per-job working directories.
    work_root: PathBuf,
    /// Output directory root.
    output_root: PathBuf,
}

impl QueueProcessor {
    pub fn new(
        settings: Settings,
        tools: ToolPaths,
        log_dir: PathBuf,
        work_root: PathBuf,
        output_root: PathBuf,
    ) -> Self {
        Self {
            settings,
            tools,
            log_dir,
            work_root,
            output_root,
        }
    }

    /// Process a single clip with the standard pipeline.
    pub fn process_job(&self, job: &ClipJob, callback: Option<LogCallback>) -> JobResult {
        let pipeline = create_clip_pipeline(&self.tools, &self.settings);
        self.process_job_with(job, &pipeline, callback)
    }

    /// Process a single clip with a caller-supplied pipeline.
    pub fn process_job_with(
        &self,
        job: &ClipJob,
        pipeline: &Pipeline,
        callback: Option<LogCallback>,
    ) -> JobResult {
        let work_dir = self.work_root.join(&job.id);
        if let Err(e) = fs::create_dir_all(&work_dir) {
            return JobResult::failure(job, format!("failed to create work directory: {}", e));
        }
        let _work_guard = WorkDirGuard::new(work_dir.clone());

        let logger = match JobLogger::new(
            format!("{}_{}", job.name, job.id),
            &self.log_dir,
            LogConfig::from_settings(&self.settings.logging),
            callback,
        ) {
            Ok(l) => Arc::new(l),
            Err(e) => {
                return JobResult::failure(job, format!("failed to create logger: {}", e));
            }
        };

        let ctx = Context::new(
            job.clone(),
            self.settings.clone(),
            work_dir,
            self.output_root.clone(),
            logger,
        );
        let mut state = JobState::new(&job.id);

        ctx.logger
            .info(&format!("Processing: {}", job.input_path.display()));

        match pipeline.run(&ctx, &mut state) {
            Ok(run_result) => {
                let output_path = state
                    .mux
                    .as_ref()
                    .map(|m| m.output_path.clone())
                    .unwrap_or_else(|| ctx.output_path());

                ctx.logger
                    .info(&format!("Job completed: {}", output_path.display()));
                JobResult::success(job, output_path, run_result)
            }
            Err(e) => {
                let error_msg = e.to_string();
                ctx.logger.error(&error_msg);
                JobResult::failure(job, error_msg)
            }
        }
    }

    /// Process every job in order, collecting results. A failing job
    /// never stops the queue.
    pub fn process_queue<F>(&self, jobs: &[ClipJob], callback_factory: F) -> Vec<JobResult>
    where
        F: Fn(&ClipJob) -> Option<LogCallback>,
    {
        self.process_queue_with(jobs, |_| create_clip_pipeline(&self.tools, &self.settings), callback_factory)
    }

    /// Like [`process_queue`](Self::process_queue), with a caller-supplied
    /// pipeline factory.
    pub fn process_queue_with<P, F>(
        &self,
        jobs: &[ClipJob],
        pipeline_factory: P,
        callback_factory: F,
    ) -> Vec<JobResult>
    where
        P: Fn(&ClipJob) -> Pipeline,
        F: Fn(&ClipJob) -> Option<LogCallback>,
    {
        let mut results = Vec::with_capacity(jobs.len());

        for (i, job) in jobs.iter().enumerate() {
            tracing::info!("processing job {}/{}: {}", i + 1, jobs.len(), job.name);

            let pipeline = pipeline_factory(job);
            let callback = callback_factory(job);
            results.push(self.process_job_with(job, &pipeline, callback));
        }

        results
    }
}
