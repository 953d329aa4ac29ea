//! Clip discovery: walk the input directory for recognized video files.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use walkdir::WalkDir;

use super::signature::path_digest;
use super::types::ClipJob;

/// Recognized video file extensions (compared case-insensitively).
pub const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mov", "avi", "mkv", "mts"];

/// Errors from clip discovery.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Input root is missing or not a directory.
    #[error("input directory not found: {0}")]
    InputNotADirectory(PathBuf),

    /// Directory walk failed.
    #[error("failed to walk input directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Whether a path has a recognized video extension.
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            VIDEO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Walk `input_root` and create one [`ClipJob`] per recognized video
/// file, in a stable name-sorted order.
pub fn discover_clips(input_root: &Path) -> Result<Vec<ClipJob>, DiscoveryError> {
    if !input_root.is_dir() {
        return Err(DiscoveryError::InputNotADirectory(input_root.to_path_buf()));
    }

    let mut jobs = Vec::new();

    for entry in WalkDir::new(input_root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !is_video_file(path) {
            continue;
        }

        let relative = path
            .strip_prefix(input_root)
            .unwrap_or(path)
            .to_path_buf();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "clip".to_string());
        let id = generate_job_id(path);

        jobs.push(ClipJob::new(id, name, path.to_path_buf(), relative));
    }

    tracing::info!(
        "discovered {} video file(s) under {}",
        jobs.len(),
        input_root.display()
    );

    Ok(jobs)
}

/// Generate a unique job id: wall-clock millis plus a digest of the full
/// input path, so same-named clips in different folders never collide.
fn generate_job_id(input_path: &Path) -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    format!("job_{}_{}", timestamp, path_digest(input_path))
}
