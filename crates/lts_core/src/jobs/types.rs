//! Clip job types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Suffix appended to the output file's stem.
pub const OUTPUT_SUFFIX: &str = "_LTC";

/// One discovered clip: the unit of work for the pipeline. No state is
/// shared between jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipJob {
    /// Unique job identifier (also names the job's work directory).
    pub id: String,
    /// Display name, derived from the clip's file stem.
    pub name: String,
    /// Absolute (or walk-rooted) path to the input clip.
    pub input_path: PathBuf,
    /// Path relative to the input root; drives output mirroring.
    pub relative_path: PathBuf,
}

impl ClipJob {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        input_path: impl Into<PathBuf>,
        relative_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input_path: input_path.into(),
            relative_path: relative_path.into(),
        }
    }

    /// Output path for this job under `output_root`: the input's relative
    /// subpath is mirrored and the filename gains the `_LTC` suffix.
    pub fn output_path(&self, output_root: &Path) -> PathBuf {
        let parent = self.relative_path.parent().unwrap_or_else(|| Path::new(""));

        let stem = self
            .input_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.name.clone());

        let file_name = match self.input_path.extension() {
            Some(ext) => format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext.to_string_lossy()),
            None => format!("{}{}", stem, OUTPUT_SUFFIX),
        };

        output_root.join(parent).join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_mirrors_subdirs_and_appends_suffix() {
        let job = ClipJob::new(
            "job_1",
            "clip",
            "/in/day1/cam_a/clip.MP4",
            "day1/cam_a/clip.MP4",
        );
        assert_eq!(
            job.output_path(Path::new("/out")),
            PathBuf::from("/out/day1/cam_a/clip_LTC.MP4")
        );
    }

    #[test]
    fn output_path_at_root_has_no_subdir() {
        let job = ClipJob::new("job_1", "clip", "/in/clip.mov", "clip.mov");
        assert_eq!(
            job.output_path(Path::new("/out")),
            PathBuf::from("/out/clip_LTC.mov")
        );
    }
}
