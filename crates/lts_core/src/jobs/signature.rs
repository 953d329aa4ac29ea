//! Stable path digests for job identity.
//!
//! Two clips may share a base name (different subdirectories), so job ids
//! and work-directory names include a digest of the full input path
//! rather than the base name alone.

use std::path::Path;

use sha2::{Digest, Sha256};

/// Short stable hex digest of a clip path.
pub fn path_digest(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    let digest = hasher.finalize();

    digest
        .iter()
        .take(4)
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_and_short() {
        let a = path_digest(Path::new("/in/day1/clip.mp4"));
        let b = path_digest(Path::new("/in/day1/clip.mp4"));
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn same_base_name_in_different_dirs_differs() {
        let a = path_digest(Path::new("/in/day1/clip.mp4"));
        let b = path_digest(Path::new("/in/day2/clip.mp4"));
        assert_ne!(a, b);
    }
}
