//! Mtime-based freshness detection for development builds.
//!
//! A development build skips an output whose modification time is not
//! older than its source.

use std::path::Path;
use std::time::SystemTime;

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Check if file A is newer than file B
///
/// Returns `true` if A exists and is newer than B
/// Returns `false` if either file doesn't exist or times can't be compared
pub fn is_newer_than(a: &Path, b: &Path) -> bool {
    let (Some(a_time), Some(b_time)) = (get_mtime(a), get_mtime(b)) else {
        return false;
    };
    a_time > b_time
}

/// Check if `output` must be (re)written from `source`.
///
/// Missing outputs are always stale.
pub fn is_stale(source: &Path, output: &Path) -> bool {
    !output.exists() || is_newer_than(source, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_missing_output_is_stale() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.html");
        fs::write(&source, "<p>").unwrap();
        assert!(is_stale(&source, &dir.path().join("out.html")));
    }

    #[test]
    fn test_newer_source_is_stale() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.html");
        let output = dir.path().join("b.html");
        fs::write(&output, "<p>").unwrap();
        thread::sleep(Duration::from_millis(20));
        fs::write(&source, "<p>new").unwrap();

        assert!(is_newer_than(&source, &output));
        assert!(is_stale(&source, &output));
        assert!(!is_stale(&output, &source));
    }

    #[test]
    fn test_missing_files_not_newer() {
        let dir = TempDir::new().unwrap();
        assert!(!is_newer_than(&dir.path().join("x"), &dir.path().join("y")));
    }
}
