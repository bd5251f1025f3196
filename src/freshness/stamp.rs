//! Which kind of build last wrote the output root.
//!
//! Incremental development builds trust output mtimes, which is only sound
//! when the output was written by a development build into the same root.
//! The stamp lives in the project cache, never in the output:
//!
//! ```json
//! { "mode": "development", "output": "/site/dist" }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::BuildMode;

/// Cache directory name (inside project root)
pub const CACHE_DIR: &str = ".assetline/cache";
const STAMP_FILE: &str = "output.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StampMode {
    Development,
    Release,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputStamp {
    pub mode: StampMode,
    pub output: PathBuf,
}

impl OutputStamp {
    pub fn new(mode: BuildMode, output: &Path) -> Self {
        let mode = if mode.incremental {
            StampMode::Development
        } else {
            StampMode::Release
        };
        Self {
            mode,
            output: output.to_path_buf(),
        }
    }

    pub fn path(root: &Path) -> PathBuf {
        root.join(CACHE_DIR).join(STAMP_FILE)
    }

    /// Missing or unreadable stamps count as unknown output.
    pub fn load(root: &Path) -> Option<Self> {
        let json = fs::read_to_string(Self::path(root)).ok()?;
        serde_json::from_str(&json).ok()
    }

    pub fn save(&self, root: &Path) -> std::io::Result<()> {
        let path = Self::path(root);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)
    }

    /// An incremental build may reuse output described by `previous`.
    pub fn can_reuse(&self, previous: Option<&Self>) -> bool {
        self.mode == StampMode::Development && previous == Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let stamp = OutputStamp::new(BuildMode::DEVELOPMENT, Path::new("/site/dist"));
        assert_eq!(OutputStamp::load(dir.path()), None);

        stamp.save(dir.path()).unwrap();
        assert_eq!(OutputStamp::load(dir.path()), Some(stamp));
        let json = fs::read_to_string(OutputStamp::path(dir.path())).unwrap();
        assert!(json.contains("\"development\""));
    }

    #[test]
    fn test_reuse_only_after_development() {
        let dist = Path::new("/site/dist");
        let dev = OutputStamp::new(BuildMode::DEVELOPMENT, dist);
        let release = OutputStamp::new(BuildMode::RELEASE, dist);

        assert!(dev.can_reuse(Some(&dev.clone())));
        assert!(!dev.can_reuse(Some(&release)));
        assert!(!dev.can_reuse(None));
        assert!(!release.can_reuse(Some(&release.clone())));

        let elsewhere = OutputStamp::new(BuildMode::DEVELOPMENT, Path::new("/site/public"));
        assert!(!dev.can_reuse(Some(&elsewhere)));
    }

    #[test]
    fn test_malformed_stamp_is_unknown() {
        let dir = TempDir::new().unwrap();
        let path = OutputStamp::path(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();
        assert_eq!(OutputStamp::load(dir.path()), None);
    }
}
