//! `[revision]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [revision]
//! enable = true                  # content-hash file names in release builds
//! length = 8                     # hex chars of the fingerprint
//! manifest = "rev-manifest.json" # per-class manifest file name
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevisionConfig {
    /// Enable content hashing for release builds.
    pub enable: bool,
    /// Fingerprint length in hex characters.
    pub length: usize,
    /// Manifest file name, written in each class output directory.
    pub manifest: String,
}

impl Default for RevisionConfig {
    fn default() -> Self {
        Self {
            enable: true,
            length: 8,
            manifest: "rev-manifest.json".into(),
        }
    }
}

const LENGTH: FieldPath = FieldPath::new("revision.length");
const MANIFEST: FieldPath = FieldPath::new("revision.manifest");

impl RevisionConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !(4..=64).contains(&self.length) {
            diag.error_with_hint(
                LENGTH,
                format!("length {} is out of range", self.length),
                "use a value between 4 and 64",
            );
        }

        let name = self.manifest.as_str();
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            diag.error(
                MANIFEST,
                format!("`{name}` must be a plain file name"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert!(config.revision.enable);
        assert_eq!(config.revision.length, 8);
        assert_eq!(config.revision.manifest, "rev-manifest.json");
    }

    #[test]
    fn test_invalid_values() {
        let config = test_parse_config("[revision]\nlength = 2\nmanifest = \"a/b.json\"");
        let mut diag = ConfigDiagnostics::new();
        config.revision.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
