//! Revision manifests: one `original → hashed` table per asset class.
//!
//! ```json
//! {
//!   "app.css": "app.1a2b3c4d.css",
//!   "normalize.css": "normalize.9f8e7d6c.css"
//! }
//! ```
//!
//! Keys and values are relative to the class output directory and always
//! use `/`. A manifest lives only between the revision step and the end of
//! the rewrite passes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::SiteConfig;
use crate::core::AssetClass;
use crate::pipeline::BuildError;

/// Sorted map from original to hashed output name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<String, String>,
}

impl Manifest {
    /// Insert an entry, returning the previous value if the key existed.
    pub fn insert(&mut self, original: String, hashed: String) -> Option<String> {
        self.entries.insert(original, hashed)
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries.get(original).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Write pretty JSON through a temporary file, so readers never see a
    /// partial manifest.
    pub fn write(&self, path: &Path) -> Result<(), BuildError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| BuildError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| BuildError::io(parent, err))?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json + "\n").map_err(|err| BuildError::io(&tmp, err))?;
        fs::rename(&tmp, path).map_err(|err| BuildError::io(path, err))
    }

    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let content = fs::read_to_string(path).map_err(|err| BuildError::io(path, err))?;
        serde_json::from_str(&content).map_err(|source| BuildError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl FromIterator<(String, String)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Manifest location of a revisioned class.
pub fn manifest_path(config: &SiteConfig, class: AssetClass) -> PathBuf {
    config
        .paths
        .output
        .class_dir(class)
        .join(&config.revision.manifest)
}

/// Delete the manifests of all revisioned classes.
///
/// Every manifest must exist. All of them are checked before the first one
/// is deleted.
pub fn remove_manifests(config: &SiteConfig) -> Result<usize, BuildError> {
    let paths: Vec<_> = AssetClass::REVISIONED
        .into_iter()
        .map(|class| manifest_path(config, class))
        .collect();

    for path in &paths {
        if let Err(err) = fs::metadata(path) {
            return Err(BuildError::io(path, err));
        }
    }
    for path in &paths {
        fs::remove_file(path).map_err(|err| BuildError::io(path, err))?;
    }
    Ok(paths.len())
}
