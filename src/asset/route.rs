//! Asset route: source → class-relative output mapping.

use std::path::{Path, PathBuf};

use super::AssetKind;

/// Route information for a single asset.
///
/// This is the single source of truth for asset path mapping: `rel` is
/// both the file written under the class output directory and the key
/// recorded in that class's manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoute {
    /// Source file path (absolute)
    pub source: PathBuf,
    /// Output path relative to the class output directory, `/`-separated
    /// (e.g. "app.css" for "src/css/app.scss")
    pub rel: String,
    /// Regular source or verbatim plugin
    pub kind: AssetKind,
}

impl AssetRoute {
    pub fn new(source: PathBuf, rel: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            source,
            rel: rel.into(),
            kind,
        }
    }

    /// Output file path under `class_dir`.
    pub fn output_in(&self, class_dir: &Path) -> PathBuf {
        class_dir.join(&self.rel)
    }

    #[inline]
    pub fn is_plugin(&self) -> bool {
        self.kind == AssetKind::Plugin
    }
}

/// An asset after its class transformer ran, not yet written.
#[derive(Debug, Clone)]
pub struct TransformedAsset {
    pub route: AssetRoute,
    pub bytes: Vec<u8>,
}
