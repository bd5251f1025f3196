//! `[paths]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [paths.source]
//! html = "src/html"          # *.html pages
//! css = "src/css"            # *.scss entry points (_*.scss are partials)
//! js = "src/js"              # *.js sources
//! assets = "src/assets"      # images and other static files
//! plugins = "plugins"        # css/plugins/*.css and js/plugins/*.js, copied verbatim
//!
//! [paths.output]
//! root = "dist"              # HTML is written here
//! css = "css"                # dist/css
//! js = "js"                  # dist/js
//! assets = "assets"          # dist/assets
//! ```

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::AssetClass;
use crate::utils::path::normalize_path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathsConfig {
    /// Source directories.
    pub source: SourcePaths,
    /// Output layout.
    pub output: OutputPaths,
}

/// Source directories, one per asset class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcePaths {
    pub html: PathBuf,
    pub css: PathBuf,
    pub js: PathBuf,
    pub assets: PathBuf,
    /// Subdirectory of `css` and `js` holding third-party files copied as-is.
    pub plugins: PathBuf,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            html: "src/html".into(),
            css: "src/css".into(),
            js: "src/js".into(),
            assets: "src/assets".into(),
            plugins: "plugins".into(),
        }
    }
}

impl SourcePaths {
    /// Source directory of an asset class.
    pub fn class_dir(&self, class: AssetClass) -> &Path {
        match class {
            AssetClass::Html => &self.html,
            AssetClass::Css => &self.css,
            AssetClass::Js => &self.js,
            AssetClass::Image => &self.assets,
        }
    }

    /// Verbatim plugin directory of an asset class, if the class has one.
    pub fn plugins_dir(&self, class: AssetClass) -> Option<PathBuf> {
        match class {
            AssetClass::Css | AssetClass::Js => Some(self.class_dir(class).join(&self.plugins)),
            AssetClass::Html | AssetClass::Image => None,
        }
    }
}

/// Output layout: a single root with one subdirectory per asset class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub root: PathBuf,
    pub css: PathBuf,
    pub js: PathBuf,
    pub assets: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            root: "dist".into(),
            css: "css".into(),
            js: "js".into(),
            assets: "assets".into(),
        }
    }
}

impl OutputPaths {
    /// Output directory of an asset class.
    pub fn class_dir(&self, class: AssetClass) -> PathBuf {
        match class {
            AssetClass::Html => self.root.clone(),
            _ => self.root.join(self.subdir(class)),
        }
    }

    /// Class directory relative to the output root (empty for HTML).
    pub fn subdir(&self, class: AssetClass) -> &Path {
        match class {
            AssetClass::Html => Path::new(""),
            AssetClass::Css => &self.css,
            AssetClass::Js => &self.js,
            AssetClass::Image => &self.assets,
        }
    }
}

const OUTPUT_SUBDIRS: [(FieldPath, AssetClass); 3] = [
    (FieldPath::new("paths.output.css"), AssetClass::Css),
    (FieldPath::new("paths.output.js"), AssetClass::Js),
    (FieldPath::new("paths.output.assets"), AssetClass::Image),
];
const PLUGINS: FieldPath = FieldPath::new("paths.source.plugins");
const OUTPUT_ROOT: FieldPath = FieldPath::new("paths.output.root");

impl PathsConfig {
    /// Resolve source directories and output root against the project root.
    ///
    /// Output class directories stay relative to the output root.
    pub fn normalize(&mut self, root: &Path) {
        let source = &mut self.source;
        for dir in [
            &mut source.html,
            &mut source.css,
            &mut source.js,
            &mut source.assets,
        ] {
            *dir = normalize_path(&root.join(&*dir));
        }
        self.output.root = normalize_path(&root.join(&self.output.root));
    }

    /// Validate raw (not yet normalized) paths.
    ///
    /// # Checks
    /// - output class directories are non-empty, relative and stay inside the root
    /// - output class directories are pairwise distinct
    /// - the plugins directory is a relative subdirectory
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.output.root.as_os_str().is_empty() {
            diag.error(OUTPUT_ROOT, "output root must not be empty");
        }

        let mut seen: Vec<(FieldPath, PathBuf)> = Vec::new();
        for (field, class) in OUTPUT_SUBDIRS {
            let dir = match class {
                AssetClass::Css => &self.output.css,
                AssetClass::Js => &self.output.js,
                _ => &self.output.assets,
            };

            if !is_plain_subdir(dir) {
                diag.error_with_hint(
                    field,
                    format!("`{}` is not a subdirectory of the output root", dir.display()),
                    "use a relative path without `..`, e.g. \"css\"",
                );
                continue;
            }

            if let Some((other, _)) = seen.iter().find(|(_, d)| d == dir) {
                diag.error(
                    field,
                    format!("`{}` is already used by {}", dir.display(), other),
                );
                continue;
            }
            seen.push((field, dir.clone()));
        }

        if !is_plain_subdir(&self.source.plugins) {
            diag.error(
                PLUGINS,
                format!(
                    "`{}` must be a relative subdirectory name",
                    self.source.plugins.display()
                ),
            );
        }
    }
}

impl PathsConfig {
    /// Validate normalized paths against the project root.
    ///
    /// `clean` empties the output root, so it must not be the project root
    /// or hold any source directory.
    pub fn validate_layout(&self, root: &Path, diag: &mut ConfigDiagnostics) {
        let output = &self.output.root;
        if output == root {
            diag.error_with_hint(
                OUTPUT_ROOT,
                "output root is the project root",
                "use a dedicated directory, e.g. \"dist\"",
            );
            return;
        }

        let source = &self.source;
        for dir in [&source.html, &source.css, &source.js, &source.assets] {
            if dir.starts_with(output) {
                diag.error(
                    OUTPUT_ROOT,
                    format!("`{}` contains source directory `{}`", output.display(), dir.display()),
                );
            }
        }
    }
}

/// Non-empty relative path made only of normal components.
fn is_plain_subdir(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.paths.source.css, PathBuf::from("src/css"));
        assert_eq!(config.paths.output.root, PathBuf::from("dist"));
        assert_eq!(
            config.paths.output.class_dir(AssetClass::Js),
            PathBuf::from("dist/js")
        );
        assert_eq!(
            config.paths.output.class_dir(AssetClass::Html),
            PathBuf::from("dist")
        );
    }

    #[test]
    fn test_plugins_dir() {
        let config = test_parse_config("[paths.source]\nplugins = \"vendor\"");
        assert_eq!(
            config.paths.source.plugins_dir(AssetClass::Css),
            Some(PathBuf::from("src/css/vendor"))
        );
        assert_eq!(config.paths.source.plugins_dir(AssetClass::Image), None);
    }

    #[test]
    fn test_validate_rejects_escaping_dir() {
        let config = test_parse_config("[paths.output]\ncss = \"../css\"");
        let mut diag = ConfigDiagnostics::new();
        config.paths.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field.as_str(), "paths.output.css");
    }

    #[test]
    fn test_validate_rejects_shared_dir() {
        let config = test_parse_config("[paths.output]\ncss = \"static\"\njs = \"static\"");
        let mut diag = ConfigDiagnostics::new();
        config.paths.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field.as_str(), "paths.output.js");
    }

    #[test]
    fn test_validate_layout_rejects_source_inside_output() {
        let mut config = test_parse_config("[paths.output]\nroot = \"src\"");
        config.paths.normalize(Path::new("/site"));
        let mut diag = ConfigDiagnostics::new();
        config.paths.validate_layout(Path::new("/site"), &mut diag);
        assert_eq!(diag.len(), 4);

        let mut config = test_parse_config("[paths.output]\nroot = \".\"");
        config.paths.normalize(Path::new("/site"));
        let mut diag = ConfigDiagnostics::new();
        config.paths.validate_layout(Path::new("/site"), &mut diag);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_validate_defaults_ok() {
        let config = test_parse_config("");
        let mut diag = ConfigDiagnostics::new();
        config.paths.validate(&mut diag);
        assert!(diag.is_empty());
    }
}
