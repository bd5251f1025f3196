//! Project configuration management for `assetline.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── paths      # [paths.source], [paths.output]
//! │   ├── html       # [html]
//! │   ├── css        # [css]
//! │   ├── js         # [js]
//! │   ├── image      # [image.jpeg], [image.png], [image.svg]
//! │   └── revision   # [revision]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! The configuration is loaded once at startup, validated before any file
//! is touched, and then passed by reference to every pipeline stage.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    CssConfig, HtmlConfig, ImageConfig, JsConfig, OutputPaths, PathsConfig, RevisionConfig,
    SourcePaths,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, Commands},
    debug, log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing assetline.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SiteConfig {
    /// Absolute path to the config file, empty when running on defaults
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Source and output directories
    #[serde(default)]
    pub paths: PathsConfig,

    /// HTML minification
    #[serde(default)]
    pub html: HtmlConfig,

    /// Stylesheet prefixing and minification
    #[serde(default)]
    pub css: CssConfig,

    /// Script transpiling and minification
    #[serde(default)]
    pub js: JsConfig,

    /// Image codec parameters
    #[serde(default)]
    pub image: ImageConfig,

    /// Content hashing and manifests
    #[serde(default)]
    pub revision: RevisionConfig,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. Without one, defaults
    /// apply and the project root is the cwd.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let (mut config, config_path) = match find_config_file(&cli.config) {
            Some(path) => (Self::from_path(&path)?, path),
            None => {
                debug!("config"; "{} not found, using defaults", cli.config.display());
                (Self::default(), PathBuf::new())
            }
        };

        // Validate raw paths before normalization
        config.validate_paths()?;

        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(cwd);

        config.config_path = config_path;
        config.finalize(cli, &root);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} are ignored:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Finalize configuration after loading: root, CLI overrides, path normalization.
    fn finalize(&mut self, cli: &Cli, root: &Path) {
        self.root = crate::utils::path::normalize_path(root);
        self.apply_command_options(cli);
        let root = self.root.clone();
        self.paths.normalize(&root);
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose);
        Self::update_option(&mut self.paths.output.root, cli.output.as_ref());

        match &cli.command {
            Commands::Build { hash } => {
                Self::update_option(&mut self.revision.enable, hash.as_ref());
            }
            Commands::Dev { .. } | Commands::Clean => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Pre-validate paths before normalization.
    ///
    /// Normalization turns everything absolute, after which a `..` in an
    /// output subdirectory can no longer be told apart.
    fn validate_paths(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        self.paths.validate(&mut diag);
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.paths.validate_layout(&self.root, &mut diag);
        self.css.validate(&mut diag);
        self.js.validate(&mut diag);
        self.image.validate(&mut diag);
        self.revision.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from a TOML snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Build a normalized config rooted at `root`, as `load` would.
#[cfg(test)]
pub fn test_config_at(root: &Path, content: &str) -> SiteConfig {
    let mut config = test_parse_config(content);
    config.root = root.to_path_buf();
    config.paths.normalize(root);
    config
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_invalid_toml() {
        // Invalid TOML syntax - unclosed bracket
        let result = SiteConfig::parse_with_ignored("[paths\ncss = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_site_config_default() {
        let config = SiteConfig::default();
        assert_eq!(config.config_path, PathBuf::new());
        assert!(config.revision.enable);
        assert!(config.html.minify);
        assert_eq!(config.js.target, "es2015");
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[css]\nbrowsers = []\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = SiteConfig::parse_with_ignored(content).unwrap();

        assert!(config.css.browsers.is_empty());
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_default_config_validates() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = test_parse_config(
            "[js]\ntarget = \"es1999\"\n[image.jpeg]\nquality = 101\n[revision]\nlength = 100",
        );
        let err = config.validate().unwrap_err();
        let Some(ConfigError::Diagnostics(diag)) = err.downcast_ref::<ConfigError>() else {
            panic!("expected diagnostics, got {err:?}");
        };
        assert_eq!(diag.len(), 3);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(["assetline", "-o", "public", "build", "--hash", "false"]);
        let mut config = SiteConfig::default();
        config.finalize(&cli, Path::new("/site"));

        assert!(!config.revision.enable);
        assert!(config.paths.output.root.ends_with("public"));
        assert!(config.paths.output.root.is_absolute());
    }

    #[test]
    fn test_normalize_resolves_against_root() {
        let config = test_config_at(Path::new("/site"), "");
        assert_eq!(config.paths.source.css, PathBuf::from("/site/src/css"));
        assert_eq!(config.paths.output.root, PathBuf::from("/site/dist"));
        assert_eq!(config.root_relative("/site/dist/app.css"), PathBuf::from("dist/app.css"));
    }
}
