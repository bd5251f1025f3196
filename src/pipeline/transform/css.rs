//! Stylesheets: Sass compilation, vendor prefixing and minification.
//!
//! Uses grass for Sass and lightningcss for everything after it.

use std::path::Path;

use lightningcss::error::Error as CssError;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::Targets;

use crate::config::{ConfigError, CssConfig};
use crate::pipeline::BuildError;

pub struct CssTransform {
    targets: Targets,
    minify: bool,
    keep_license_comments: bool,
}

impl CssTransform {
    pub fn new(config: &CssConfig, minify: bool) -> Result<Self, ConfigError> {
        Ok(Self {
            targets: config.targets().map_err(ConfigError::Validation)?,
            minify,
            keep_license_comments: config.keep_license_comments,
        })
    }

    /// Compile a Sass entry point, then prefix and minify in release mode.
    pub fn apply(&self, path: &Path) -> Result<Vec<u8>, BuildError> {
        let css = compile_sass(path)?;
        if !self.minify {
            return Ok(css.into_bytes());
        }
        self.minify(path, &css).map(String::into_bytes)
    }

    /// Add vendor prefixes for the configured browsers and minify.
    pub fn minify(&self, path: &Path, css: &str) -> Result<String, BuildError> {
        let options = ParserOptions {
            filename: path.display().to_string(),
            ..ParserOptions::default()
        };
        let mut stylesheet = StyleSheet::parse(css, options).map_err(|e| css_error(path, e))?;

        if !self.keep_license_comments {
            stylesheet.license_comments.clear();
        }

        stylesheet
            .minify(MinifyOptions {
                targets: self.targets,
                ..MinifyOptions::default()
            })
            .map_err(|e| css_error(path, e))?;

        let result = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                targets: self.targets,
                ..PrinterOptions::default()
            })
            .map_err(|e| css_error(path, e))?;
        Ok(result.code)
    }
}

/// Compile `path` with imports resolved from its own directory.
fn compile_sass(path: &Path) -> Result<String, BuildError> {
    let mut options = grass::Options::default().style(grass::OutputStyle::Expanded);
    if let Some(dir) = path.parent() {
        options = options.load_path(dir);
    }

    grass::from_path(path, &options).map_err(|err| {
        let message = err.to_string();
        let location = match (*err).kind() {
            grass::ErrorKind::ParseError { loc, .. } => {
                Some((loc.begin.line + 1, loc.begin.column + 1))
            }
            _ => None,
        };
        BuildError::malformed(path, message)
            .at(location.map(|l| l.0), location.map(|l| l.1))
    })
}

/// lightningcss locations have a 0-based line and a 1-based column.
fn css_error<T: std::fmt::Display>(path: &Path, err: CssError<T>) -> BuildError {
    let (line, column) = err
        .loc
        .as_ref()
        .map_or((None, None), |loc| {
            (Some(loc.line as usize + 1), Some(loc.column as usize))
        });
    BuildError::malformed(path, err.kind.to_string()).at(line, column)
}
