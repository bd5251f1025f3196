//! Build error types.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ConfigError;
use crate::core::AssetClass;

/// Errors raised while building.
///
/// The first error halts the pipeline; nothing is aggregated across classes.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Malformed stylesheet, script, SVG or image.
    #[error("{}: {message}", Location(.path, .line, .column))]
    Source {
        path: PathBuf,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    #[error("IO error at `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid manifest `{}`", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A manifest value with no file behind it.
    #[error("manifest `{}` maps to missing file `{}`", .manifest.display(), .path.display())]
    MissingAsset { manifest: PathBuf, path: PathBuf },

    /// Two sources of one class map to the same output name.
    #[error("{class}: `{path}` is produced by more than one source")]
    DuplicateOutput { class: AssetClass, path: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A sibling class failed or the build was interrupted.
    #[error("build aborted")]
    Aborted,
}

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Source error without a known location.
    pub fn malformed(path: &Path, message: impl Into<String>) -> Self {
        Self::Source {
            path: path.to_path_buf(),
            line: None,
            column: None,
            message: message.into(),
        }
    }

    /// Attach a 1-based line/column to a `Source` error.
    pub fn at(self, line: Option<usize>, column: Option<usize>) -> Self {
        match self {
            Self::Source { path, message, .. } => Self::Source {
                path,
                line,
                column,
                message,
            },
            other => other,
        }
    }

    #[inline]
    pub const fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}

/// `path`, `path:line` or `path:line:column`.
struct Location<'a>(&'a Path, &'a Option<usize>, &'a Option<usize>);

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())?;
        if let Some(line) = self.1 {
            write!(f, ":{line}")?;
            if let Some(column) = self.2 {
                write!(f, ":{column}")?;
            }
        }
        Ok(())
    }
}

/// Line/column (1-based) of a byte offset in `source`.
pub fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let column = before
        .rfind('\n')
        .map_or(before.chars().count(), |nl| before[nl + 1..].chars().count())
        + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_display_with_location() {
        let err = BuildError::malformed(Path::new("src/css/app.scss"), "expected \";\"")
            .at(Some(3), Some(14));
        assert_eq!(err.to_string(), "src/css/app.scss:3:14: expected \";\"");

        let err = BuildError::malformed(Path::new("logo.png"), "bad header");
        assert_eq!(err.to_string(), "logo.png: bad header");
    }

    #[test]
    fn test_at_ignores_other_variants() {
        assert!(BuildError::Aborted.at(Some(1), None).is_aborted());
    }

    #[test]
    fn test_line_column() {
        let src = "let a = 1;\nlet b = ;\n";
        assert_eq!(line_column(src, 0), (1, 1));
        assert_eq!(line_column(src, 19), (2, 9));
        assert_eq!(line_column(src, 1000), (3, 1));
    }
}
