//! `[css]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [css]
//! browsers = ["Chrome 9", "IE 8", "last 2 versions"]   # browserslist queries for prefixing
//! keep_license_comments = true                         # keep /*! ... */ in release output
//! ```

use lightningcss::targets::{Browsers, Targets};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CssConfig {
    /// Browserslist queries used for vendor prefixing and syntax lowering.
    pub browsers: Vec<String>,
    /// Keep `/*! ... */` license comments when minifying.
    pub keep_license_comments: bool,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            browsers: vec![
                "Chrome 9".into(),
                "IE 8".into(),
                "last 2 versions".into(),
            ],
            keep_license_comments: true,
        }
    }
}

const BROWSERS: FieldPath = FieldPath::new("css.browsers");

impl CssConfig {
    /// Resolve browserslist queries to lightningcss targets.
    ///
    /// An empty query list means no prefixing.
    pub fn targets(&self) -> Result<Targets, String> {
        if self.browsers.is_empty() {
            return Ok(Targets::default());
        }
        let browsers = Browsers::from_browserslist(&self.browsers).map_err(|e| e.to_string())?;
        Ok(Targets {
            browsers,
            ..Targets::default()
        })
    }

    /// Validate CSS configuration.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Err(e) = self.targets() {
            diag.error_with_hint(
                BROWSERS,
                format!("invalid browserslist query: {e}"),
                "queries look like \"last 2 versions\" or \"IE 8\"",
            );
        }
    }
}
