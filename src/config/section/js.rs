//! `[js]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [js]
//! target = "es2015"    # language level scripts are lowered to
//! mangle = true        # shorten local identifiers
//! compress = true      # dead-code removal, constant folding, ...
//! ```

use oxc::transformer::TransformOptions;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsConfig {
    /// ECMAScript target (`es5`, `es2015`, ..., `esnext`).
    pub target: String,
    /// Mangle identifiers when minifying.
    pub mangle: bool,
    /// Compress when minifying.
    pub compress: bool,
}

impl Default for JsConfig {
    fn default() -> Self {
        Self {
            target: "es2015".into(),
            mangle: true,
            compress: true,
        }
    }
}

const TARGET: FieldPath = FieldPath::new("js.target");

impl JsConfig {
    /// Transformer options for the configured target.
    pub fn transform_options(&self) -> Result<TransformOptions, String> {
        TransformOptions::from_target(&self.target).map_err(|e| e.to_string())
    }

    /// Validate JS configuration.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Err(e) = self.transform_options() {
            diag.error_with_hint(
                TARGET,
                format!("unsupported target `{}`: {e}", self.target),
                "use an ECMAScript version such as \"es2015\" or \"esnext\"",
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
        assert_eq!(config.js.target, "es2015");
        assert!(config.js.mangle);
        assert!(config.js.compress);
    }

    #[test]
    fn test_valid_target() {
        let config = test_parse_config("[js]\ntarget = \"es2020\"\nmangle = false");
        let mut diag = ConfigDiagnostics::new();
        config.js.validate(&mut diag);
        assert!(diag.is_empty());
        assert!(!config.js.mangle);
    }

    #[test]
    fn test_invalid_target() {
        let config = test_parse_config("[js]\ntarget = \"coffeescript\"");
        let mut diag = ConfigDiagnostics::new();
        config.js.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field.as_str(), "js.target");
    }
}
