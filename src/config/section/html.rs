//! `[html]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [html]
//! minify = true          # minify pages in release builds
//! keep_comments = false
//! minify_css = true      # inline <style> and style attributes
//! minify_js = true       # inline <script>
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// Minify HTML pages (release builds only).
    pub minify: bool,
    /// Keep `<!-- -->` comments.
    pub keep_comments: bool,
    /// Minify inline CSS.
    pub minify_css: bool,
    /// Minify inline JavaScript.
    pub minify_js: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            minify: true,
            keep_comments: false,
            minify_css: true,
            minify_js: true,
        }
    }
}
