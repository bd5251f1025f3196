//! Asset class definitions.

use std::fmt;

/// Class of asset handled by one branch of the pipeline.
///
/// Each class owns one output subdirectory, so class branches never
/// write to the same files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetClass {
    /// HTML pages, written to the output root.
    Html,
    /// Stylesheets compiled from Sass.
    Css,
    /// Scripts.
    Js,
    /// Images and other static files.
    Image,
}

impl AssetClass {
    /// All classes, in the order errors are reported.
    pub const ALL: [Self; 4] = [Self::Html, Self::Css, Self::Js, Self::Image];

    /// Classes that are revisioned and referenced from HTML, in rewrite order.
    pub const REVISIONED: [Self; 3] = [Self::Css, Self::Js, Self::Image];

    /// Short name used in logs and progress counters.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Css => "css",
            Self::Js => "js",
            Self::Image => "assets",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
