/// Build mode configuration.
///
/// One pipeline serves both development and release builds; the flags
/// here decide which stages run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildMode {
    /// Run minifiers, transpiler and image optimizers.
    pub minify: bool,

    /// Fingerprint output names, write manifests and rewrite HTML references.
    pub revision: bool,

    /// Skip outputs that are newer than their sources.
    pub incremental: bool,
}

impl BuildMode {
    /// Development mode: unminified, plain names, incremental writes.
    pub const DEVELOPMENT: Self = Self {
        minify: false,
        revision: false,
        incremental: true,
    };

    /// Release mode: minified and content-hashed.
    pub const RELEASE: Self = Self {
        minify: true,
        revision: true,
        incremental: false,
    };

    /// Release mode with content hashing toggled.
    pub const fn release(revision: bool) -> Self {
        Self {
            revision,
            ..Self::RELEASE
        }
    }
}
