//! Asset kind definitions.

/// How a source file enters its class output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Regular source, run through the class transformer.
    Source,
    /// Third-party file from a plugins directory, copied byte-for-byte.
    Plugin,
}
