//! Content hashing using blake3.
//!
//! Fingerprints are computed over final output bytes only, never over
//! paths or metadata, so identical content always hashes identically.

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Convert to hex string.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// Short hex fingerprint for file names.
    ///
    /// `len` is clamped to the 64 hex chars a blake3 hash provides.
    pub fn fingerprint(self, len: usize) -> String {
        let mut hex = self.to_hex();
        hex.truncate(len.min(hex.len()));
        hex
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display first 16 chars of hex for brevity
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Compute blake3 hash of in-memory content.
#[inline]
pub fn hash_bytes(content: &[u8]) -> ContentHash {
    ContentHash::new(*blake3::hash(content).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_content_same_hash() {
        let a = hash_bytes(b"body { color: red; }");
        let b = hash_bytes(b"body { color: red; }");
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(8), b.fingerprint(8));
    }

    #[test]
    fn test_different_content_different_hash() {
        let a = hash_bytes(b"body { color: red; }");
        let b = hash_bytes(b"body { color: blue; }");
        assert_ne!(a, b);
        assert_ne!(a.fingerprint(8), b.fingerprint(8));
    }

    #[test]
    fn test_fingerprint_length() {
        let hash = hash_bytes(b"console.log(1)");
        assert_eq!(hash.fingerprint(8).len(), 8);
        assert_eq!(hash.fingerprint(200).len(), 64);
        assert!(hash.fingerprint(8).chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_display_is_prefix() {
        let hash = hash_bytes(b"x");
        assert!(hash.to_hex().starts_with(&hash.to_string()));
    }
}
