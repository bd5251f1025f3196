//! Freshness detection: content-hash (blake3) for fingerprints, mtime for incremental writes.

mod hash;
pub mod mtime;
mod stamp;

pub use hash::{ContentHash, hash_bytes};
pub use mtime::is_stale;
pub use stamp::OutputStamp;
