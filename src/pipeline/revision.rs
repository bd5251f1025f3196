//! Content hashing of transformed assets.
//!
//! The fingerprint is a prefix of the blake3 digest of the final bytes. It
//! goes into the file name right before the extension:
//!
//! ```text
//! app.css        → app.1a2b3c4d.css
//! lib/x.min.js   → lib/x.min.1a2b3c4d.js
//! LICENSE        → LICENSE.1a2b3c4d
//! ```

use crate::asset::TransformedAsset;
use crate::core::AssetClass;
use crate::freshness::{ContentHash, hash_bytes};
use crate::pipeline::BuildError;
use crate::pipeline::manifest::Manifest;

/// A hashed asset, ready to be written under its hashed name.
#[derive(Debug, Clone)]
pub struct AssetRecord {
    /// Output path before hashing, relative to the class directory.
    pub original: String,
    pub bytes: Vec<u8>,
    pub hash: ContentHash,
    /// Output path after hashing, relative to the class directory.
    pub hashed: String,
}

/// Records of one class plus the manifest describing them.
#[derive(Debug, Default)]
pub struct Revision {
    pub records: Vec<AssetRecord>,
    pub manifest: Manifest,
}

/// Insert `.fingerprint` before the last extension of the file name.
pub fn hashed_name(rel: &str, fingerprint: &str) -> String {
    let (dir, file) = rel.rsplit_once('/').map_or(("", rel), |(d, f)| (d, f));
    let sep = if dir.is_empty() { "" } else { "/" };

    match file.rfind('.') {
        Some(dot) if dot > 0 => format!(
            "{dir}{sep}{}.{fingerprint}{}",
            &file[..dot],
            &file[dot..]
        ),
        _ => format!("{dir}{sep}{file}.{fingerprint}"),
    }
}

/// Hash every asset of a class and build its manifest.
///
/// # Errors
///
/// `DuplicateOutput` when two assets share an output name.
pub fn revise(
    class: AssetClass,
    assets: Vec<TransformedAsset>,
    length: usize,
) -> Result<Revision, BuildError> {
    let mut revision = Revision::default();

    for asset in assets {
        let hash = hash_bytes(&asset.bytes);
        let original = asset.route.rel;
        let hashed = hashed_name(&original, &hash.fingerprint(length));

        if revision
            .manifest
            .insert(original.clone(), hashed.clone())
            .is_some()
        {
            return Err(BuildError::DuplicateOutput {
                class,
                path: original,
            });
        }

        revision.records.push(AssetRecord {
            original,
            bytes: asset.bytes,
            hash,
            hashed,
        });
    }

    Ok(revision)
}
