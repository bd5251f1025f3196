//! `[image]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [image.jpeg]
//! quality = 75             # 1..=100, lossy re-encode
//!
//! [image.png]
//! level = 5                # 0..=6, lossless re-encode effort
//!
//! [image.svg]
//! remove_view_box = true   # drop viewBox when width/height are set
//! cleanup_ids = false      # drop ids nothing references
//! ```
//!
//! GIF and other formats are copied unchanged.

use image::codecs::png::CompressionType;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ImageConfig {
    pub jpeg: JpegConfig,
    pub png: PngConfig,
    pub svg: SvgConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JpegConfig {
    /// Encoder quality, 1 (smallest) to 100 (best).
    pub quality: u8,
}

impl Default for JpegConfig {
    fn default() -> Self {
        Self { quality: 75 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PngConfig {
    /// Optimization level, 0 (fastest) to 6 (smallest).
    pub level: u8,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self { level: 5 }
    }
}

impl PngConfig {
    /// Map the optimization level to an encoder compression preset.
    pub fn compression(&self) -> CompressionType {
        match self.level {
            0..=2 => CompressionType::Fast,
            3..=4 => CompressionType::Default,
            _ => CompressionType::Best,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgConfig {
    /// Remove `viewBox` from the root when `width` and `height` are present.
    pub remove_view_box: bool,
    /// Remove `id` attributes that no `#id` reference points to.
    pub cleanup_ids: bool,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            remove_view_box: true,
            cleanup_ids: false,
        }
    }
}

const JPEG_QUALITY: FieldPath = FieldPath::new("image.jpeg.quality");
const PNG_LEVEL: FieldPath = FieldPath::new("image.png.level");

impl ImageConfig {
    /// Validate codec parameters.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !(1..=100).contains(&self.jpeg.quality) {
            diag.error_with_hint(
                JPEG_QUALITY,
                format!("quality {} is out of range", self.jpeg.quality),
                "use a value between 1 and 100",
            );
        }
        if self.png.level > 6 {
            diag.error_with_hint(
                PNG_LEVEL,
                format!("level {} is out of range", self.png.level),
                "use a value between 0 and 6",
            );
        }
    }
}
