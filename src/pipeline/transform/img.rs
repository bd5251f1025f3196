//! Image optimization.
//!
//! JPEG and PNG are re-encoded with the image crate and the smaller of the
//! two byte strings wins. SVG goes through usvg, then optional viewBox and
//! id cleanup. Everything else passes through untouched.

use std::path::Path;
use std::sync::LazyLock;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageFormat};
use regex::Regex;

use crate::config::ImageConfig;
use crate::pipeline::BuildError;

/// Image formats with a dedicated optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Jpeg,
    Png,
    Svg,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }
}

pub struct ImageTransform {
    jpeg_quality: u8,
    png_compression: CompressionType,
    remove_view_box: bool,
    cleanup_ids: bool,
}

impl ImageTransform {
    pub fn new(config: &ImageConfig) -> Self {
        Self {
            jpeg_quality: config.jpeg.quality,
            png_compression: config.png.compression(),
            remove_view_box: config.svg.remove_view_box,
            cleanup_ids: config.svg.cleanup_ids,
        }
    }

    pub fn apply(&self, path: &Path, bytes: Vec<u8>) -> Result<Vec<u8>, BuildError> {
        match Format::from_path(path) {
            Some(Format::Jpeg) => self.jpeg(path, bytes),
            Some(Format::Png) => self.png(path, bytes),
            Some(Format::Svg) => self.svg(path, &bytes).map(String::into_bytes),
            None => Ok(bytes),
        }
    }

    fn jpeg(&self, path: &Path, bytes: Vec<u8>) -> Result<Vec<u8>, BuildError> {
        let image = decode(path, &bytes, ImageFormat::Jpeg)?;
        let mut out = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut out, self.jpeg_quality);
        DynamicImage::ImageRgb8(image.to_rgb8())
            .write_with_encoder(encoder)
            .map_err(|e| BuildError::malformed(path, e.to_string()))?;
        Ok(smaller(bytes, out))
    }

    fn png(&self, path: &Path, bytes: Vec<u8>) -> Result<Vec<u8>, BuildError> {
        let image = decode(path, &bytes, ImageFormat::Png)?;
        let mut out = Vec::new();
        let encoder =
            PngEncoder::new_with_quality(&mut out, self.png_compression, FilterType::Adaptive);
        image
            .write_with_encoder(encoder)
            .map_err(|e| BuildError::malformed(path, e.to_string()))?;
        Ok(smaller(bytes, out))
    }

    fn svg(&self, path: &Path, bytes: &[u8]) -> Result<String, BuildError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| BuildError::malformed(path, format!("SVG is not UTF-8: {e}")))?;

        // usvg is built without text support and would drop <text> nodes
        let mut svg = if text.contains("<text") {
            text.to_owned()
        } else {
            let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
                .map_err(|e| BuildError::malformed(path, e.to_string()))?;
            tree.to_string(&usvg::WriteOptions {
                indent: usvg::Indent::None,
                preserve_text: true,
                ..Default::default()
            })
        };

        if self.remove_view_box {
            svg = remove_view_box(&svg);
        }
        if self.cleanup_ids {
            svg = cleanup_ids(&svg);
        }
        Ok(svg)
    }
}

fn decode(path: &Path, bytes: &[u8], format: ImageFormat) -> Result<DynamicImage, BuildError> {
    image::load_from_memory_with_format(bytes, format)
        .map_err(|e| BuildError::malformed(path, e.to_string()))
}

#[inline]
fn smaller(original: Vec<u8>, encoded: Vec<u8>) -> Vec<u8> {
    if encoded.len() < original.len() {
        encoded
    } else {
        original
    }
}

static SVG_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<svg\b[^>]*>").unwrap());
static VIEW_BOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s+viewBox\s*=\s*("[^"]*"|'[^']*')"#).unwrap());
static ID_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s+id\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());

/// Drop the root `viewBox` when the root also has `width` and `height`.
fn remove_view_box(svg: &str) -> String {
    let Some(tag) = SVG_TAG.find(svg) else {
        return svg.to_owned();
    };
    let root = tag.as_str();
    if !(has_attr(root, "width") && has_attr(root, "height")) {
        return svg.to_owned();
    }

    let stripped = VIEW_BOX.replace(root, "");
    format!("{}{}{}", &svg[..tag.start()], stripped, &svg[tag.end()..])
}

fn has_attr(tag: &str, name: &str) -> bool {
    tag.split(|c: char| c.is_whitespace())
        .any(|part| part.starts_with(name) && part[name.len()..].trim_start().starts_with('='))
}

/// Remove `id` attributes that no `#id` reference points to.
fn cleanup_ids(svg: &str) -> String {
    ID_ATTR
        .replace_all(svg, |caps: &regex::Captures| {
            let id = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str());
            if !id.is_empty() && is_referenced(svg, id) {
                caps[0].to_owned()
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// `url(#id)`, `href="#id"` and friends.
fn is_referenced(svg: &str, id: &str) -> bool {
    let needle = format!("#{id}");
    svg.match_indices(&needle).any(|(pos, _)| {
        svg[pos + needle.len()..]
            .chars()
            .next()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '-' || c == '_' || c == '.' || c == ':'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageEncoder, RgbImage};

    fn transform() -> ImageTransform {
        ImageTransform::new(&ImageConfig::default())
    }

    fn sample_png() -> Vec<u8> {
        let image = RgbImage::from_fn(32, 32, |x, y| image::Rgb([(x * 8) as u8, (y * 8) as u8, 0]));
        let mut out = Vec::new();
        PngEncoder::new_with_quality(&mut out, CompressionType::Fast, FilterType::NoFilter)
            .write_image(image.as_raw(), 32, 32, image::ExtendedColorType::Rgb8)
            .unwrap();
        out
    }

    #[test]
    fn test_png_never_grows() {
        let png = sample_png();
        let out = transform().apply(Path::new("a.png"), png.clone()).unwrap();
        assert!(out.len() <= png.len());
        assert!(image::load_from_memory(&out).is_ok());
    }

    #[test]
    fn test_broken_jpeg_is_source_error() {
        let err = transform()
            .apply(Path::new("photo.jpg"), b"not a jpeg".to_vec())
            .unwrap_err();
        assert!(matches!(err, BuildError::Source { .. }));
    }

    #[test]
    fn test_other_formats_pass_through() {
        let bytes = b"GIF89a...".to_vec();
        let out = transform().apply(Path::new("anim.gif"), bytes.clone()).unwrap();
        assert_eq!(out, bytes);
    }

    #[test]
    fn test_svg_minified() {
        let svg = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\" height=\"10\" viewBox=\"0 0 10 10\">\n  <rect width=\"10\" height=\"10\" fill=\"red\"/>\n</svg>\n";
        let out = transform().apply(Path::new("icon.svg"), svg.as_bytes().to_vec()).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains("\n "));
        assert!(out.contains("<rect") || out.contains("<path"));
        assert!(!out.contains("viewBox"));
    }

    #[test]
    fn test_remove_view_box_needs_dimensions() {
        let with = r#"<svg width="4" height="4" viewBox="0 0 4 4"><g/></svg>"#;
        assert_eq!(remove_view_box(with), r#"<svg width="4" height="4"><g/></svg>"#);

        let without = r#"<svg viewBox="0 0 4 4"><g/></svg>"#;
        assert_eq!(remove_view_box(without), without);
    }

    #[test]
    fn test_cleanup_ids() {
        let svg = r##"<svg><defs><linearGradient id="g"/></defs><rect id="unused" fill="url(#g)"/><use href="#g-2"/></svg>"##;
        assert_eq!(
            cleanup_ids(svg),
            r##"<svg><defs><linearGradient id="g"/></defs><rect fill="url(#g)"/><use href="#g-2"/></svg>"##
        );
    }

    #[test]
    fn test_svg_text_kept() {
        let svg = r#"<svg width="4" height="4" viewBox="0 0 4 4"><text>hi</text></svg>"#;
        let out = transform().apply(Path::new("t.svg"), svg.as_bytes().to_vec()).unwrap();
        assert_eq!(out, br#"<svg width="4" height="4"><text>hi</text></svg>"#);
    }
}
