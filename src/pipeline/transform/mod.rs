//! Per-class asset transformers.
//!
//! A transformer is a pure function of the source bytes and the config:
//! the same input always gives byte-identical output. Nothing here writes
//! to disk.
//!
//! | Class  | Development        | Release                               |
//! |--------|--------------------|---------------------------------------|
//! | css    | Sass (expanded)    | Sass → prefix → minify (lightningcss) |
//! | js     | copy               | transpile → minify (oxc)              |
//! | assets | copy               | JPEG/PNG re-encode, SVG via usvg      |
//! | html   | copy               | minify-html (if `html.minify`)        |
//!
//! Plugins are copied verbatim in both modes.

mod css;
mod html;
mod img;
mod js;

use std::fs;

pub use css::CssTransform;
pub use html::HtmlTransform;
pub use img::ImageTransform;
pub use js::JsTransform;

use crate::asset::{AssetRoute, TransformedAsset};
use crate::config::{ConfigError, SiteConfig};
use crate::core::{AssetClass, BuildMode};
use crate::pipeline::BuildError;

/// All class transformers, prepared once per build.
pub struct Transformers {
    minify: bool,
    minify_html: bool,
    css: CssTransform,
    js: JsTransform,
    image: ImageTransform,
    html: HtmlTransform,
}

impl Transformers {
    /// Resolve browser targets and the ES target up front.
    pub fn new(config: &SiteConfig, mode: BuildMode) -> Result<Self, ConfigError> {
        Ok(Self {
            minify: mode.minify,
            minify_html: mode.minify && config.html.minify,
            css: CssTransform::new(&config.css, mode.minify)?,
            js: JsTransform::new(&config.js)?,
            image: ImageTransform::new(&config.image),
            html: HtmlTransform::new(&config.html),
        })
    }

    /// Read and transform one source.
    pub fn apply(&self, class: AssetClass, route: &AssetRoute) -> Result<TransformedAsset, BuildError> {
        let path = route.source.as_path();
        let read = || fs::read(path).map_err(|err| BuildError::io(path, err));

        let bytes = if route.is_plugin() {
            read()?
        } else {
            match class {
                AssetClass::Css => self.css.apply(path)?,
                AssetClass::Js if self.minify => {
                    let source = fs::read_to_string(path).map_err(|err| BuildError::io(path, err))?;
                    self.js.minify(path, &source)?.into_bytes()
                }
                AssetClass::Image if self.minify => self.image.apply(path, read()?)?,
                AssetClass::Html if self.minify_html => self.html.apply(&read()?),
                AssetClass::Js | AssetClass::Image | AssetClass::Html => read()?,
            }
        };

        Ok(TransformedAsset {
            route: route.clone(),
            bytes,
        })
    }
}
