//! Configuration section definitions.
//!
//! Each module corresponds to a section in `assetline.toml`:
//!
//! | Module     | TOML Section   | Purpose                                   |
//! |------------|----------------|-------------------------------------------|
//! | `paths`    | `[paths]`      | Source directories and output layout      |
//! | `html`     | `[html]`       | HTML minification                         |
//! | `css`      | `[css]`        | Prefixing targets, license comments       |
//! | `js`       | `[js]`         | Transpile target, mangling, compression   |
//! | `image`    | `[image]`      | Per-format codec parameters               |
//! | `revision` | `[revision]`   | Content hashing and manifests             |

mod css;
mod html;
mod image;
mod js;
mod paths;
mod revision;

pub use css::CssConfig;
pub use html::HtmlConfig;
pub use self::image::{ImageConfig, JpegConfig, PngConfig, SvgConfig};
pub use js::JsConfig;
pub use paths::{OutputPaths, PathsConfig, SourcePaths};
pub use revision::RevisionConfig;
