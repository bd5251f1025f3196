//! Asset discovery and output.

mod kind;
mod process;
mod route;
mod scan;

// Types
pub use kind::AssetKind;
pub use route::{AssetRoute, TransformedAsset};

// Scanning (pure functions)
pub use scan::{list_html, newest_partial, scan_class};

// Output (side effects)
pub use process::{clean_output, write_asset};
