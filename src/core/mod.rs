//! Core types - pure abstractions shared across the codebase.

mod class;
mod mode;
mod state;

pub use class::AssetClass;
pub use mode::BuildMode;
pub use state::{is_shutdown, setup_shutdown_handler};
