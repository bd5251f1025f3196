//! Small helpers shared across the pipeline.

pub mod path;
pub mod plural;
