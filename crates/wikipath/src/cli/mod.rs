//! CLI command implementations.

pub mod find;
pub mod page;
pub mod preload;
pub mod refresh;
pub mod stats;
