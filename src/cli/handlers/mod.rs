//! CLI command handlers module
//!
//! - serve: API server
//! - vector_table: bulk load and bulk delete of a vector table
//! - info: configuration display

pub mod info;
pub mod serve;
pub mod vector_table;

pub use info::*;
pub use serve::*;
pub use vector_table::*;
