//! CLI module for the vecrag binaries
//!
//! This module contains all CLI-related functionality including:
//! - Command line argument parsing
//! - Command handlers (organized by domain in handlers/ subdirectory)
//! - Output formatting

pub mod bootstrap;
pub mod commands;
pub mod handlers;
pub mod output;

pub use bootstrap::*;
pub use commands::*;
pub use handlers::*;
pub use output::*;
