//! Information display handlers

use crate::cli::output::print_config;
use crate::cli::output::print_success;
use crate::AppConfig;
use crate::Result;

pub fn handle_config_command(config: &AppConfig) -> Result<()> {
    print_config(config);
    println!();
    print_success("Configuration loaded successfully!");
    Ok(())
}
