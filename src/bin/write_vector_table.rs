//! Create a vector table and fill it from a CSV file

use std::sync::Arc;

use clap::Parser;
use vecrag::cli::build_runtime;
use vecrag::cli::handle_write_command;
use vecrag::cli::prepare_environment;
use vecrag::cli::WriteTableCli;
use vecrag::Result;

fn main() -> Result<()> {
    let cli = WriteTableCli::parse();

    let config = prepare_environment(&cli.global)?;
    let _guard = vecrag::logging::init_logging(&config, cli.global.verbose)?;

    build_runtime()?.block_on(handle_write_command(Arc::new(config), &cli.args))?;
    Ok(())
}
