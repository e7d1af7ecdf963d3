//! Remove every row of a vector table

use std::sync::Arc;

use clap::Parser;
use vecrag::cli::build_runtime;
use vecrag::cli::handle_delete_command;
use vecrag::cli::prepare_environment;
use vecrag::cli::DeleteTableCli;
use vecrag::Result;

fn main() -> Result<()> {
    let cli = DeleteTableCli::parse();

    let config = prepare_environment(&cli.global)?;
    let _guard = vecrag::logging::init_logging(&config, cli.global.verbose)?;

    build_runtime()?.block_on(handle_delete_command(Arc::new(config), &cli.args))
}
