use std::sync::Arc;

use clap::Parser;
use tracing::info;
use vecrag::cli::build_runtime;
use vecrag::cli::handle_config_command;
use vecrag::cli::handle_delete_command;
use vecrag::cli::handle_serve_api;
use vecrag::cli::handle_write_command;
use vecrag::cli::prepare_environment;
use vecrag::cli::Cli;
use vecrag::cli::Commands;
use vecrag::AppConfig;
use vecrag::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configuration and environment first, while no other thread exists
    let config = prepare_environment(&cli.global)?;

    // Keep the guard alive so the file writer flushes on exit
    let _guard = vecrag::logging::init_logging(&config, cli.global.verbose)?;
    info!("Configuration loaded successfully");

    build_runtime()?.block_on(run(cli.command, Arc::new(config)))
}

async fn run(command: Commands, config: Arc<AppConfig>) -> Result<()> {
    // Execute the requested command
    match command {
        Commands::Serve(args) => handle_serve_api(config, args).await?,
        Commands::Write(args) => {
            handle_write_command(config, &args).await?;
        }
        Commands::Delete(args) => handle_delete_command(config, &args).await?,
        Commands::Config => handle_config_command(&config)?,
    }

    Ok(())
}
