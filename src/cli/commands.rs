//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;

use crate::DEFAULT_TABLE_NAME;

/// CSV read by the bulk load when no path is given
pub const DEFAULT_INPUT_CSV: &str = "data/rag_example_inputs.csv";
/// Column holding document text when none is given
pub const DEFAULT_PAGE_CONTENT_COLUMN: &str = "text";

#[derive(Parser)]
#[command(name = "vecrag")]
#[command(about = "RAG API over a vector table and a generative AI hub")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every tool
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose debug logging (default: configured level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: config.toml, then config.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server
    Serve(ServeArgs),
    /// Create and write vectors to a vector table from a CSV file
    Write(WriteArgs),
    /// Delete every row of a vector table
    Delete(DeleteArgs),
    /// Show current configuration
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind (default: server.host from configuration)
    #[arg(long)]
    pub host: Option<String>,
    /// Port to bind (default: server.port from configuration)
    #[arg(short, long)]
    pub port: Option<u16>,
    /// Allow cross-origin requests from any origin
    #[arg(long)]
    pub cors: bool,
}

#[derive(Args, Debug, Clone)]
pub struct WriteArgs {
    /// The name of the table to write to
    #[arg(long, default_value = DEFAULT_TABLE_NAME)]
    pub table_name: String,
    /// The filepath of the input CSV file
    #[arg(long, default_value = DEFAULT_INPUT_CSV)]
    pub input_csv_filepath: PathBuf,
    /// The name of the column containing the page content
    #[arg(long, default_value = DEFAULT_PAGE_CONTENT_COLUMN)]
    pub page_content_column_name: String,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// The name of the table to delete
    #[arg(long, default_value = DEFAULT_TABLE_NAME)]
    pub table_name: String,
}

/// Standalone bulk load tool
#[derive(Parser)]
#[command(name = "write_vector_table")]
#[command(about = "Create and write vectors to a vector table")]
#[command(version)]
pub struct WriteTableCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(flatten)]
    pub args: WriteArgs,
}

/// Standalone bulk delete tool
#[derive(Parser)]
#[command(name = "delete_vector_table")]
#[command(about = "Delete a vector table")]
#[command(version)]
pub struct DeleteTableCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(flatten)]
    pub args: DeleteArgs,
}
