//! API server handlers

use std::sync::Arc;

use crate::cli::commands::ServeArgs;
use crate::AppConfig;
use crate::Result;

pub async fn handle_serve_api(config: Arc<AppConfig>, args: ServeArgs) -> Result<()> {
    use crate::api::serve_api;

    // CLI arguments take priority over config
    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    println!("🚀 Starting RAG API Server");
    println!("==========================\n");
    println!("📍 Host: {host}");
    println!("🔌 Port: {port}");
    println!("🌐 CORS: {}", if args.cors { "Enabled" } else { "Disabled" });
    println!();

    serve_api(config, host, port, args.cors).await
}
