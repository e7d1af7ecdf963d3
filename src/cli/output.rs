//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the vecrag tools

use crate::AppConfig;

/// Progress line printed before a table is written
pub fn creating_table_message(table: &str) -> String {
    format!("Creating table {table} if it doesn't exist...")
}

/// Completion line of the bulk load
pub fn documents_written_message(count: usize, table: &str) -> String {
    format!("{count} documents written to table {table} successfully")
}

/// Progress line printed before a table is cleared
pub fn deleting_table_message(table: &str) -> String {
    format!("Deleting table {table}...")
}

/// Completion line of the bulk delete
pub fn table_deleted_message(table: &str) -> String {
    format!("Table {table} deleted successfully")
}

/// Print configuration with secrets masked
pub fn print_config(config: &AppConfig) {
    println!("📋 vecrag Configuration:");
    println!();

    println!("🗄️  Database:");
    println!("  Host: {}:{}", config.database.host, config.database.port);
    println!("  User: {}", config.database.user);
    println!("  Password: {}", mask_secret(&config.database.password));
    println!(
        "  Certificate: {}",
        if config.database.certificate.is_some() {
            "configured"
        } else {
            "none"
        }
    );
    println!("  Connect timeout: {}s", config.database.connect_timeout);
    println!();

    println!("🤖 Generative AI hub:");
    println!("  Auth URL: {}", config.gen_ai_hub.url);
    println!("  Client ID: {}", config.gen_ai_hub.client_id);
    println!("  Client secret: {}", mask_secret(&config.gen_ai_hub.client_secret));
    println!("  Application: {}", config.gen_ai_hub.app_name);
    println!("  API URL: {}", config.gen_ai_hub.service_urls.ai_api_url);
    println!();

    println!("🧠 Generation:");
    println!("  Temperature: {}", config.llm.temperature);
    match config.llm.max_tokens {
        Some(max_tokens) => println!("  Max tokens: {max_tokens}"),
        None => println!("  Max tokens: model default"),
    }
    println!("  Retrieved documents (k): {}", config.retrieval.k);
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!();

    println!("🌐 Server:");
    println!("  Bind: {}:{}", config.server.host, config.server.port);
}

/// Mask a secret for display, keeping only its length visible
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        "(empty)".to_string()
    } else {
        "*".repeat(secret.chars().count().min(8))
    }
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}
