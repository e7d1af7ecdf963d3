pub mod api;
pub mod cli;
pub mod config;
pub mod connections;
pub mod documents;
pub mod embeddings;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod proxy;
pub mod rag;
pub mod vectorstore;

/// Vector table used when a request or command names none
pub const DEFAULT_TABLE_NAME: &str = "RAG_EXAMPLE_VECTORSTORE";

/// Chat model used when a request names none
pub const DEFAULT_LLM_MODEL: &str = "gpt-4";

/// Embedding model used for both loading and querying
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

#[cfg(test)]
mod errors_tests;

pub use config::AppConfig;
pub use errors::*;
