//! API request and response types

use serde::Deserialize;
use serde::Serialize;

use crate::DEFAULT_EMBEDDING_MODEL;
use crate::DEFAULT_LLM_MODEL;
use crate::DEFAULT_TABLE_NAME;

/// RAG request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagRequest {
    /// The query to generate responses for
    pub query: String,
    /// Vector table to retrieve from
    #[serde(default = "default_table_name")]
    pub hana_vector_table_name: String,
    /// LLM used for generation
    #[serde(default = "default_llm_model")]
    pub llm_model_name: String,
    /// Embedding model used for retrieval
    #[serde(default = "default_embedding_model")]
    pub embedding_model_name: String,
}

fn default_table_name() -> String {
    DEFAULT_TABLE_NAME.to_string()
}

fn default_llm_model() -> String {
    DEFAULT_LLM_MODEL.to_string()
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

impl RagRequest {
    /// Request for `query` with every other field at its default
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            hana_vector_table_name: default_table_name(),
            llm_model_name: default_llm_model(),
            embedding_model_name: default_embedding_model(),
        }
    }
}

/// RAG response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagResponse {
    pub response: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
