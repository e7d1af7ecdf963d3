//! Embeddings generation module
//!
//! Text is embedded by a model deployment on the generative AI hub. The
//! [`Embeddings`] trait is what the vector store depends on, so stores can be
//! exercised with any embedding function.

pub mod client;

use async_trait::async_trait;
pub use client::ProxyEmbeddings;

use crate::errors::Result;

/// Maximum number of texts sent in one embeddings request
pub const MAX_BATCH_SIZE: usize = 100;

/// Embeddings requests in flight at once during a bulk load
pub const MAX_CONCURRENT_BATCHES: usize = 4;

/// Maps text to vectors
#[async_trait]
pub trait Embeddings: Send + Sync {
    /// Embed texts for storage, one vector per text in input order
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a search query
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
}
