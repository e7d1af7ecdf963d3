//! Retrieval capability used by the RAG chain

use async_trait::async_trait;

use crate::documents::Document;
use crate::errors::Result;

/// Returns the stored documents most similar to a query
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>>;
}

#[async_trait]
impl<R: Retriever + ?Sized> Retriever for Box<R> {
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>> {
        (**self).retrieve(query).await
    }
}
