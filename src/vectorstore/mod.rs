//! Vector tables: storage of embedded documents and similarity search

pub mod pg;

use async_trait::async_trait;
pub use pg::PgVectorStore;
use tracing::debug;

use crate::documents::Document;
use crate::documents::Filter;
use crate::errors::Result;
use crate::rag::Retriever;

/// Number of documents a retriever returns when not configured otherwise
pub const DEFAULT_K: usize = 4;

/// A retrieved document with its similarity to the query (higher is closer)
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f64,
}

/// A table of embedded documents
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Embed and insert documents, returning how many were written
    async fn add_documents(&self, documents: &[Document]) -> Result<usize>;

    /// Delete the rows whose metadata matches `filter`; the empty filter deletes every row
    async fn delete(&self, filter: &Filter) -> Result<u64>;

    /// The `k` documents closest to `query`, best first
    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
        filter: Option<&Filter>,
    ) -> Result<Vec<ScoredDocument>>;

    /// Retriever view over this store
    fn into_retriever(self, k: usize) -> VectorStoreRetriever<Self>
    where
        Self: Sized,
    {
        VectorStoreRetriever::new(self, k)
    }
}

/// Retriever that runs a similarity search against a vector store
pub struct VectorStoreRetriever<S> {
    store: S,
    k: usize,
    filter: Option<Filter>,
}

impl<S: VectorStore> VectorStoreRetriever<S> {
    pub fn new(store: S, k: usize) -> Self {
        Self {
            store,
            k,
            filter: None,
        }
    }

    /// Restrict retrieval to documents whose metadata matches `filter`
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S: VectorStore> Retriever for VectorStoreRetriever<S> {
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>> {
        let results = self
            .store
            .similarity_search(query, self.k, self.filter.as_ref())
            .await?;
        debug!("Similarity search returned {} documents", results.len());
        Ok(results.into_iter().map(|r| r.document).collect())
    }
}
