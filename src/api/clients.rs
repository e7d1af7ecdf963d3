//! Request-scoped client construction
//!
//! Each request gets its own vector store and LLM handles, built from the
//! request fields. Handles are dropped with the request.

use async_trait::async_trait;

use crate::api::types::RagRequest;
use crate::connections::ConnectionFactory;
use crate::errors::Result;
use crate::llm::ChatModel;
use crate::rag::Retriever;
use crate::vectorstore::VectorStore;

/// Turns a request into ready-to-use clients
#[async_trait]
pub trait ClientInitializer: Send + Sync {
    /// Retriever over the requested table, embedding with the requested model
    async fn init_vector_store_retriever(&self, request: &RagRequest) -> Result<Box<dyn Retriever>>;

    /// Chat model named by the request
    async fn init_llm_client(&self, request: &RagRequest) -> Result<Box<dyn ChatModel>>;
}

/// Builds clients through the connection factory
pub struct ConnectionInitializer {
    factory: ConnectionFactory,
}

impl ConnectionInitializer {
    pub fn new(factory: ConnectionFactory) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl ClientInitializer for ConnectionInitializer {
    async fn init_vector_store_retriever(&self, request: &RagRequest) -> Result<Box<dyn Retriever>> {
        let store = self
            .factory
            .create_vector_store_client(
                &request.hana_vector_table_name,
                &request.embedding_model_name,
            )
            .await?;
        Ok(Box::new(store.into_retriever(self.factory.config().retrieval_k())))
    }

    async fn init_llm_client(&self, request: &RagRequest) -> Result<Box<dyn ChatModel>> {
        let llm = self.factory.create_llm_client(&request.llm_model_name).await?;
        Ok(Box::new(llm))
    }
}
