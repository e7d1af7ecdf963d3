//! Embeddings served by a model host deployment

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::StreamExt;
use futures::stream::TryStreamExt;
use futures::stream::{
    self,
};
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::Embeddings;
use super::MAX_BATCH_SIZE;
use super::MAX_CONCURRENT_BATCHES;
use crate::errors::Result;
use crate::errors::VecRagError;
use crate::proxy::Deployment;
use crate::proxy::ProxyClient;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

/// Embedding function bound to one deployment of an embedding model
pub struct ProxyEmbeddings {
    proxy: Arc<ProxyClient>,
    deployment: Deployment,
    model: String,
}

impl ProxyEmbeddings {
    /// Resolve `model` through the proxy
    ///
    /// # Errors
    /// - `ModelNotFound` when no running deployment serves the model
    /// - Token or deployment listing failures
    pub async fn new(proxy: Arc<ProxyClient>, model: &str) -> Result<Self> {
        let deployment = proxy.resolve_deployment(model).await?;
        Ok(Self {
            proxy,
            deployment,
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        debug!(
            "Embedding {} texts with {} ({})",
            texts.len(),
            self.model,
            self.deployment.id
        );
        let response: EmbeddingResponse = self
            .proxy
            .post_deployment(&self.deployment, "embeddings", &EmbeddingRequest { input: texts })
            .await
            .map_err(|e| VecRagError::EmbeddingError(e.to_string()))?;

        ordered_embeddings(response, texts.len())
    }
}

/// Put vectors back in input order and check none is missing
fn ordered_embeddings(response: EmbeddingResponse, expected: usize) -> Result<Vec<Vec<f32>>> {
    let mut data = response.data;
    if data.len() != expected {
        return Err(VecRagError::EmbeddingError(format!(
            "expected {expected} embeddings, got {}",
            data.len()
        )));
    }
    data.sort_by_key(|d| d.index);
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

#[async_trait]
impl Embeddings for ProxyEmbeddings {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        // buffered keeps batch order
        let batches: Vec<Vec<Vec<f32>>> = stream::iter(texts.chunks(MAX_BATCH_SIZE))
            .map(|chunk| self.embed_batch(chunk))
            .buffered(MAX_CONCURRENT_BATCHES)
            .boxed()
            .try_collect()
            .await?;
        Ok(batches.into_iter().flatten().collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| VecRagError::EmbeddingError("No embedding in response".to_string()))
    }
}
