/// RAG-related API handlers
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;

use super::AppState;
use crate::api::types::RagRequest;
use crate::api::types::RagResponse;
use crate::rag::RagChain;

/// Run the RAG chain for the query with the table, LLM and embedding model named in the body
pub async fn run_rag_chain(
    State(state): State<AppState>,
    Json(req): Json<RagRequest>,
) -> Result<Json<RagResponse>, StatusCode> {
    info!(
        "POST /rag: table={}, llm={}, embedding={}",
        req.hana_vector_table_name, req.llm_model_name, req.embedding_model_name
    );

    let retriever = state
        .clients
        .init_vector_store_retriever(&req)
        .await
        .map_err(|e| {
            error!("Failed to initialize vector store client: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    let llm = state.clients.init_llm_client(&req).await.map_err(|e| {
        error!("Failed to initialize LLM client: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let chain = RagChain::new(retriever, llm);
    match chain.invoke(&req.query).await {
        Ok(response) => Ok(Json(RagResponse { response })),
        Err(e) => {
            error!("Error processing RAG query: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
