/// API request handlers
use std::sync::Arc;

use axum::Json;

use crate::api::clients::ClientInitializer;
use crate::api::types::HealthResponse;

pub mod rag;

pub use rag::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub clients: Arc<dyn ClientInitializer>,
}

impl AppState {
    pub fn new(clients: Arc<dyn ClientInitializer>) -> Self {
        Self { clients }
    }
}

/// Health check handler
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
