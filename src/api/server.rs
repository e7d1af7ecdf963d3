//! HTTP server implementation

use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::clients::ConnectionInitializer;
use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::connections::ConnectionFactory;
use crate::Result;

/// Router with tracing, compression and optional CORS applied
pub fn build_app(state: AppState, enable_cors: bool) -> Router {
    let mut app = routes::api_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        info!("✅ CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Start the API server
pub async fn serve_api(config: Arc<AppConfig>, host: String, port: u16, enable_cors: bool) -> Result<()> {
    info!("🚀 Starting RAG API server...");

    let factory = ConnectionFactory::new(config);
    let state = AppState::new(Arc::new(ConnectionInitializer::new(factory)));
    let app = build_app(state, enable_cors);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /health - Health check");
    info!("  POST /rag    - RAG query");

    axum::serve(listener, app).await?;

    Ok(())
}
