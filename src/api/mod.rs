//! API server module serving the RAG chain over REST

pub mod clients;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use server::serve_api;
