use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use vecrag::api::clients::ClientInitializer;
use vecrag::api::handlers::AppState;
use vecrag::api::server::build_app;
use vecrag::api::types::RagRequest;
use vecrag::api::types::RagResponse;
use vecrag::documents::Document;
use vecrag::llm::ChatMessage;
use vecrag::llm::ChatModel;
use vecrag::rag::Retriever;
use vecrag::Result;
use vecrag::VecRagError;

struct FixedRetriever {
    texts: Vec<String>,
}

#[async_trait]
impl Retriever for FixedRetriever {
    async fn retrieve(&self, _query: &str) -> Result<Vec<Document>> {
        Ok(self.texts.iter().map(Document::new).collect())
    }
}

struct FailingRetriever;

#[async_trait]
impl Retriever for FailingRetriever {
    async fn retrieve(&self, _query: &str) -> Result<Vec<Document>> {
        Err(VecRagError::EmbeddingError("embedding deployment unavailable".to_string()))
    }
}

struct FailingModel;

#[async_trait]
impl ChatModel for FailingModel {
    async fn invoke(&self, _messages: &[ChatMessage]) -> Result<ChatMessage> {
        Err(VecRagError::LlmError("quota exceeded".to_string()))
    }
}

/// Answers with the prompt it received
struct EchoModel;

#[async_trait]
impl ChatModel for EchoModel {
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<ChatMessage> {
        let last = messages
            .last()
            .ok_or_else(|| VecRagError::LlmError("no messages".to_string()))?;
        Ok(ChatMessage::assistant(last.content.clone()))
    }
}

#[derive(Default)]
struct FakeClients {
    fail_vector_store: bool,
    fail_llm: bool,
    fail_retrieval: bool,
    fail_generation: bool,
    requests: Mutex<Vec<RagRequest>>,
    llm_inits: Mutex<usize>,
}

#[async_trait]
impl ClientInitializer for FakeClients {
    async fn init_vector_store_retriever(&self, request: &RagRequest) -> Result<Box<dyn Retriever>> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail_vector_store {
            return Err(VecRagError::Custom("connection refused".to_string()));
        }
        if self.fail_retrieval {
            return Ok(Box::new(FailingRetriever));
        }
        Ok(Box::new(FixedRetriever {
            texts: vec![
                "Python is a general-purpose programming language.".to_string(),
                "It is often used for scripting and data analysis.".to_string(),
            ],
        }))
    }

    async fn init_llm_client(&self, _request: &RagRequest) -> Result<Box<dyn ChatModel>> {
        *self.llm_inits.lock().unwrap() += 1;
        if self.fail_llm {
            return Err(VecRagError::ModelNotFound("gpt-4".to_string()));
        }
        if self.fail_generation {
            return Ok(Box::new(FailingModel));
        }
        Ok(Box::new(EchoModel))
    }
}

fn app(clients: Arc<FakeClients>) -> Router {
    vecrag::logging::init_simple_logging();
    build_app(AppState::new(clients), false)
}

fn post_rag(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/rag")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_rag_returns_model_answer() {
    let clients = Arc::new(FakeClients::default());

    let response = app(clients.clone())
        .oneshot(post_rag(r#"{"query": "What is Python typically used for?"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: RagResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body.response,
        "Answer the question based only on the following context:\n    \
         Python is a general-purpose programming language.\n\n\
         It is often used for scripting and data analysis.\n\n    \
         Question: What is Python typically used for?\n    "
    );

    let requests = clients.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].hana_vector_table_name, "RAG_EXAMPLE_VECTORSTORE");
    assert_eq!(requests[0].llm_model_name, "gpt-4");
    assert_eq!(requests[0].embedding_model_name, "text-embedding-ada-002");
}

#[tokio::test]
async fn test_rag_passes_request_fields_to_clients() {
    let clients = Arc::new(FakeClients::default());

    let response = app(clients.clone())
        .oneshot(post_rag(
            r#"{
                "query": "q",
                "hana_vector_table_name": "DOCS",
                "llm_model_name": "gpt-35-turbo",
                "embedding_model_name": "text-embedding-3-small"
            }"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let requests = clients.requests.lock().unwrap();
    assert_eq!(requests[0].hana_vector_table_name, "DOCS");
    assert_eq!(requests[0].llm_model_name, "gpt-35-turbo");
    assert_eq!(requests[0].embedding_model_name, "text-embedding-3-small");
}

#[tokio::test]
async fn test_rag_client_failure_is_server_error() {
    let clients = Arc::new(FakeClients {
        fail_vector_store: true,
        ..Default::default()
    });

    let response = app(clients.clone())
        .oneshot(post_rag(r#"{"query": "q"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(*clients.llm_inits.lock().unwrap(), 0);
}

async fn status_for(clients: FakeClients) -> StatusCode {
    app(Arc::new(clients))
        .oneshot(post_rag(r#"{"query": "q"}"#))
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_rag_llm_client_failure_is_server_error() {
    let status = status_for(FakeClients {
        fail_llm: true,
        ..Default::default()
    })
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_rag_retrieval_failure_is_server_error() {
    let status = status_for(FakeClients {
        fail_retrieval: true,
        ..Default::default()
    })
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_rag_generation_failure_is_server_error() {
    let status = status_for(FakeClients {
        fail_generation: true,
        ..Default::default()
    })
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_rag_without_query_is_rejected() {
    let clients = Arc::new(FakeClients::default());

    let response = app(clients.clone())
        .oneshot(post_rag(r#"{"llm_model_name": "gpt-4"}"#))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert!(clients.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_health() {
    let response = app(Arc::new(FakeClients::default()))
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
}
