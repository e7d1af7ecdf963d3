//! RAG (Retrieval-Augmented Generation) module
//!
//! A linear chain over two capabilities:
//! - a [`Retriever`] that returns the documents closest to the query
//! - a [`ChatModel`](crate::llm::ChatModel) that answers from a filled prompt
//!
//! Retrieval and question pass-through run concurrently, their results fill
//! the question answering template, the model is invoked once and its reply
//! is parsed into plain text.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use vecrag::config::AppConfig;
//! use vecrag::connections::ConnectionFactory;
//! use vecrag::rag::RagChain;
//! use vecrag::vectorstore::VectorStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let factory = ConnectionFactory::new(Arc::new(AppConfig::load()?));
//!     let store = factory
//!         .create_vector_store_client("RAG_EXAMPLE_VECTORSTORE", "text-embedding-ada-002")
//!         .await?;
//!     let llm = factory.create_llm_client("gpt-4").await?;
//!
//!     let chain = RagChain::new(store.into_retriever(4), llm);
//!     println!("{}", chain.invoke("What is Python typically used for?").await?);
//!     Ok(())
//! }
//! ```

pub mod pipeline;
pub mod prompts;
pub mod retriever;

pub use pipeline::RagChain;
pub use prompts::PromptTemplate;
pub use retriever::Retriever;
