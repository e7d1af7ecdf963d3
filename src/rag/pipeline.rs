//! Complete RAG chain: Retrieve -> Prompt -> Generate -> Parse

use tracing::debug;
use tracing::info;

use super::prompts::format_documents;
use super::prompts::PromptTemplate;
use super::Retriever;
use crate::errors::Result;
use crate::errors::VecRagError;
use crate::llm::ChatMessage;
use crate::llm::ChatModel;

/// Inputs of the prompt, produced by the retrieval step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptInput {
    pub context: String,
    pub question: String,
}

/// Extract the plain text of a model reply
pub fn parse_output(message: ChatMessage) -> String {
    message.content
}

/// Retrieval-augmented question answering over one retriever and one chat model
pub struct RagChain<R, M> {
    retriever: R,
    llm: M,
    prompt: PromptTemplate,
}

impl<R, M> RagChain<R, M>
where
    R: Retriever,
    M: ChatModel,
{
    pub fn new(retriever: R, llm: M) -> Self {
        Self {
            retriever,
            llm,
            prompt: PromptTemplate::rag(),
        }
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    /// Retrieve context and pass the question through, concurrently
    pub async fn setup_and_retrieval(&self, query: &str) -> Result<PromptInput> {
        let (documents, question) = tokio::try_join!(self.retriever.retrieve(query), async {
            Ok::<_, VecRagError>(query.to_string())
        })?;
        debug!("Retrieved {} documents", documents.len());

        Ok(PromptInput {
            context: format_documents(&documents),
            question,
        })
    }

    /// Build the filled prompt for a query without calling the model
    pub async fn build_prompt(&self, query: &str) -> Result<String> {
        let input = self.setup_and_retrieval(query).await?;
        self.prompt.format(&[
            ("context", input.context.as_str()),
            ("question", input.question.as_str()),
        ])
    }

    /// Run the whole chain and return the answer text
    ///
    /// # Errors
    /// - Retrieval errors (embedding generation, database queries)
    /// - LLM generation errors (API failures, invalid responses)
    pub async fn invoke(&self, query: &str) -> Result<String> {
        info!("Processing RAG query: {}", query);

        let prompt = self.build_prompt(query).await?;
        let reply = self.llm.invoke(&[ChatMessage::user(prompt)]).await?;
        let answer = parse_output(reply);

        info!("RAG query completed successfully");
        Ok(answer)
    }
}
