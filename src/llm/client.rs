//! Chat completions served by a model host deployment

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::ChatMessage;
use super::ChatModel;
use super::Role;
use crate::config::LlmConfig;
use crate::errors::Result;
use crate::errors::VecRagError;
use crate::proxy::Deployment;
use crate::proxy::ProxyClient;

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat model bound to one deployment
pub struct ProxyChatModel {
    proxy: Arc<ProxyClient>,
    deployment: Deployment,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl ProxyChatModel {
    /// Resolve `model` through the proxy
    ///
    /// # Errors
    /// - `ModelNotFound` when no running deployment serves the model
    /// - Token or deployment listing failures
    pub async fn new(proxy: Arc<ProxyClient>, model: &str, params: &LlmConfig) -> Result<Self> {
        let deployment = proxy.resolve_deployment(model).await?;
        Ok(Self {
            proxy,
            deployment,
            model: model.to_string(),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn first_message(response: ChatResponse) -> Result<ChatMessage> {
    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| VecRagError::LlmError("No choices in response".to_string()))?
        .message
        .content
        .unwrap_or_default();

    Ok(ChatMessage {
        role: Role::Assistant,
        content,
    })
}

#[async_trait]
impl ChatModel for ProxyChatModel {
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<ChatMessage> {
        debug!(
            "Invoking {} ({}) with {} messages",
            self.model,
            self.deployment.id,
            messages.len()
        );
        let request = ChatRequest {
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let response: ChatResponse = self
            .proxy
            .post_deployment(&self.deployment, "chat/completions", &request)
            .await
            .map_err(|e| VecRagError::LlmError(e.to_string()))?;

        first_message(response)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_shape() {
        let messages = vec![ChatMessage::user("hi")];
        let request = ChatRequest {
            messages: &messages,
            temperature: 0.0,
            max_tokens: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"messages": [{"role": "user", "content": "hi"}], "temperature": 0.0})
        );
    }

    #[test]
    fn test_request_includes_max_tokens_when_set() {
        let messages = vec![ChatMessage::system("be brief"), ChatMessage::user("hi")];
        let request = ChatRequest {
            messages: &messages,
            temperature: 0.5,
            max_tokens: Some(256),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["max_tokens"], json!(256));
        assert_eq!(body["messages"][0]["role"], json!("system"));
    }

    #[test]
    fn test_first_choice_becomes_assistant_message() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": "Python is used for scripting."}}]}"#,
        )
        .unwrap();
        let message = first_message(response).unwrap();
        assert_eq!(message, ChatMessage::assistant("Python is used for scripting."));
    }

    #[test]
    fn test_empty_choices_is_an_error() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            first_message(response),
            Err(VecRagError::LlmError(_))
        ));
    }
}
