//! OpenAI-compatible chat completion client
//!
//! Minimal non-streaming client for any endpoint speaking the
//! `/chat/completions` protocol (OpenAI, Ollama, vLLM, ...). The full
//! completion is fetched in one request and handed back as a
//! single-fragment stream, which satisfies the drain-then-interpret
//! contract the resolver and handlers rely on.

use async_trait::async_trait;
use futures::stream;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{ModelError, ModelResult};
use super::traits::{LanguageModel, TextStream};
use crate::logging::Logger;
use crate::types::CancellationToken;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for OpenAI-compatible chat endpoints
pub struct OpenAiCompatModel {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
    logger: Arc<dyn Logger>,
}

impl OpenAiCompatModel {
    /// Create a client against an API base URL (without trailing slash)
    pub fn new(
        api_base: impl Into<String>,
        model: impl Into<String>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            api_key: None,
            model: model.into(),
            logger,
        }
    }

    /// Set the bearer token sent with each request
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }

    async fn complete(&self, prompt: &str) -> ModelResult<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut request = self.client.post(self.completions_url()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ModelError::api(status.as_u16(), detail));
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ModelError::empty_response(&self.model))
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompatModel {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn send(&self, prompt: &str, cancel: CancellationToken) -> ModelResult<TextStream> {
        self.logger.debug(&format!(
            "OpenAiCompatModel: sending {} chars to {}",
            prompt.len(),
            self.completions_url()
        ));

        let text = match cancel.run_until_cancelled(self.complete(prompt)).await {
            Some(result) => result?,
            None => return Err(ModelError::Cancelled),
        };

        Ok(Box::pin(stream::once(async move { Ok(text) })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;

    #[test]
    fn test_completions_url_trims_slash() {
        let logger: Arc<dyn Logger> = Arc::new(NoOpLogger::new());
        let model = OpenAiCompatModel::new("http://localhost:11434/v1/", "llama3", logger);
        assert_eq!(
            model.completions_url(),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_response_envelope_parsing() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn test_cancelled_before_send() {
        let logger: Arc<dyn Logger> = Arc::new(NoOpLogger::new());
        let model = OpenAiCompatModel::new("http://localhost:0", "none", logger);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = model.send("prompt", cancel).await;
        assert!(matches!(result, Err(ModelError::Cancelled)));
    }
}
