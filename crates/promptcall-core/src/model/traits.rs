//! Language model trait definition

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::pin::Pin;

use super::error::ModelResult;
use crate::types::CancellationToken;

/// Type alias for the streaming text response
pub type TextStream = Pin<Box<dyn Stream<Item = ModelResult<String>> + Send>>;

/// Language model collaborator
///
/// The single narrow interface the pipeline consumes: a prompt goes in,
/// an asynchronous stream of UTF-8 text fragments comes out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Identifier for diagnostics (e.g. "mock", "openai-compat")
    fn name(&self) -> &str;

    /// Send a prompt and stream back the response text
    async fn send(&self, prompt: &str, cancel: CancellationToken) -> ModelResult<TextStream>;
}

/// Drain a text stream to completion and concatenate the fragments
///
/// The first stream error aborts the drain and is returned as-is.
pub async fn drain(mut stream: TextStream) -> ModelResult<String> {
    let mut full = String::new();
    while let Some(fragment) = stream.next().await {
        full.push_str(&fragment?);
    }
    Ok(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[tokio::test]
    async fn test_drain_concatenates() {
        let chunks: Vec<ModelResult<String>> =
            vec![Ok("Hello".to_string()), Ok(", ".to_string()), Ok("world".to_string())];
        let stream: TextStream = Box::pin(stream::iter(chunks));

        let full = drain(stream).await.unwrap();
        assert_eq!(full, "Hello, world");
    }

    #[tokio::test]
    async fn test_drain_propagates_error() {
        let chunks: Vec<ModelResult<String>> = vec![
            Ok("partial".to_string()),
            Err(crate::model::ModelError::Other("boom".to_string())),
        ];
        let stream: TextStream = Box::pin(stream::iter(chunks));

        assert!(drain(stream).await.is_err());
    }
}
