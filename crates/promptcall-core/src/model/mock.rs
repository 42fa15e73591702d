//! Mock model for testing
//!
//! Provides deterministic, configurable responses without network
//! dependencies. The `Sequence` mode hands out one canned response per
//! successive call, which is what two-stage turns (resolve, then
//! handler-level analysis) need in scenario tests.

use async_trait::async_trait;
use futures::{stream, StreamExt};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use super::error::{ModelError, ModelResult};
use super::traits::{LanguageModel, TextStream};
use crate::logging::Logger;
use crate::types::CancellationToken;

/// Mock response mode
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Echo back the prompt
    Echo,
    /// Return a fixed response on every call
    Fixed(String),
    /// Return the response as specific chunks
    Chunks(Vec<String>),
    /// Return one canned response per successive call; calls past the end
    /// of the list yield an empty response
    Sequence(Vec<String>),
    /// Fail with an error after yielding some chunks
    Error { message: String, chunks_before: usize },
    /// Return nothing (empty stream)
    Empty,
}

impl Default for MockMode {
    fn default() -> Self {
        MockMode::Echo
    }
}

/// Mock language model for testing
pub struct MockModel {
    mode: MockMode,
    chunk_delay_ms: u64,
    chunk_size: usize,
    calls: Mutex<usize>,
    logger: Arc<dyn Logger>,
}

impl MockModel {
    /// Create a mock with a specific mode
    pub fn with_mode(mode: MockMode, logger: Arc<dyn Logger>) -> Self {
        Self {
            mode,
            chunk_delay_ms: 0,
            chunk_size: 10,
            calls: Mutex::new(0),
            logger,
        }
    }

    /// Create an echo model
    pub fn echo(logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Echo, logger)
    }

    /// Create a fixed-response model
    pub fn fixed(response: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Fixed(response.into()), logger)
    }

    /// Create a model that replays canned responses in order
    pub fn sequence<I, S>(responses: I, logger: Arc<dyn Logger>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_mode(
            MockMode::Sequence(responses.into_iter().map(Into::into).collect()),
            logger,
        )
    }

    /// Create an error-producing model
    pub fn error(message: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(
            MockMode::Error {
                message: message.into(),
                chunks_before: 0,
            },
            logger,
        )
    }

    /// Set the delay between chunks
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.chunk_delay_ms = delay_ms;
        self
    }

    /// Set the chunk size used when splitting responses
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Number of `send` calls made so far
    pub fn call_count(&self) -> usize {
        *self.calls.lock()
    }

    fn split_into_chunks(&self, text: &str) -> Vec<String> {
        if self.chunk_size == 0 || text.is_empty() {
            return vec![text.to_string()];
        }
        text.chars()
            .collect::<Vec<_>>()
            .chunks(self.chunk_size)
            .map(|c| c.iter().collect())
            .collect()
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, prompt: &str, cancel: CancellationToken) -> ModelResult<TextStream> {
        let call_index = {
            let mut calls = self.calls.lock();
            let i = *calls;
            *calls += 1;
            i
        };
        self.logger
            .debug(&format!("MockModel: send call #{}", call_index));

        // An error marker chunk lets the error surface mid-stream
        let chunks: Vec<String> = match &self.mode {
            MockMode::Echo => self.split_into_chunks(&format!("Echo: {}", prompt)),
            MockMode::Fixed(response) => self.split_into_chunks(response),
            MockMode::Chunks(chunks) => chunks.clone(),
            MockMode::Sequence(responses) => match responses.get(call_index) {
                Some(response) => self.split_into_chunks(response),
                None => vec![],
            },
            MockMode::Empty => vec![],
            MockMode::Error {
                message,
                chunks_before,
            } => {
                let mut result: Vec<String> = (0..*chunks_before)
                    .map(|i| format!("Chunk {} before error. ", i))
                    .collect();
                result.push(format!("__ERROR__:{}", message));
                result
            }
        };

        let delay_ms = self.chunk_delay_ms;
        let stream = stream::iter(chunks.into_iter().enumerate()).then(move |(i, chunk)| {
            let cancel = cancel.clone();
            async move {
                if cancel.is_cancelled() {
                    return Err(ModelError::Cancelled);
                }
                if i > 0 && delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                if let Some(msg) = chunk.strip_prefix("__ERROR__:") {
                    return Err(ModelError::Other(format!("mock error: {}", msg)));
                }
                Ok(chunk)
            }
        });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::model::drain;

    fn test_logger() -> Arc<dyn Logger> {
        Arc::new(NoOpLogger::new())
    }

    #[tokio::test]
    async fn test_echo_mode() {
        let model = MockModel::echo(test_logger());
        let stream = model
            .send("Hello, world!", CancellationToken::new())
            .await
            .unwrap();

        let full = drain(stream).await.unwrap();
        assert_eq!(full, "Echo: Hello, world!");
    }

    #[tokio::test]
    async fn test_fixed_mode_chunked() {
        let model = MockModel::fixed("This is a test response.", test_logger()).with_chunk_size(5);
        let mut stream = model
            .send("anything", CancellationToken::new())
            .await
            .unwrap();

        let mut chunks = Vec::new();
        while let Some(chunk) = stream.next().await {
            chunks.push(chunk.unwrap());
        }
        assert!(chunks.len() > 1);
        assert_eq!(chunks.concat(), "This is a test response.");
    }

    #[tokio::test]
    async fn test_chunks_mode_yields_exact_chunks() {
        let model = MockModel::with_mode(
            MockMode::Chunks(vec![
                "{\"function".to_string(),
                "Name\": null}".to_string(),
            ]),
            test_logger(),
        )
        .with_delay(1);
        let mut stream = model
            .send("anything", CancellationToken::new())
            .await
            .unwrap();

        let mut chunks = Vec::new();
        while let Some(chunk) = stream.next().await {
            chunks.push(chunk.unwrap());
        }
        assert_eq!(chunks, vec!["{\"function", "Name\": null}"]);
    }

    #[tokio::test]
    async fn test_empty_mode_drains_to_nothing() {
        let model = MockModel::with_mode(MockMode::Empty, test_logger());
        let stream = model
            .send("anything", CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(drain(stream).await.unwrap(), "");
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_sequence_mode() {
        let model = MockModel::sequence(["first reply", "second reply"], test_logger());

        let one = drain(model.send("a", CancellationToken::new()).await.unwrap())
            .await
            .unwrap();
        let two = drain(model.send("b", CancellationToken::new()).await.unwrap())
            .await
            .unwrap();
        let three = drain(model.send("c", CancellationToken::new()).await.unwrap())
            .await
            .unwrap();

        assert_eq!(one, "first reply");
        assert_eq!(two, "second reply");
        assert_eq!(three, "");
        assert_eq!(model.call_count(), 3);
    }

    #[tokio::test]
    async fn test_error_mode() {
        let model = MockModel::error("boom", test_logger());
        let stream = model
            .send("anything", CancellationToken::new())
            .await
            .unwrap();

        assert!(drain(stream).await.is_err());
    }

    #[tokio::test]
    async fn test_cancellation_stops_stream() {
        let model = MockModel::fixed("long response to be cancelled", test_logger());
        let cancel = CancellationToken::new();
        let mut stream = model.send("anything", cancel.clone()).await.unwrap();

        let first = stream.next().await.unwrap();
        assert!(first.is_ok());

        cancel.cancel();
        if let Some(next) = stream.next().await {
            assert!(matches!(next, Err(ModelError::Cancelled)));
        }
    }
}
