//! Configuration source trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One configured log file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogTarget {
    /// Environment name (e.g. "production", "staging", "dev")
    pub environment: String,
    /// Component name (e.g. "api", "frontend", "database")
    pub component: String,
    /// Path to the log file
    pub path: String,
    /// Optional free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LogTarget {
    /// Create a log target
    pub fn new(
        environment: impl Into<String>,
        component: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            environment: environment.into(),
            component: component.into(),
            path: path.into(),
            description: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Read-only source of configured log targets
///
/// Implementations:
/// - `MemoryLogConfig`: fixed list for tests and embedding
/// - `FileLogConfig`: YAML file on disk
/// - Host adapter: the embedding chat UI's settings store
#[async_trait]
pub trait LogConfigSource: Send + Sync {
    /// All configured log targets
    async fn log_targets(&self) -> Vec<LogTarget>;

    /// Find a target by environment and component, case-insensitively
    async fn find_target(&self, environment: &str, component: &str) -> Option<LogTarget> {
        let env = environment.to_lowercase();
        let comp = component.to_lowercase();
        self.log_targets()
            .await
            .into_iter()
            .find(|t| t.environment.to_lowercase() == env && t.component.to_lowercase() == comp)
    }
}
