//! In-memory configuration source

use async_trait::async_trait;
use parking_lot::RwLock;

use super::traits::{LogConfigSource, LogTarget};

/// In-memory log configuration for testing and embedding
#[derive(Debug, Default)]
pub struct MemoryLogConfig {
    targets: RwLock<Vec<LogTarget>>,
}

impl MemoryLogConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration with an initial target list
    pub fn with_targets(targets: Vec<LogTarget>) -> Self {
        Self {
            targets: RwLock::new(targets),
        }
    }

    /// Replace the target list (useful for tests)
    pub fn set_targets(&self, targets: Vec<LogTarget>) {
        let mut guard = self.targets.write();
        *guard = targets;
    }
}

#[async_trait]
impl LogConfigSource for MemoryLogConfig {
    async fn log_targets(&self) -> Vec<LogTarget> {
        self.targets.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_config() {
        let config = MemoryLogConfig::new();
        assert!(config.log_targets().await.is_empty());

        config.set_targets(vec![
            LogTarget::new("dev", "frontend", "./logs/dev-frontend.log")
                .with_description("Development frontend logs"),
        ]);

        let targets = config.log_targets().await;
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].component, "frontend");
    }
}
