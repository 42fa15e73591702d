//! File-based configuration source (YAML)
//!
//! Reads a `log_files:` list from a YAML file, e.g.:
//!
//! ```yaml
//! log_files:
//!   - environment: production
//!     component: api
//!     path: /var/log/prod-api.log
//!     description: Production API logs
//! ```
//!
//! A missing or unparseable file degrades to an empty list; configuration
//! problems must never take a conversation turn down.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::traits::{LogConfigSource, LogTarget};
use crate::logging::{Logger, NoOpLogger};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    log_files: Vec<LogTarget>,
}

/// File-based log configuration source
pub struct FileLogConfig {
    path: PathBuf,
    cache: RwLock<Option<Vec<LogTarget>>>,
    logger: Arc<dyn Logger>,
}

impl FileLogConfig {
    /// Create a source for a specific file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
            logger: Arc::new(NoOpLogger::new()),
        }
    }

    /// Create a user-level source (~/.config/promptcall/config.yaml)
    pub fn user() -> Self {
        let config_dir = dirs::config_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        });
        Self::new(config_dir.join("promptcall").join("config.yaml"))
    }

    /// Attach a logger for load diagnostics
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// The config file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the config file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reload from disk, replacing the cache
    pub fn reload(&self) -> Vec<LogTarget> {
        let targets = self.load();
        let mut cache = self.cache.write();
        *cache = Some(targets.clone());
        targets
    }

    fn load(&self) -> Vec<LogTarget> {
        if !self.path.exists() {
            return Vec::new();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                self.logger
                    .warn(&format!("failed to read {}: {}", self.path.display(), e));
                return Vec::new();
            }
        };

        match serde_yaml::from_str::<ConfigFile>(&content) {
            Ok(config) => config.log_files,
            Err(e) => {
                self.logger
                    .warn(&format!("failed to parse {}: {}", self.path.display(), e));
                Vec::new()
            }
        }
    }

    fn cached_or_load(&self) -> Vec<LogTarget> {
        if let Some(targets) = self.cache.read().as_ref() {
            return targets.clone();
        }
        self.reload()
    }
}

impl std::fmt::Debug for FileLogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLogConfig")
            .field("path", &self.path)
            .field("exists", &self.exists())
            .finish()
    }
}

#[async_trait]
impl LogConfigSource for FileLogConfig {
    async fn log_targets(&self) -> Vec<LogTarget> {
        self.cached_or_load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let source = FileLogConfig::new(dir.path().join("config.yaml"));

        assert!(!source.exists());
        assert!(source.log_targets().await.is_empty());
    }

    #[tokio::test]
    async fn test_yaml_loading() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "log_files:\n\
             \x20 - environment: production\n\
             \x20   component: api\n\
             \x20   path: /var/log/prod-api.log\n\
             \x20   description: Production API logs\n\
             \x20 - environment: dev\n\
             \x20   component: frontend\n\
             \x20   path: ./logs/dev-frontend.log\n",
        )
        .unwrap();

        let source = FileLogConfig::new(&path);
        let targets = source.log_targets().await;

        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].environment, "production");
        assert_eq!(
            targets[0].description.as_deref(),
            Some("Production API logs")
        );
        assert!(targets[1].description.is_none());

        let found = source.find_target("DEV", "Frontend").await.unwrap();
        assert_eq!(found.path, "./logs/dev-frontend.log");
    }

    #[tokio::test]
    async fn test_malformed_yaml_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "log_files: {not a list").unwrap();

        let source = FileLogConfig::new(&path);
        assert!(source.log_targets().await.is_empty());
    }

    #[tokio::test]
    async fn test_reload_picks_up_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "log_files: []").unwrap();

        let source = FileLogConfig::new(&path);
        assert!(source.log_targets().await.is_empty());

        fs::write(
            &path,
            "log_files:\n  - {environment: dev, component: api, path: ./dev.log}\n",
        )
        .unwrap();

        // Cached until reload
        assert!(source.log_targets().await.is_empty());
        assert_eq!(source.reload().len(), 1);
        assert_eq!(source.log_targets().await.len(), 1);
    }
}
