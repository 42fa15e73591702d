//! Log analysis handler
//!
//! Three operations: list the configured log files, read the latest
//! error-looking lines out of one, and feed those lines to the model for a
//! structured diagnosis. The model is only consulted when the scan found
//! something to analyze.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::{HandlerError, HandlerResult};
use crate::config::LogConfigSource;
use crate::logging::Logger;
use crate::model::LanguageModel;
use crate::output::ResponseSink;
use crate::types::{CancellationToken, FunctionCategory, FunctionSpec};
use futures::StreamExt;

/// Log function table
pub fn specs() -> Vec<FunctionSpec> {
    vec![
        FunctionSpec::new(
            "AnalyzeLogErrors",
            FunctionCategory::Log,
            "Analyzes log files for errors and provides AI-powered solutions",
        )
        .with_parameters(["logIdentifier", "maxEntries?"])
        .with_example("Analyze logs from production api"),
        FunctionSpec::new(
            "ReadLogFile",
            FunctionCategory::Log,
            "Reads log files and extracts error entries",
        )
        .with_parameters(["logIdentifier", "maxEntries?"])
        .with_example("Read log file dev frontend"),
        FunctionSpec::new(
            "ListLogConfigurations",
            FunctionCategory::Log,
            "Lists all configured log files with environment and component information",
        )
        .with_example("List log configurations"),
    ]
}

/// Log operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOp {
    Analyze,
    Read,
    List,
}

impl LogOp {
    /// Map a registered function name to its operation
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "AnalyzeLogErrors" => Some(LogOp::Analyze),
            "ReadLogFile" => Some(LogOp::Read),
            "ListLogConfigurations" => Some(LogOp::List),
            _ => None,
        }
    }

    /// Function name for display
    pub fn name(&self) -> &'static str {
        match self {
            LogOp::Analyze => "AnalyzeLogErrors",
            LogOp::Read => "ReadLogFile",
            LogOp::List => "ListLogConfigurations",
        }
    }
}

/// Default cap on returned error entries
pub const DEFAULT_MAX_ENTRIES: usize = 4;

/// Case-insensitive markers that make a line an error entry
const ERROR_KEYWORDS: [&str; 14] = [
    "exception", "error", "fail", "failed", "failure", "critical", "fatal", "panic", "crash",
    "abort", "warning", "warn", "severe", "alert",
];

// YYYY-MM-DD, MM/DD/YYYY or DD-MM-YYYY, then HH:MM:SS, separated by
// whitespace or a literal T
static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\d{4}-\d{2}-\d{2}|\d{2}/\d{2}/\d{4}|\d{2}-\d{2}-\d{4})[\sT]\d{2}:\d{2}:\d{2}")
        .expect("timestamp pattern is valid")
});

/// One error-looking line pulled from a log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// 1-based line number in the original file
    pub line_number: usize,
    /// Extracted timestamp, when the line carried one
    pub timestamp: Option<String>,
    /// Trimmed line content
    pub text: String,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.timestamp {
            Some(ts) => write!(f, "[Line {}, {}] {}", self.line_number, ts, self.text),
            None => write!(f, "[Line {}] {}", self.line_number, self.text),
        }
    }
}

fn extract_timestamp(line: &str) -> Option<String> {
    TIMESTAMP_RE.find(line).map(|m| m.as_str().to_string())
}

/// Scan a log file for error entries
///
/// Keeps every non-blank line containing an error keyword, newest
/// (highest line number) first, truncated to `max_entries`.
pub async fn scan_log_file(path: &Path, max_entries: usize) -> HandlerResult<Vec<LogEntry>> {
    if !path.exists() {
        return Err(HandlerError::LogNotFound(path.to_path_buf()));
    }

    let content = tokio::fs::read_to_string(path).await?;

    let mut entries: Vec<LogEntry> = content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return None;
            }
            let lower = trimmed.to_lowercase();
            if !ERROR_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
                return None;
            }
            Some(LogEntry {
                line_number: index + 1,
                timestamp: extract_timestamp(trimmed),
                text: trimmed.to_string(),
            })
        })
        .collect();

    // Latest entries are typically at the end of the file
    entries.sort_by(|a, b| b.line_number.cmp(&a.line_number));
    entries.truncate(max_entries);
    Ok(entries)
}

/// Outcome of resolving a log identifier against the configuration
enum Resolution {
    /// Usable path; the string is the " (env - component)" suffix, empty
    /// for direct paths
    Found(PathBuf, String),
    /// "environment component" pair with no configured match
    NotConfigured { environment: String, component: String },
    /// Not a path and not an "environment component" pair
    Invalid,
}

fn build_analysis_prompt(identity: &str, entries: &[LogEntry]) -> String {
    let numbered = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{}. {}", i + 1, entry))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You are a log analysis expert. I have extracted the latest error entries from a log file. Please analyze these errors and provide:\n\n\
         1. A summary of the main issues found\n\
         2. Potential root causes for each error\n\
         3. Recommended solutions or troubleshooting steps\n\
         4. Priority level (Critical, High, Medium, Low) for each issue\n\n\
         Log file: {}\n\
         Error entries found ({} total):\n\n\
         {}\n\n\
         Please provide a clear, actionable analysis with specific recommendations for resolving these issues. Format your response in markdown with clear sections and bullet points.",
        identity,
        entries.len(),
        numbered
    )
}

/// Typed payload for read/analyze calls
#[derive(Debug, Clone, PartialEq)]
struct LogArgs {
    identifier: String,
    max_entries: usize,
}

impl LogArgs {
    /// Validate the untyped argument array: an identifier, then an
    /// optional entry cap
    fn parse(args: &[Value]) -> Result<Self, String> {
        let identifier = match args.first() {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(_) => return Err("requires a log identifier as first parameter".to_string()),
            None => return Err("requires at least 1 parameter".to_string()),
        };
        let max_entries = match args.get(1) {
            None | Some(Value::Null) => DEFAULT_MAX_ENTRIES,
            Some(v) => match v.as_u64() {
                Some(n) if n > 0 => n as usize,
                _ => DEFAULT_MAX_ENTRIES,
            },
        };
        Ok(Self {
            identifier,
            max_entries,
        })
    }
}

/// Handler for log analysis calls
pub struct LogHandler {
    config: Arc<dyn LogConfigSource>,
    model: Arc<dyn LanguageModel>,
    logger: Arc<dyn Logger>,
}

impl LogHandler {
    /// Create a log handler
    pub fn new(
        config: Arc<dyn LogConfigSource>,
        model: Arc<dyn LanguageModel>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            config,
            model,
            logger,
        }
    }

    /// Render the configured log targets, or setup instructions when none
    /// are configured
    pub async fn list_configurations(&self) -> String {
        let targets = self.config.log_targets().await;

        if targets.is_empty() {
            return "📋 **No Log Configurations Found**\n\n\
                    ⚙️ **Setup Required**: Please configure log files before using log analysis.\n\n\
                    **Steps to configure:**\n\
                    1. Open your configuration file\n\
                    2. Add a `log_files` list with environment, component, and path\n\n\
                    **Example configuration:**\n\
                    ```yaml\n\
                    log_files:\n\
                    \x20 - environment: production\n\
                    \x20   component: api\n\
                    \x20   path: /var/log/prod-api.log\n\
                    \x20   description: Production API logs\n\
                    \x20 - environment: dev\n\
                    \x20   component: frontend\n\
                    \x20   path: ./logs/dev-frontend.log\n\
                    ```"
                .to_string();
        }

        let listing = targets
            .iter()
            .enumerate()
            .map(|(i, t)| {
                format!(
                    "**{}. {} - {}**\n   📁 Path: `{}`\n   📝 Description: {}\n",
                    i + 1,
                    t.environment,
                    t.component,
                    t.path,
                    t.description.as_deref().unwrap_or("No description")
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "📋 **Available Log Configurations** ({} total)\n\n{}\n\n\
             💡 **Usage Examples:**\n\
             - \"Analyze logs from production api\"\n\
             - \"Check dev frontend errors\"\n\
             - \"Read staging database logs\"",
            targets.len(),
            listing
        )
    }

    async fn resolve_identifier(&self, identifier: &str) -> Resolution {
        let as_path = Path::new(identifier);
        if as_path.exists() {
            return Resolution::Found(as_path.to_path_buf(), String::new());
        }

        let parts: Vec<&str> = identifier.split_whitespace().collect();
        if parts.len() < 2 {
            return Resolution::Invalid;
        }

        let environment = parts[0].to_string();
        let component = parts[1..].join(" ");
        match self.config.find_target(&environment, &component).await {
            Some(target) => Resolution::Found(
                PathBuf::from(&target.path),
                format!(" ({} - {})", environment, component),
            ),
            None => Resolution::NotConfigured {
                environment,
                component,
            },
        }
    }

    async fn read(
        &self,
        path: &Path,
        env_info: &str,
        max_entries: usize,
        sink: &dyn ResponseSink,
    ) -> HandlerResult<()> {
        match scan_log_file(path, max_entries).await {
            Ok(entries) => {
                let listing = entries
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| format!("{}. {}", i + 1, entry))
                    .collect::<Vec<_>>()
                    .join("\n\n");
                sink.write(&format!(
                    "\n\n📋 **Log File Read Complete**\n\n**File:** {}{}\n**Error Entries Found:** {}\n\n**Latest Error Entries:**\n\n{}",
                    path.display(),
                    env_info,
                    entries.len(),
                    listing
                ));
            }
            Err(e) => {
                self.logger.error(&format!("log read failed: {}", e));
                sink.write(&format!(
                    "\n\n❌ **Log Read Failed**\n\n**Error:** {}\n\n*Please check if the file exists and is readable.*",
                    e
                ));
            }
        }
        Ok(())
    }

    async fn analyze(
        &self,
        path: &Path,
        env_info: &str,
        max_entries: usize,
        sink: &dyn ResponseSink,
        cancel: CancellationToken,
    ) -> HandlerResult<()> {
        let entries = match scan_log_file(path, max_entries).await {
            Ok(entries) => entries,
            Err(e) => {
                self.logger.error(&format!("log analysis failed: {}", e));
                sink.write(&format!(
                    "\n\n❌ **Log Analysis Failed**\n\n**Error:** {}\n\n*Please check if the file exists and is readable, or verify your log configuration.*",
                    e
                ));
                return Ok(());
            }
        };

        // Clean file: no model call to make
        if entries.is_empty() {
            sink.write(&format!(
                "\n\n📋 **Log Analysis Complete**\n\n✅ **Good News!** No errors, exceptions, or failures found in the log file.\n\n**File:** {}{}\n\n*The log appears to be clean or contains only informational messages.*",
                path.display(),
                env_info
            ));
            return Ok(());
        }

        let identity = format!("{}{}", path.display(), env_info);
        let prompt = build_analysis_prompt(&identity, &entries);

        sink.write(&format!(
            "\n\n📊 **Log File Analysis**\n\n**File:** {}\n**Errors Found:** {}\n\n---\n\n",
            identity,
            entries.len()
        ));

        match self.model.send(&prompt, cancel).await {
            Ok(mut stream) => {
                while let Some(fragment) = stream.next().await {
                    match fragment {
                        Ok(text) => sink.write(&text),
                        Err(e) => {
                            sink.write(&format!("\n\n❌ **Error**: Log analysis failed - {}", e));
                            return Ok(());
                        }
                    }
                }
            }
            Err(e) => {
                sink.write(&format!("\n\n❌ **Error**: Log analysis failed - {}", e));
            }
        }
        Ok(())
    }

    /// Validate, execute and render a log call
    pub async fn handle(
        &self,
        op: LogOp,
        args: &[Value],
        _prompt: &str,
        sink: &dyn ResponseSink,
        cancel: CancellationToken,
    ) -> HandlerResult<()> {
        if op == LogOp::List {
            let listing = self.list_configurations().await;
            sink.write(&listing);
            return Ok(());
        }

        let parsed = match LogArgs::parse(args) {
            Ok(parsed) => parsed,
            Err(requirement) => {
                sink.write(&format!("❌ **Error**: {} {}", op.name(), requirement));
                sink.write("\n\n**Examples**:");
                sink.write("\n- \"Analyze logs from production api\" (using configured logs)");
                sink.write("\n- \"Check dev frontend errors\" (using configured logs)");
                sink.write("\n- \"Analyze logs from /var/log/app.log\" (direct path)");
                sink.write("\n- \"List log configurations\" (show available logs)");
                return Ok(());
            }
        };

        sink.write(&format!(
            "📂 **Processing Log Request**: \"{}\"",
            parsed.identifier
        ));
        sink.write(&format!("\n📋 **Max Error Entries**: {}", parsed.max_entries));
        sink.write("\n\n⏳ *Reading log file and analyzing errors...*");

        let (path, env_info) = match self.resolve_identifier(&parsed.identifier).await {
            Resolution::Found(path, env_info) => (path, env_info),
            Resolution::NotConfigured {
                environment,
                component,
            } => {
                sink.write(&format!(
                    "\n\n❌ **Log Configuration Not Found**: {} - {}",
                    environment, component
                ));
                let listing = self.list_configurations().await;
                sink.write(&format!("\n\n{}", listing));
                return Ok(());
            }
            Resolution::Invalid => {
                sink.write(
                    "\n\n❌ **Invalid Log Identifier**\n\n**Format**: Use either:\n- Direct path: \"/var/log/app.log\"\n- Environment/Component: \"production api\" or \"dev frontend\"",
                );
                return Ok(());
            }
        };

        match op {
            LogOp::Read => self.read(&path, &env_info, parsed.max_entries, sink).await,
            LogOp::Analyze => {
                self.analyze(&path, &env_info, parsed.max_entries, sink, cancel)
                    .await
            }
            LogOp::List => unreachable!("handled above"),
        }
    }
}
