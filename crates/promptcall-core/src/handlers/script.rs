//! Script execution handler
//!
//! Runs demo shell scripts resolved through a fixed alias table. The
//! launch itself goes through the [`ProcessLauncher`] seam so tests can
//! stub it; the real `TokioLauncher` spawns `sh` with a bounded timeout
//! and captures stdout and stderr separately.
//!
//! Non-empty stderr is reported as "executed with warnings", not as a
//! failure. A nonzero exit with empty stderr is likewise reported as
//! success; the exit code is surfaced in the output for the reader.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::error::{HandlerError, HandlerResult};
use crate::logging::Logger;
use crate::output::ResponseSink;
use crate::types::{CancellationToken, FunctionCategory, FunctionSpec};

/// Script function table
pub fn specs() -> Vec<FunctionSpec> {
    vec![FunctionSpec::new(
        "ExecuteScript",
        FunctionCategory::Script,
        "Executes bundled demo scripts with optional parameters",
    )
    .with_parameters(["script", "args?"])
    .with_example("Run script1 with hello and world")]
}

/// Timeout applied to every script run, independent of turn cancellation
pub const SCRIPT_TIMEOUT_SECS: u64 = 30;

/// Symbolic aliases accepted as the first argument
const ALIASES: [(&str, &str); 4] = [
    ("script1", "script1.sh"),
    ("script2", "script2.sh"),
    ("greeting", "script1.sh"),
    ("calculator", "script2.sh"),
];

fn resolve_alias(name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, file)| *file)
}

fn alias_names() -> String {
    ALIASES
        .iter()
        .map(|(alias, _)| *alias)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Captured output of a finished process
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    /// Exit code, if the process exited normally
    pub exit_code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

/// Process launcher collaborator
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Spawn a program and wait for it, within a timeout
    async fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> HandlerResult<ProcessOutput>;
}

/// Launcher backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioLauncher;

impl TokioLauncher {
    /// Create a launcher
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessLauncher for TokioLauncher {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> HandlerResult<ProcessOutput> {
        let output = tokio::process::Command::new(program)
            .args(args)
            .current_dir(cwd)
            .kill_on_drop(true)
            .output();

        let bounded = tokio::time::timeout(timeout, output);
        let result = match cancel.run_until_cancelled(bounded).await {
            None => return Err(HandlerError::Cancelled),
            Some(Err(_)) => return Err(HandlerError::Timeout(timeout.as_secs())),
            Some(Ok(result)) => result,
        };

        let output = result.map_err(|e| HandlerError::Spawn(e.to_string()))?;
        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Deterministic launcher for tests
///
/// Returns a canned result and records each invocation.
#[derive(Debug, Default)]
pub struct MockLauncher {
    result: Mutex<Option<HandlerResult<ProcessOutput>>>,
    invocations: Mutex<Vec<(String, Vec<String>)>>,
}

impl MockLauncher {
    /// Launcher that succeeds with the given stdout/stderr
    pub fn with_output(exit_code: i32, stdout: &str, stderr: &str) -> Self {
        Self {
            result: Mutex::new(Some(Ok(ProcessOutput {
                exit_code: Some(exit_code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            }))),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Launcher that fails with the given error
    pub fn with_error(error: HandlerError) -> Self {
        Self {
            result: Mutex::new(Some(Err(error))),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Programs and arguments this launcher has been asked to run
    pub fn invocations(&self) -> Vec<(String, Vec<String>)> {
        self.invocations.lock().clone()
    }
}

#[async_trait]
impl ProcessLauncher for MockLauncher {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        _cwd: &Path,
        _timeout: Duration,
        _cancel: CancellationToken,
    ) -> HandlerResult<ProcessOutput> {
        self.invocations
            .lock()
            .push((program.to_string(), args.to_vec()));
        self.result
            .lock()
            .take()
            .unwrap_or_else(|| Ok(ProcessOutput::default()))
    }
}

/// Typed payload for a script call
#[derive(Debug, Clone, PartialEq)]
struct ScriptArgs {
    script: String,
    args: Vec<String>,
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl ScriptArgs {
    /// Validate the untyped argument array: a script name, then an
    /// optional argument list (array or single value)
    fn parse(args: &[Value]) -> Result<Self, String> {
        let script = match args.first() {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(_) => return Err("requires a script name as first parameter".to_string()),
            None => return Err("requires at least 1 parameter (script name)".to_string()),
        };
        let args = match args.get(1) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.iter().map(value_to_string).collect(),
            Some(other) => vec![value_to_string(other)],
        };
        Ok(Self { script, args })
    }
}

/// Handler for script execution calls
pub struct ScriptHandler {
    launcher: Arc<dyn ProcessLauncher>,
    scripts_dir: PathBuf,
    logger: Arc<dyn Logger>,
}

impl ScriptHandler {
    /// Create a script handler over a scripts directory
    pub fn new(
        launcher: Arc<dyn ProcessLauncher>,
        scripts_dir: impl Into<PathBuf>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            launcher,
            scripts_dir: scripts_dir.into(),
            logger,
        }
    }

    /// Validate, execute and render a script call
    pub async fn handle(
        &self,
        args: &[Value],
        _prompt: &str,
        sink: &dyn ResponseSink,
        cancel: CancellationToken,
    ) -> HandlerResult<()> {
        let parsed = match ScriptArgs::parse(args) {
            Ok(parsed) => parsed,
            Err(requirement) => {
                sink.write(&format!("❌ **Error**: ExecuteScript {}", requirement));
                sink.write(&format!("\n\n**Available scripts**: {}", alias_names()));
                sink.write("\n\n**Examples**:");
                sink.write("\n- \"Run script1 with hello and world\"");
                sink.write("\n- \"Execute calculator script with 15 25 multiply\"");
                return Ok(());
            }
        };

        sink.write(&format!("⚡ **Executing Script**: \"{}\"", parsed.script));
        if !parsed.args.is_empty() {
            sink.write(&format!("\n📝 **Arguments**: {}", parsed.args.join(", ")));
        }
        sink.write("\n\n⏳ *Running script...*");

        let script_file = match resolve_alias(&parsed.script) {
            Some(file) => file,
            None => {
                sink.write(&format!(
                    "\n\n❌ Script '{}' not found. Available scripts: {}",
                    parsed.script,
                    alias_names()
                ));
                return Ok(());
            }
        };

        let script_path = self.scripts_dir.join(script_file);
        let mut launch_args = vec![script_path.to_string_lossy().into_owned()];
        launch_args.extend(parsed.args.iter().cloned());

        self.logger.info(&format!(
            "script: running sh {}",
            launch_args.join(" ")
        ));

        let output = self
            .launcher
            .run(
                "sh",
                &launch_args,
                &self.scripts_dir,
                Duration::from_secs(SCRIPT_TIMEOUT_SECS),
                cancel,
            )
            .await;

        match output {
            Ok(output) => {
                if !output.stderr.is_empty() {
                    self.logger
                        .warn(&format!("script stderr: {}", output.stderr.trim_end()));
                    sink.write(&format!(
                        "\n\n⚠️ Script executed with warnings:\n\n**Output:**\n```\n{}\n```\n\n**Warnings:**\n```\n{}\n```",
                        output.stdout, output.stderr
                    ));
                } else {
                    let exit_note = match output.exit_code {
                        Some(0) | None => String::new(),
                        Some(code) => format!("\n**Exit code:** {}", code),
                    };
                    sink.write(&format!(
                        "\n\n✅ **Script Executed Successfully!**\n\n**Script:** {}\n**Arguments:** {}{}\n\n**Output:**\n```\n{}\n```",
                        parsed.script,
                        if parsed.args.is_empty() {
                            "None".to_string()
                        } else {
                            parsed.args.join(", ")
                        },
                        exit_note,
                        output.stdout
                    ));
                }
            }
            Err(e) => {
                self.logger.error(&format!("script execution failed: {}", e));
                sink.write(&format!(
                    "\n\n❌ **Error executing script:**\n\n```\n{}\n```\n\n**Tip:** Make sure `sh` is available and the script exists.",
                    e
                ));
            }
        }
        Ok(())
    }
}
