//! PromptCall Core
//!
//! Runtime-agnostic engine for a natural-language function-calling
//! assistant. A language model interprets free-text prompts and selects
//! from a small registry of named functions (math, demo scripts, a REST
//! portfolio search, log-file analysis); a dispatcher routes each
//! resolved call to its handler, which streams formatted markdown to a
//! pluggable response sink.
//!
//! The crate has no UI: hosts supply a [`LanguageModel`], a
//! [`ResponseSink`] and a [`Logger`] and drive turns through the
//! [`ChatController`].
//!
//! ```rust,ignore
//! use promptcall_core::{ChatController, ConsoleSink, CancellationToken};
//!
//! let controller = ChatController::new(model, launcher, log_config, "./scripts", logger);
//! controller.handle_turn("Add 5 and 3", &ConsoleSink::new(), CancellationToken::new()).await;
//! ```

pub mod config;
pub mod controller;
pub mod handlers;
pub mod logging;
pub mod model;
pub mod output;
pub mod registry;
pub mod resolver;
pub mod types;

// Re-export commonly used types
pub use types::{CancellationToken, FunctionCategory, FunctionSpec, ResolvedCall};

pub use logging::{ConsoleLogger, Logger, NoOpLogger};

pub use output::{ConsoleSink, MemorySink, ResponseSink};

pub use model::{
    drain, LanguageModel, MockModel, ModelError, ModelResult, OpenAiCompatModel, TextStream,
};

pub use config::{FileLogConfig, LogConfigSource, LogTarget, MemoryLogConfig};

pub use registry::FunctionRegistry;

pub use resolver::IntentResolver;

pub use handlers::{
    Dispatcher, HandlerError, HandlerResult, LogHandler, MathHandler, MockLauncher,
    PortfolioHandler, ProcessLauncher, ProcessOutput, ScriptHandler, TokioLauncher,
};

pub use controller::ChatController;
