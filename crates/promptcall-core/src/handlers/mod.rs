//! Tool handlers and the dispatch boundary
//!
//! One handler per function category. The dispatcher routes a resolved
//! call to its handler and is the last line of defense: any error a
//! handler lets escape is converted into a formatted fragment here and
//! reported as "not handled" instead of propagating.

mod error;
pub mod log;
pub mod math;
pub mod portfolio;
pub mod script;

pub use error::{HandlerError, HandlerResult};
pub use log::{LogEntry, LogHandler, LogOp, DEFAULT_MAX_ENTRIES};
pub use math::{MathHandler, MathOp};
pub use portfolio::PortfolioHandler;
pub use script::{
    MockLauncher, ProcessLauncher, ProcessOutput, ScriptHandler, TokioLauncher,
    SCRIPT_TIMEOUT_SECS,
};

use std::sync::Arc;

use crate::logging::Logger;
use crate::output::ResponseSink;
use crate::types::{CancellationToken, FunctionCategory, ResolvedCall};

/// Routes resolved calls to category handlers
///
/// The category enum is closed, so the match below is exhaustive and an
/// unroutable category cannot reach runtime. An unknown function name
/// within a category is still a runtime condition and is reported to the
/// sink.
pub struct Dispatcher {
    math: MathHandler,
    script: ScriptHandler,
    portfolio: PortfolioHandler,
    log: LogHandler,
    logger: Arc<dyn Logger>,
}

impl Dispatcher {
    /// Create a dispatcher over the four handlers
    pub fn new(
        math: MathHandler,
        script: ScriptHandler,
        portfolio: PortfolioHandler,
        log: LogHandler,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            math,
            script,
            portfolio,
            log,
            logger,
        }
    }

    /// Route a resolved call to its handler
    ///
    /// Returns `true` only when a handler ran without raising. Handlers
    /// report domain-level failures (missing file, script warning) via
    /// their own markdown and still count as handled.
    pub async fn dispatch(
        &self,
        call: &ResolvedCall,
        prompt: &str,
        sink: &dyn ResponseSink,
        cancel: CancellationToken,
    ) -> bool {
        self.logger.debug(&format!(
            "dispatch: {} ({}) with {} args",
            call.name,
            call.category,
            call.args.len()
        ));

        let result = match call.category {
            FunctionCategory::Math => match MathOp::from_name(&call.name) {
                Some(op) => self.math.handle(op, &call.args, prompt, sink).await,
                None => return self.unsupported(call, sink),
            },
            FunctionCategory::Api => {
                if call.name == "SearchPortfolio" {
                    self.portfolio.handle(&call.args, prompt, sink, cancel).await
                } else {
                    return self.unsupported(call, sink);
                }
            }
            FunctionCategory::Script => {
                if call.name == "ExecuteScript" {
                    self.script.handle(&call.args, prompt, sink, cancel).await
                } else {
                    return self.unsupported(call, sink);
                }
            }
            FunctionCategory::Log => match LogOp::from_name(&call.name) {
                Some(op) => self.log.handle(op, &call.args, prompt, sink, cancel).await,
                None => return self.unsupported(call, sink),
            },
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                self.logger
                    .error(&format!("handler for {} failed: {}", call.name, e));
                sink.write(&format!(
                    "❌ **Error**: Failed to execute {} - {}",
                    call.name, e
                ));
                false
            }
        }
    }

    fn unsupported(&self, call: &ResolvedCall, sink: &dyn ResponseSink) -> bool {
        self.logger.warn(&format!(
            "unsupported function '{}' of type '{}'",
            call.name, call.category
        ));
        sink.write(&format!(
            "❌ **Error**: Unsupported function '{}' of type '{}'",
            call.name, call.category
        ));
        false
    }
}
