//! Conversation controller
//!
//! Orchestrates one turn: try to resolve the prompt into a function call
//! and dispatch it; when nothing resolves, fall back to the static
//! greeting/help/echo responses. One prompt is processed to completion at
//! a time and no state survives the turn.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::LogConfigSource;
use crate::handlers::{
    Dispatcher, LogHandler, MathHandler, PortfolioHandler, ProcessLauncher, ScriptHandler,
};
use crate::logging::Logger;
use crate::model::LanguageModel;
use crate::output::ResponseSink;
use crate::registry::FunctionRegistry;
use crate::resolver::IntentResolver;
use crate::types::CancellationToken;

/// Drives a single conversation
pub struct ChatController {
    resolver: IntentResolver,
    dispatcher: Dispatcher,
    logger: Arc<dyn Logger>,
}

impl ChatController {
    /// Wire up a controller from its collaborators
    ///
    /// The registry is built once here and shared with the resolver;
    /// the same model serves intent resolution and handler-level
    /// analysis, as the original assistant did.
    pub fn new(
        model: Arc<dyn LanguageModel>,
        launcher: Arc<dyn ProcessLauncher>,
        log_config: Arc<dyn LogConfigSource>,
        scripts_dir: impl Into<PathBuf>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let registry = Arc::new(FunctionRegistry::builtin());
        let resolver = IntentResolver::new(model.clone(), registry, logger.clone());
        let dispatcher = Dispatcher::new(
            MathHandler::new(logger.clone()),
            ScriptHandler::new(launcher, scripts_dir, logger.clone()),
            PortfolioHandler::new(model.clone(), logger.clone()),
            LogHandler::new(log_config, model, logger.clone()),
            logger.clone(),
        );
        Self {
            resolver,
            dispatcher,
            logger,
        }
    }

    /// Process one prompt to completion
    pub async fn handle_turn(
        &self,
        prompt: &str,
        sink: &dyn ResponseSink,
        cancel: CancellationToken,
    ) {
        if let Some(call) = self.resolver.resolve(prompt, cancel.clone()).await {
            let handled = self.dispatcher.dispatch(&call, prompt, sink, cancel).await;
            self.logger
                .debug(&format!("turn: {} handled={}", call.name, handled));
            return;
        }

        let lower = prompt.to_lowercase();
        if lower.contains("hello") || lower.contains("hi") {
            self.greeting(sink);
        } else if lower.contains("help") {
            self.help(sink);
        } else {
            self.echo(prompt, sink);
        }
    }

    fn greeting(&self, sink: &dyn ResponseSink) {
        sink.write(
            "👋 Hi! I'm your AI-powered assistant! I can do math calculations, run demo scripts, search portfolio data and analyze log files.",
        );
        sink.write("\n\n🧠 **Try asking me**:");
        sink.write("\n- \"Add 5 and 3\"");
        sink.write("\n- \"What is 10 times 4?\"");
        sink.write("\n- \"Search for John's projects\"");
        sink.write("\n- \"Run script1 with hello and world\"");
        sink.write("\n- \"Analyze logs from production api\"");
    }

    fn help(&self, sink: &dyn ResponseSink) {
        sink.write(
            "## 🤖 AI-Powered Assistant\n\n\
             I interpret natural language, decide whether a function should run, and call it for you.\n\n\
             ## 🧮 Math Operations\n\
             - **Addition**: \"Add 5 and 3\", \"What's 10 plus 20?\"\n\
             - **Multiplication**: \"Multiply 4 by 6\", \"What is 8 times 9?\"\n\n\
             ## 📊 Portfolio Search (REST API + AI)\n\
             - **Search Projects**: \"Search for design projects\", \"Find John's work\"\n\
             - **Portfolio Analysis**: \"Show me portfolio data\", \"What projects are available?\"\n\n\
             ## ⚡ Script Execution\n\
             - **Run a demo script**: \"Run script1 with hello and world\"\n\
             - **Calculator**: \"Execute calculator script with 15 25 add\"\n\n\
             ## 📂 Log Analysis\n\
             - **Analyze errors**: \"Analyze logs from production api\"\n\
             - **Read raw entries**: \"Read log file dev frontend\"\n\
             - **Show configured logs**: \"List log configurations\"\n\n\
             💡 I use AI to interpret your requests and call the appropriate functions or APIs!",
        );
    }

    fn echo(&self, prompt: &str, sink: &dyn ResponseSink) {
        sink.write(&format!("You said: \"{}\"", prompt));
        sink.write(
            "\n\n🤖 I'm an AI-powered assistant! I can do math calculations, run scripts, search portfolio data and analyze logs.",
        );
        sink.write("\n\n✨ **Try asking me**:");
        sink.write("\n- \"Add 15 and 25\" (Math)");
        sink.write("\n- \"Search for design projects\" (Portfolio API)");
        sink.write("\n- \"Run script1 with hello and world\" (Scripts)");
        sink.write("\n- \"Analyze logs from production api\" (Logs)");
    }
}
