//! Intent resolver
//!
//! Turns a free-text prompt into at most one [`ResolvedCall`] by asking
//! the language model to emit a small JSON object. This is best-effort by
//! design: any failure along the way (model error, malformed JSON, null
//! function name) degrades to "no call" and the conversation falls back
//! to its default behavior. Nothing in here raises.
//!
//! The JSON-parsing strategy is deliberately isolated behind this module
//! so it can be swapped for structured function-calling APIs without
//! touching the dispatcher or handlers.

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::logging::Logger;
use crate::model::{drain, LanguageModel};
use crate::registry::FunctionRegistry;
use crate::types::{CancellationToken, FunctionCategory, ResolvedCall};

/// Wire shape the model is asked to produce
#[derive(Debug, Deserialize)]
struct RawCall {
    #[serde(rename = "functionName")]
    function_name: Option<String>,
    #[serde(default)]
    args: Vec<Value>,
    #[serde(rename = "type", default)]
    category: Option<String>,
}

/// Resolves natural-language prompts into function calls
pub struct IntentResolver {
    model: Arc<dyn LanguageModel>,
    registry: Arc<FunctionRegistry>,
    logger: Arc<dyn Logger>,
}

impl IntentResolver {
    /// Create a resolver over a model and a registry
    pub fn new(
        model: Arc<dyn LanguageModel>,
        registry: Arc<FunctionRegistry>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            model,
            registry,
            logger,
        }
    }

    /// The instruction sent to the model for a given user input
    fn build_parser_prompt(&self, input: &str) -> String {
        format!(
            "You are a function call parser. Given a user input, determine if they want to call a function and extract the parameters.\n\n\
             Available functions:\n{}\n\n\
             Respond ONLY with a JSON object in this exact format:\n\
             {{\"functionName\": \"FunctionName\", \"args\": [param1, param2], \"type\": \"math|api|script|log\"}}\n\n\
             If no function should be called, respond with: {{\"functionName\": null, \"args\": [], \"type\": \"none\"}}\n\n\
             Examples:\n\
             - \"Add 5 and 3\" → {{\"functionName\": \"AddTwoNumbers\", \"args\": [5, 3], \"type\": \"math\"}}\n\
             - \"What is 10 times 4?\" → {{\"functionName\": \"MultiplyNumbers\", \"args\": [10, 4], \"type\": \"math\"}}\n\
             - \"Search for John's projects\" → {{\"functionName\": \"SearchPortfolio\", \"args\": [\"John's projects\"], \"type\": \"api\"}}\n\
             - \"Run script1 with hello and world\" → {{\"functionName\": \"ExecuteScript\", \"args\": [\"script1\", [\"hello\", \"world\"]], \"type\": \"script\"}}\n\
             - \"Execute calculator script with 15 and 25\" → {{\"functionName\": \"ExecuteScript\", \"args\": [\"calculator\", [\"15\", \"25\", \"add\"]], \"type\": \"script\"}}\n\
             - \"Analyze logs from production api\" → {{\"functionName\": \"AnalyzeLogErrors\", \"args\": [\"production api\"], \"type\": \"log\"}}\n\
             - \"List log configurations\" → {{\"functionName\": \"ListLogConfigurations\", \"args\": [], \"type\": \"log\"}}\n\
             - \"Hello there\" → {{\"functionName\": null, \"args\": [], \"type\": \"none\"}}\n\n\
             User input: \"{}\"",
            self.registry.signature_lines(),
            input
        )
    }

    /// Resolve a prompt into at most one function call
    pub async fn resolve(&self, prompt: &str, cancel: CancellationToken) -> Option<ResolvedCall> {
        let instruction = self.build_parser_prompt(prompt);

        let stream = match self.model.send(&instruction, cancel).await {
            Ok(stream) => stream,
            Err(e) => {
                self.logger.warn(&format!("resolver: model call failed: {}", e));
                return None;
            }
        };

        // Drain fully before interpreting; partial output is never JSON
        let text = match drain(stream).await {
            Ok(text) => text,
            Err(e) => {
                self.logger.warn(&format!("resolver: stream failed: {}", e));
                return None;
            }
        };

        let raw: RawCall = match serde_json::from_str(text.trim()) {
            Ok(raw) => raw,
            Err(e) => {
                self.logger
                    .warn(&format!("resolver: response is not valid JSON: {}", e));
                return None;
            }
        };

        let name = match raw.function_name {
            Some(name) if !name.is_empty() => name,
            _ => return None,
        };

        // Prefer the model's category tag; fall back to the registry entry
        // for the named function when the tag is missing or unrecognized
        let category = raw
            .category
            .as_deref()
            .and_then(FunctionCategory::parse)
            .or_else(|| self.registry.get(&name).map(|spec| spec.category));

        let category = match category {
            Some(category) => category,
            None => {
                self.logger.warn(&format!(
                    "resolver: no routable category for '{}' (tag: {:?})",
                    name, raw.category
                ));
                return None;
            }
        };

        self.logger.info(&format!(
            "resolver: {} ({}) with {} args",
            name,
            category,
            raw.args.len()
        ));
        Some(ResolvedCall::new(name, raw.args, category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::model::MockModel;
    use serde_json::json;

    fn test_logger() -> Arc<dyn Logger> {
        Arc::new(NoOpLogger::new())
    }

    fn resolver_with(model: MockModel) -> IntentResolver {
        IntentResolver::new(
            Arc::new(model),
            Arc::new(FunctionRegistry::builtin()),
            test_logger(),
        )
    }

    #[tokio::test]
    async fn test_resolves_valid_call() {
        let resolver = resolver_with(MockModel::fixed(
            r#"{"functionName": "AddTwoNumbers", "args": [5, 3], "type": "math"}"#,
            test_logger(),
        ));

        let call = resolver
            .resolve("Add 5 and 3", CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(call.name, "AddTwoNumbers");
        assert_eq!(call.args, vec![json!(5), json!(3)]);
        assert_eq!(call.category, FunctionCategory::Math);
    }

    #[tokio::test]
    async fn test_chunked_response_is_drained_before_parsing() {
        let resolver = resolver_with(
            MockModel::fixed(
                r#"{"functionName": "SearchPortfolio", "args": ["design"], "type": "api"}"#,
                test_logger(),
            )
            .with_chunk_size(7),
        );

        let call = resolver
            .resolve("Search for design projects", CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(call.name, "SearchPortfolio");
    }

    #[tokio::test]
    async fn test_malformed_json_is_no_call() {
        let resolver = resolver_with(MockModel::fixed(
            "Sure! I'd be happy to help with that.",
            test_logger(),
        ));

        assert!(resolver
            .resolve("Add 5 and 3", CancellationToken::new())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_null_function_name_is_no_call() {
        let resolver = resolver_with(MockModel::fixed(
            r#"{"functionName": null, "args": [], "type": "none"}"#,
            test_logger(),
        ));

        assert!(resolver
            .resolve("Hello there", CancellationToken::new())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_absent_function_name_is_no_call() {
        let resolver = resolver_with(MockModel::fixed(r#"{"args": []}"#, test_logger()));

        assert!(resolver
            .resolve("Hello there", CancellationToken::new())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_empty_response_is_no_call() {
        let resolver = resolver_with(MockModel::with_mode(
            crate::model::MockMode::Empty,
            test_logger(),
        ));

        assert!(resolver
            .resolve("Add 5 and 3", CancellationToken::new())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_model_error_is_no_call() {
        let resolver = resolver_with(MockModel::error("connection reset", test_logger()));

        assert!(resolver
            .resolve("Add 5 and 3", CancellationToken::new())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_unknown_tag_falls_back_to_registry_category() {
        let resolver = resolver_with(MockModel::fixed(
            r#"{"functionName": "ExecuteScript", "args": ["script1"], "type": "tool"}"#,
            test_logger(),
        ));

        let call = resolver
            .resolve("run script1", CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(call.category, FunctionCategory::Script);
    }

    #[tokio::test]
    async fn test_unknown_name_and_tag_is_no_call() {
        let resolver = resolver_with(MockModel::fixed(
            r#"{"functionName": "LaunchMissiles", "args": [], "type": "tool"}"#,
            test_logger(),
        ));

        assert!(resolver
            .resolve("launch the missiles", CancellationToken::new())
            .await
            .is_none());
    }

    #[test]
    fn test_parser_prompt_embeds_signatures_and_input() {
        let resolver = resolver_with(MockModel::fixed("unused", test_logger()));
        let prompt = resolver.build_parser_prompt("Add 5 and 3");

        assert!(prompt.contains("- AddTwoNumbers(number1, number2):"));
        assert!(prompt.contains("- AnalyzeLogErrors(logIdentifier, maxEntries?):"));
        assert!(prompt.contains("User input: \"Add 5 and 3\""));
        assert!(prompt.contains(r#"{"functionName": null, "args": [], "type": "none"}"#));
    }
}
