//! Function descriptors and resolved call types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category a callable function belongs to
///
/// This is a closed enumeration: the dispatcher matches on it exhaustively,
/// so an unroutable category cannot exist at runtime. The string forms are
/// the wire tags the intent resolver asks the model to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionCategory {
    /// Arithmetic over two numbers
    Math,
    /// REST-backed query with model analysis
    Api,
    /// Local script execution
    Script,
    /// Log-file error analysis
    Log,
}

impl FunctionCategory {
    /// Parse a wire tag (e.g. "math") into a category
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "math" => Some(FunctionCategory::Math),
            "api" => Some(FunctionCategory::Api),
            "script" => Some(FunctionCategory::Script),
            "log" => Some(FunctionCategory::Log),
            _ => None,
        }
    }

    /// The wire tag for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionCategory::Math => "math",
            FunctionCategory::Api => "api",
            FunctionCategory::Script => "script",
            FunctionCategory::Log => "log",
        }
    }
}

impl std::fmt::Display for FunctionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable descriptor for a callable function
///
/// One entry per function in the registry. `parameters` is ordered; an
/// optional trailing parameter carries a `?` suffix (display only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// Unique function name, case-sensitive
    pub name: String,
    /// Category consumed by the dispatcher
    pub category: FunctionCategory,
    /// Ordered parameter names
    pub parameters: Vec<String>,
    /// Human-readable description, shown to the model
    pub description: String,
    /// Sample phrase that should resolve to this function
    pub example: String,
}

impl FunctionSpec {
    /// Create a new function descriptor
    pub fn new(
        name: impl Into<String>,
        category: FunctionCategory,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            parameters: Vec::new(),
            description: description.into(),
            example: String::new(),
        }
    }

    /// Set the ordered parameter names
    pub fn with_parameters<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = params.into_iter().map(Into::into).collect();
        self
    }

    /// Set the usage example
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    /// Render the signature the resolver shows the model,
    /// e.g. `AddTwoNumbers(number1, number2): Adds two numbers together`
    pub fn signature(&self) -> String {
        format!(
            "{}({}): {}",
            self.name,
            self.parameters.join(", "),
            self.description
        )
    }
}

/// Structured outcome of interpreting a prompt as a function invocation
///
/// Created per user prompt, discarded after dispatch; never persisted.
#[derive(Debug, Clone)]
pub struct ResolvedCall {
    /// Function name as emitted by the model
    pub name: String,
    /// Untyped arguments straight from the model's JSON; the handlers
    /// convert these into typed payloads before doing anything with them
    pub args: Vec<Value>,
    /// Routing category
    pub category: FunctionCategory,
}

impl ResolvedCall {
    /// Create a resolved call
    pub fn new(name: impl Into<String>, args: Vec<Value>, category: FunctionCategory) -> Self {
        Self {
            name: name.into(),
            args,
            category,
        }
    }
}
