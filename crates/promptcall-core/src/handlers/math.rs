//! Arithmetic handler

use serde_json::Value;
use std::sync::Arc;

use super::error::HandlerResult;
use crate::logging::Logger;
use crate::output::ResponseSink;
use crate::types::{FunctionCategory, FunctionSpec};

/// Math function table
pub fn specs() -> Vec<FunctionSpec> {
    vec![
        FunctionSpec::new(
            "AddTwoNumbers",
            FunctionCategory::Math,
            "Adds two numbers together",
        )
        .with_parameters(["number1", "number2"])
        .with_example("Add 5 and 3"),
        FunctionSpec::new(
            "MultiplyNumbers",
            FunctionCategory::Math,
            "Multiplies two numbers",
        )
        .with_parameters(["number1", "number2"])
        .with_example("Multiply 4 by 7"),
    ]
}

/// Supported arithmetic operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathOp {
    Add,
    Multiply,
}

impl MathOp {
    /// Map a registered function name to its operation
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "AddTwoNumbers" => Some(MathOp::Add),
            "MultiplyNumbers" => Some(MathOp::Multiply),
            _ => None,
        }
    }

    /// Function name for display
    pub fn name(&self) -> &'static str {
        match self {
            MathOp::Add => "AddTwoNumbers",
            MathOp::Multiply => "MultiplyNumbers",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            MathOp::Add => "addition",
            MathOp::Multiply => "multiplication",
        }
    }

    fn symbol(&self) -> char {
        match self {
            MathOp::Add => '+',
            MathOp::Multiply => '×',
        }
    }
}

/// Add two numbers
pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

/// Multiply two numbers
pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// Typed payload for an arithmetic call
#[derive(Debug, Clone, Copy, PartialEq)]
struct MathArgs {
    a: f64,
    b: f64,
}

impl MathArgs {
    /// Validate the untyped argument array: exactly two numbers
    fn parse(args: &[Value]) -> Result<Self, String> {
        if args.len() != 2 {
            return Err("requires exactly 2 parameters".to_string());
        }
        match (args[0].as_f64(), args[1].as_f64()) {
            (Some(a), Some(b)) => Ok(Self { a, b }),
            _ => Err("requires 2 numeric parameters".to_string()),
        }
    }
}

/// Render a number without a trailing `.0` for whole values
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Handler for arithmetic function calls
pub struct MathHandler {
    logger: Arc<dyn Logger>,
}

impl MathHandler {
    /// Create a math handler
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }

    /// Validate, compute and render an arithmetic call
    pub async fn handle(
        &self,
        op: MathOp,
        args: &[Value],
        prompt: &str,
        sink: &dyn ResponseSink,
    ) -> HandlerResult<()> {
        let parsed = match MathArgs::parse(args) {
            Ok(parsed) => parsed,
            Err(requirement) => {
                sink.write(&format!("❌ **Error**: {} {}", op.name(), requirement));
                return Ok(());
            }
        };

        let result = match op {
            MathOp::Add => add(parsed.a, parsed.b),
            MathOp::Multiply => multiply(parsed.a, parsed.b),
        };
        self.logger.debug(&format!(
            "math: {}({}, {}) = {}",
            op.name(),
            parsed.a,
            parsed.b,
            result
        ));

        sink.write(&format!("🤖 **AI Interpreted**: \"{}\"", prompt));
        sink.write(&format!(
            "\n\n🔧 **Function Call**: `{}({}, {})`",
            op.name(),
            format_number(parsed.a),
            format_number(parsed.b)
        ));
        sink.write(&format!(
            "\n\n✅ **Math Calculation Complete!**\n\n**Operation:** {}\n**Calculation:** {} {} {} = **{}**",
            op.label(),
            format_number(parsed.a),
            op.symbol(),
            format_number(parsed.b),
            format_number(result)
        ));
        Ok(())
    }
}
