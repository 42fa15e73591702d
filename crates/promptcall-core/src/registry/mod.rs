//! Function registry
//!
//! Read-only mapping from function name to [`FunctionSpec`], composed at
//! startup from the per-category tables the handler modules export. The
//! registry is built once, wrapped in an `Arc`, and passed into the
//! resolver and dispatcher; there is no mutation API and no ambient
//! module-level state. Extension means adding an entry to a table.

use std::collections::HashMap;

use crate::handlers::{log, math, portfolio, script};
use crate::types::FunctionSpec;

/// Immutable registry of callable functions
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    specs: Vec<FunctionSpec>,
    // name -> position in `specs`; lookup is case-sensitive
    index: HashMap<String, usize>,
}

impl FunctionRegistry {
    /// Build a registry from an explicit list of specs
    ///
    /// Duplicate names are a programmer error in the function tables.
    pub fn from_specs(specs: impl IntoIterator<Item = FunctionSpec>) -> Self {
        let specs: Vec<FunctionSpec> = specs.into_iter().collect();
        let mut index = HashMap::with_capacity(specs.len());
        for (pos, spec) in specs.iter().enumerate() {
            let previous = index.insert(spec.name.clone(), pos);
            debug_assert!(previous.is_none(), "duplicate function name: {}", spec.name);
        }
        Self { specs, index }
    }

    /// Build the registry of all built-in functions
    pub fn builtin() -> Self {
        let mut specs = Vec::new();
        specs.extend(math::specs());
        specs.extend(script::specs());
        specs.extend(portfolio::specs());
        specs.extend(log::specs());
        Self::from_specs(specs)
    }

    /// Look up a function by exact name
    pub fn get(&self, name: &str) -> Option<&FunctionSpec> {
        self.index.get(name).map(|&pos| &self.specs[pos])
    }

    /// Check whether a function is registered
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate specs in insertion order (stable instruction text)
    pub fn iter(&self) -> impl Iterator<Item = &FunctionSpec> {
        self.specs.iter()
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Render the "Available functions" block for the resolver instruction
    pub fn signature_lines(&self) -> String {
        self.specs
            .iter()
            .map(|s| format!("- {}", s.signature()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FunctionCategory;

    #[test]
    fn test_builtin_registry_contents() {
        let registry = FunctionRegistry::builtin();

        for name in [
            "AddTwoNumbers",
            "MultiplyNumbers",
            "ExecuteScript",
            "SearchPortfolio",
            "AnalyzeLogErrors",
            "ReadLogFile",
            "ListLogConfigurations",
        ] {
            assert!(registry.contains(name), "missing {}", name);
        }
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = FunctionRegistry::builtin();
        assert!(registry.get("AddTwoNumbers").is_some());
        assert!(registry.get("addtwonumbers").is_none());
    }

    #[test]
    fn test_categories() {
        let registry = FunctionRegistry::builtin();
        assert_eq!(
            registry.get("AddTwoNumbers").unwrap().category,
            FunctionCategory::Math
        );
        assert_eq!(
            registry.get("SearchPortfolio").unwrap().category,
            FunctionCategory::Api
        );
        assert_eq!(
            registry.get("ExecuteScript").unwrap().category,
            FunctionCategory::Script
        );
        assert_eq!(
            registry.get("ReadLogFile").unwrap().category,
            FunctionCategory::Log
        );
    }

    #[test]
    fn test_signature_lines() {
        let registry = FunctionRegistry::builtin();
        let lines = registry.signature_lines();

        assert!(lines.contains("- AddTwoNumbers(number1, number2):"));
        assert!(lines.contains("- ExecuteScript(script, args?):"));
        assert_eq!(lines.lines().count(), registry.len());
    }
}
