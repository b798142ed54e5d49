//! Format registry for parse-tree serialization
//!
//! Each output format implements [`Formatter`] and registers with
//! [`FormatRegistry`], which the CLI resolves by name.

use crate::parsing::tree::ParseTree;
use std::collections::HashMap;
use std::fmt;

/// Error that can occur during formatting
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Error during serialization
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "format '{name}' not found"),
            FormatError::SerializationError(message) => {
                write!(f, "serialization error: {message}")
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// Trait for parse-tree formatters.
pub trait Formatter: Send + Sync {
    /// The name of this format (e.g. "treeviz", "tag").
    fn name(&self) -> &str;

    /// Serialize a tree to this format.
    fn serialize(&self, tree: &ParseTree) -> Result<String, FormatError>;

    /// Optional description of this format.
    fn description(&self) -> &str {
        ""
    }
}

/// JSON output via serde.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, tree: &ParseTree) -> Result<String, FormatError> {
        serde_json::to_string_pretty(tree)
            .map_err(|error| FormatError::SerializationError(error.to_string()))
    }

    fn description(&self) -> &str {
        "serde JSON serialization of the tree"
    }
}

/// Registry of tree formatters, resolved by name.
pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter, replacing any existing one with the same name.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|formatter| formatter.as_ref())
    }

    /// Serialize a tree using the named format.
    pub fn serialize(&self, tree: &ParseTree, format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.serialize(tree)
    }

    /// All registered format names, sorted.
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registry with the built-in formatters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(super::TagFormatter);
        registry.register(super::TreevizFormatter);
        registry.register(JsonFormatter);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
