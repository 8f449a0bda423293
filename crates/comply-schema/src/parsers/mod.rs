//! Schema parsers for different text formats
//!
//! Each parser turns authored text into a JSON value tree and hands it to
//! the [`Normalizer`](crate::normalize::Normalizer):
//! - JSON via serde_json
//! - YAML via serde_yaml

use crate::error::SchemaError;
use crate::normalize::{Normalizer, DEFAULT_MAX_DEPTH};
use crate::schema::Schema;
use serde_json::Value;
use std::path::Path;

mod json;
mod yaml;

pub use json::JsonSchemaParser;
pub use yaml::YamlSchemaParser;

/// Parser trait for converting schema text into a [`Schema`]
///
/// Implement this trait to add support for new formats.
pub trait SchemaParser: Send + Sync + 'static {
    /// Format name used in error messages
    fn format(&self) -> &'static str;

    /// Parse text into a raw value tree
    ///
    /// # Errors
    /// Returns [`SchemaError::Syntax`] if the text is malformed.
    fn parse_value(&self, content: &str) -> Result<Value, SchemaError>;

    /// Parse and normalize text
    ///
    /// # Errors
    /// Returns error if the text is malformed or the skeleton is invalid.
    fn parse(&self, content: &str) -> Result<Schema, SchemaError> {
        self.parse_with_depth(content, DEFAULT_MAX_DEPTH)
    }

    /// Parse and normalize with a custom nesting guard
    ///
    /// # Errors
    /// Same as [`SchemaParser::parse`], plus [`SchemaError::TooDeep`].
    fn parse_with_depth(&self, content: &str, max_depth: usize) -> Result<Schema, SchemaError> {
        let value = self.parse_value(content)?;
        Normalizer::new().with_max_depth(max_depth).normalize(&value)
    }

    /// Supported file extensions (without dot)
    fn extensions(&self) -> &[&str];

    /// Check if this parser can handle the given path
    fn can_parse(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }
}

/// Extension-based parser lookup
pub struct ParserRegistry {
    parsers: Vec<Box<dyn SchemaParser>>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        default_parsers()
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("parser_count", &self.parsers.len())
            .field("extensions", &self.all_extensions())
            .finish()
    }
}

impl ParserRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Register a parser; later registrations win on shared extensions
    pub fn register<P: SchemaParser>(&mut self, parser: P) {
        self.parsers.insert(0, Box::new(parser));
    }

    /// Find parser for path
    #[must_use]
    pub fn find_for_path(&self, path: &Path) -> Option<&dyn SchemaParser> {
        self.parsers.iter().find(|p| p.can_parse(path)).map(|p| &**p)
    }

    /// Parse `content` with the parser matching `path`'s extension
    ///
    /// # Errors
    /// Returns [`SchemaError::NoParserForExtension`] when nothing matches,
    /// otherwise whatever the parser returns.
    pub fn parse_for_path(&self, path: &Path, content: &str) -> Result<Schema, SchemaError> {
        let parser = self.find_for_path(path).ok_or_else(|| {
            SchemaError::NoParserForExtension(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default()
                    .to_string(),
            )
        })?;
        parser.parse(content)
    }

    /// Get all registered extensions
    #[must_use]
    pub fn all_extensions(&self) -> Vec<&str> {
        self.parsers
            .iter()
            .flat_map(|p| p.extensions())
            .copied()
            .collect()
    }
}

/// Create registry with the built-in JSON and YAML parsers
#[must_use]
pub fn default_parsers() -> ParserRegistry {
    let mut registry = ParserRegistry::new();
    registry.register(YamlSchemaParser);
    registry.register(JsonSchemaParser);
    registry
}
