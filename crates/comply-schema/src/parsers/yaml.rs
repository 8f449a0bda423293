//! YAML schema parser
//!
//! Uses serde_yaml, deserializing straight into a JSON value tree so both
//! formats share one normalizer. Anchors and aliases are resolved by
//! serde_yaml; non-string mapping keys are rejected as syntax errors.

use crate::error::SchemaError;
use crate::parsers::SchemaParser;
use serde_json::Value;

/// YAML parser
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlSchemaParser;

impl SchemaParser for YamlSchemaParser {
    fn format(&self) -> &'static str {
        "yaml"
    }

    fn parse_value(&self, content: &str) -> Result<Value, SchemaError> {
        serde_yaml::from_str(content).map_err(|e| SchemaError::syntax("yaml", e))
    }

    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}
