//! JSON schema parser

use crate::error::SchemaError;
use crate::parsers::SchemaParser;
use serde_json::Value;

/// JSON parser
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaParser;

impl SchemaParser for JsonSchemaParser {
    fn format(&self) -> &'static str {
        "json"
    }

    fn parse_value(&self, content: &str) -> Result<Value, SchemaError> {
        serde_json::from_str(content).map_err(|e| SchemaError::syntax("json", e))
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }
}
