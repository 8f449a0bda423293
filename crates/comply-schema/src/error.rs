//! Error types for schema ingestion
//!
//! Only structurally unusable input is an error. Missing or oddly shaped
//! optional keys degrade to "no value" during normalization instead.

/// Errors while turning schema text into a [`crate::Schema`]
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// No parser registered for file extension
    #[error("no parser registered for extension: '{0}'")]
    NoParserForExtension(String),

    /// Text is not valid in the parser's format
    #[error("syntax error in {format} schema: {message}")]
    Syntax {
        /// Format name (`json`, `yaml`)
        format: &'static str,
        /// Underlying parser message
        message: String,
    },

    /// A structural element has the wrong shape
    #[error("invalid schema at {location}: expected {expected}")]
    Shape {
        /// Where in the schema (e.g. `phase 'Plan' step 2`)
        location: String,
        /// What was expected there
        expected: &'static str,
    },

    /// Nesting deeper than the ingestion guard
    #[error("schema nesting exceeds maximum depth of {max_depth}")]
    TooDeep {
        /// Configured guard
        max_depth: usize,
    },

    /// More nodes than [`crate::NodeId`] can number
    #[error("schema has more nodes than node ids can number")]
    TooManyNodes,
}

impl SchemaError {
    /// Create syntax error for a format
    pub fn syntax(format: &'static str, message: impl ToString) -> Self {
        Self::Syntax {
            format,
            message: message.to_string(),
        }
    }

    /// Create shape error for a location
    pub fn shape(location: impl Into<String>, expected: &'static str) -> Self {
        Self::Shape {
            location: location.into(),
            expected,
        }
    }
}

/// Result type alias for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
