//! Error types for Comply Core
//!
//! Wraps the per-stage errors so callers of the render pass handle one type.

use comply_filter::FilterError;
use comply_graph::GraphError;
use comply_schema::SchemaError;
use std::path::PathBuf;

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Schema could not be ingested
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Filtering failed
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    /// Graph building failed
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// File could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration text is not valid TOML for [`crate::EngineConfig`]
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration values are inconsistent
    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Create configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create I/O error for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if the error comes from configuration
    #[inline]
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::ConfigParse(_))
    }
}

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_stage_errors() {
        let err: EngineError = GraphError::DepthExceeded {
            step: "Article 1".to_string(),
            max_depth: 4,
        }
        .into();
        assert!(matches!(err, EngineError::Graph(_)));
        assert!(err.to_string().starts_with("graph error: "));
    }

    #[test]
    fn io_display_names_path() {
        let err = EngineError::io(
            "/tmp/missing.toml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.to_string(), "failed to read /tmp/missing.toml: gone");
        assert!(!err.is_config());
    }

    #[test]
    fn config_helper() {
        let err = EngineError::config("max_depth must be positive");
        assert!(err.is_config());
        assert_eq!(err.to_string(), "configuration error: max_depth must be positive");
    }
}
