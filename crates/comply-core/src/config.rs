//! Engine configuration
//!
//! Every convention the engine relies on (article prefix, applicability
//! value, wildcard dimension) is a field here, defaulting to the values
//! questionnaire schemas use today. Loadable from TOML; missing keys fall
//! back to defaults.
//!
//! ```toml
//! article_prefix = "Article"
//! applicable_status = "Applicable"
//! link_scope = "step"
//! log_format = "json"
//! ```

use crate::error::{EngineError, EngineResult};
use crate::telemetry::LogFormat;
use comply_filter::{FilterEngine, DEFAULT_WILDCARD_DIMENSION};
use comply_graph::{
    GraphBuilder, LinkScope, DEFAULT_APPLICABLE_STATUS, DEFAULT_ARTICLE_PREFIX, DEFAULT_STEP_NAME,
};
use comply_schema::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Step-name prefix admitting a step into the hierarchy
    pub article_prefix: String,
    /// Name for steps without `StepName`
    pub default_step_name: String,
    /// Status that lets a requirement accept implementations
    pub applicable_status: String,
    /// Dimension tag matching every dimension filter
    pub wildcard_dimension: String,
    /// Nesting guard for ingestion, filtering and flattening
    pub max_depth: usize,
    /// Implementation lookup scope
    pub link_scope: LinkScope,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            article_prefix: DEFAULT_ARTICLE_PREFIX.to_string(),
            default_step_name: DEFAULT_STEP_NAME.to_string(),
            applicable_status: DEFAULT_APPLICABLE_STATUS.to_string(),
            wildcard_dimension: DEFAULT_WILDCARD_DIMENSION.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            link_scope: LinkScope::Step,
            log_format: LogFormat::Pretty,
        }
    }
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With step-name prefix
    #[inline]
    #[must_use]
    pub fn with_article_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.article_prefix = prefix.into();
        self
    }

    /// With fallback step name
    #[inline]
    #[must_use]
    pub fn with_default_step_name(mut self, name: impl Into<String>) -> Self {
        self.default_step_name = name.into();
        self
    }

    /// With applicable status value
    #[inline]
    #[must_use]
    pub fn with_applicable_status(mut self, status: impl Into<String>) -> Self {
        self.applicable_status = status.into();
        self
    }

    /// With wildcard dimension
    #[inline]
    #[must_use]
    pub fn with_wildcard_dimension(mut self, wildcard: impl Into<String>) -> Self {
        self.wildcard_dimension = wildcard.into();
        self
    }

    /// With nesting guard
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// With link scope
    #[inline]
    #[must_use]
    pub fn with_link_scope(mut self, scope: LinkScope) -> Self {
        self.link_scope = scope;
        self
    }

    /// With log format
    #[inline]
    #[must_use]
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Parse and validate TOML text
    ///
    /// # Errors
    /// Returns [`EngineError::ConfigParse`] for invalid TOML or unknown
    /// keys, [`EngineError::Config`] for invalid values.
    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// Returns [`EngineError::Io`] if the file cannot be read, otherwise
    /// as [`EngineConfig::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Check value constraints
    ///
    /// # Errors
    /// Returns [`EngineError::Config`] naming the first bad field.
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_depth == 0 {
            return Err(EngineError::config("max_depth must be at least 1"));
        }
        if self.applicable_status.trim().is_empty() {
            return Err(EngineError::config("applicable_status must not be blank"));
        }
        if self.wildcard_dimension.trim().is_empty() {
            return Err(EngineError::config("wildcard_dimension must not be blank"));
        }
        if self.default_step_name.trim().is_empty() {
            return Err(EngineError::config("default_step_name must not be blank"));
        }
        Ok(())
    }

    /// Filter engine for these settings
    #[must_use]
    pub fn filter_engine(&self) -> FilterEngine {
        FilterEngine::new()
            .with_wildcard_dimension(self.wildcard_dimension.clone())
            .with_max_depth(self.max_depth)
    }

    /// Graph builder for these settings
    #[must_use]
    pub fn graph_builder(&self) -> GraphBuilder {
        GraphBuilder::new()
            .with_article_prefix(self.article_prefix.clone())
            .with_default_step_name(self.default_step_name.clone())
            .with_applicable_status(self.applicable_status.clone())
            .with_link_scope(self.link_scope)
            .with_max_depth(self.max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let config = EngineConfig::from_toml_str(
            r#"
            applicable_status = "Yes"
            link_scope = "global"
            log_format = "json"
            max_depth = 32
            "#,
        )
        .unwrap();

        assert_eq!(config.applicable_status, "Yes");
        assert_eq!(config.link_scope, LinkScope::Global);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.max_depth, 32);
        assert_eq!(config.article_prefix, "Article");
    }

    #[test]
    fn unknown_key_rejected() {
        let err = EngineConfig::from_toml_str("colour = \"blue\"").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }

    #[test]
    fn bad_scope_rejected() {
        let err = EngineConfig::from_toml_str("link_scope = \"phase\"").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }

    #[test]
    fn validation() {
        assert!(EngineConfig::new().with_max_depth(0).validate().is_err());
        assert!(EngineConfig::new().with_applicable_status(" ").validate().is_err());
        assert!(EngineConfig::new().with_wildcard_dimension("").validate().is_err());
        assert!(EngineConfig::new().validate().is_ok());

        let err = EngineConfig::from_toml_str("max_depth = 0").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn toml_round_trip() {
        let config = EngineConfig::new()
            .with_article_prefix("Art.")
            .with_link_scope(LinkScope::Global);
        let text = toml::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }
}
