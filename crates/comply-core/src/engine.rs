//! Compliance engine
//!
//! The facade a questionnaire host talks to. It owns no captured values
//! and caches nothing: every render pass re-reads the value store so an
//! edited answer shows up on the next pass.

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use comply_filter::{FacetCatalog, FilterEngine, Selection};
use comply_graph::{ComplianceGraph, GraphBuilder};
use comply_progress::ProgressReport;
use comply_schema::parsers::{default_parsers, ParserRegistry};
use comply_schema::{CapturedValues, Schema, SchemaError};
use serde::Serialize;
use std::path::Path;

/// Output of one render pass
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    /// Selection the pass was run with
    pub selection: Selection,
    /// Schema after facet filtering
    pub schema: Schema,
    /// Hierarchy built from the filtered schema
    pub graph: ComplianceGraph,
    /// Coverage at every scope
    pub progress: ProgressReport,
}

/// The compliance engine
#[derive(Debug)]
pub struct ComplianceEngine {
    config: EngineConfig,
    parsers: ParserRegistry,
    filter: FilterEngine,
    builder: GraphBuilder,
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ComplianceEngine {
    /// Create engine from configuration
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            filter: config.filter_engine(),
            builder: config.graph_builder(),
            parsers: default_parsers(),
            config,
        }
    }

    /// Create engine from a TOML configuration file
    ///
    /// # Errors
    /// See [`EngineConfig::from_path`].
    pub fn from_config_path(path: impl AsRef<Path>) -> EngineResult<Self> {
        EngineConfig::from_path(path).map(Self::new)
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse schema text, choosing the format from `path`'s extension
    ///
    /// # Errors
    /// Returns [`EngineError::Schema`] for unknown extensions and for text
    /// the parser rejects.
    pub fn parse_schema(&self, path: &Path, text: &str) -> EngineResult<Schema> {
        let parser = self.parsers.find_for_path(path).ok_or_else(|| {
            SchemaError::NoParserForExtension(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default()
                    .to_string(),
            )
        })?;
        let schema = parser.parse_with_depth(text, self.config.max_depth)?;
        tracing::info!(
            format = parser.format(),
            phases = schema.phase_count(),
            steps = schema.step_count(),
            nodes = schema.node_count(),
            "parsed schema"
        );
        Ok(schema)
    }

    /// Read and parse a schema file
    ///
    /// # Errors
    /// Returns [`EngineError::Io`] if the file cannot be read, otherwise as
    /// [`ComplianceEngine::parse_schema`].
    pub fn load_schema(&self, path: impl AsRef<Path>) -> EngineResult<Schema> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        self.parse_schema(path, &text)
    }

    /// Distinct roles and dimensions offered by a schema
    #[must_use]
    pub fn catalog(&self, schema: &Schema) -> FacetCatalog {
        FacetCatalog::collect(schema)
    }

    /// Apply the facet filter to every step
    ///
    /// # Errors
    /// Returns [`EngineError::Filter`] if nesting exceeds the depth guard.
    pub fn filter(&self, schema: &Schema, selection: &Selection) -> EngineResult<Schema> {
        Ok(self.filter.filter_schema(schema, selection)?)
    }

    /// Build the compliance hierarchy
    ///
    /// # Errors
    /// Returns [`EngineError::Graph`] if nesting exceeds the depth guard.
    pub fn build_graph(
        &self,
        schema: &Schema,
        values: &dyn CapturedValues,
    ) -> EngineResult<ComplianceGraph> {
        Ok(self.builder.build(schema, values)?)
    }

    /// Compute coverage at every scope
    #[must_use]
    pub fn progress(&self, graph: &ComplianceGraph, values: &dyn CapturedValues) -> ProgressReport {
        ProgressReport::compute(&graph.steps, values)
    }

    /// Run one full pass
    ///
    /// # Workflow
    /// 1. Filter the schema by `selection`
    /// 2. Build the hierarchy from the filtered schema
    /// 3. Compute progress from the hierarchy
    ///
    /// # Errors
    /// Whatever the filter or builder reports.
    pub fn render_pass(
        &self,
        schema: &Schema,
        selection: &Selection,
        values: &dyn CapturedValues,
    ) -> EngineResult<RenderSnapshot> {
        let filtered = self.filter(schema, selection)?;
        let graph = self.build_graph(&filtered, values)?;
        let progress = self.progress(&graph, values);

        tracing::info!(
            role = selection.role(),
            dimension = selection.dimension(),
            requirements = graph.steps.requirement_count(),
            implementations = progress.global.total,
            percent = progress.global.percent,
            "render pass complete"
        );

        Ok(RenderSnapshot {
            selection: selection.clone(),
            schema: filtered,
            graph,
            progress,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comply_schema::NoValues;
    use comply_test_utils::{sample_schema, sample_values, SAMPLE_SCHEMA_JSON};

    #[test]
    fn parse_schema_by_extension() {
        let engine = ComplianceEngine::default();
        let schema = engine
            .parse_schema(Path::new("soa.json"), SAMPLE_SCHEMA_JSON)
            .unwrap();
        assert_eq!(schema, sample_schema());

        let err = engine
            .parse_schema(Path::new("soa.xml"), SAMPLE_SCHEMA_JSON)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Schema(SchemaError::NoParserForExtension(ref ext)) if ext == "xml"
        ));
    }

    #[test]
    fn depth_guard_from_config() {
        let engine = ComplianceEngine::new(EngineConfig::new().with_max_depth(1));
        let err = engine
            .parse_schema(Path::new("soa.json"), SAMPLE_SCHEMA_JSON)
            .unwrap_err();
        assert!(matches!(err, EngineError::Schema(SchemaError::TooDeep { max_depth: 1 })));
    }

    #[test]
    fn unfiltered_pass() {
        let engine = ComplianceEngine::default();
        let schema = sample_schema();
        let snapshot = engine
            .render_pass(&schema, &Selection::all(), &sample_values())
            .unwrap();

        assert_eq!(snapshot.schema, schema);
        assert_eq!(snapshot.graph.steps.link_count(), 4);
        assert_eq!(snapshot.progress.global.percent, 75);
    }

    #[test]
    fn pass_without_values() {
        let snapshot = ComplianceEngine::default()
            .render_pass(&sample_schema(), &Selection::all(), &NoValues)
            .unwrap();
        assert_eq!(snapshot.graph.steps.link_count(), 0);
        assert_eq!(snapshot.progress.global.percent, 100);
    }
}
