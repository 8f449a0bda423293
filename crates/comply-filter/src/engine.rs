//! Recursive facet filter
//!
//! Prunes a field tree against a [`Selection`]. A node survives when it
//! matches directly or when at least one descendant survives; surviving
//! nodes are shallow copies whose children are the surviving children.

use crate::error::FilterError;
use crate::selection::Selection;
use comply_schema::{FieldNode, Schema, DEFAULT_MAX_DEPTH};
use std::sync::Arc;

/// Dimension tag that satisfies any active dimension filter
pub const DEFAULT_WILDCARD_DIMENSION: &str = "Comply";

/// Facet filter
#[derive(Debug, Clone)]
pub struct FilterEngine {
    wildcard_dimension: String,
    max_depth: usize,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterEngine {
    /// Create filter with default wildcard and depth guard
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            wildcard_dimension: DEFAULT_WILDCARD_DIMENSION.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// With a different wildcard dimension tag
    #[inline]
    #[must_use]
    pub fn with_wildcard_dimension(mut self, wildcard: impl Into<String>) -> Self {
        self.wildcard_dimension = wildcard.into();
        self
    }

    /// With max recursion depth
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Check a node against the active facets, ignoring descendants
    ///
    /// Inactive facets pass vacuously.
    #[must_use]
    pub fn matches_directly(&self, node: &FieldNode, selection: &Selection) -> bool {
        let role_ok = selection
            .role()
            .map_or(true, |role| node.roles().contains(role));

        let dimension_ok = selection.dimension().map_or(true, |dimension| {
            let dims = node.dimensions();
            dims.contains(&self.wildcard_dimension) || dims.contains(dimension)
        });

        role_ok && dimension_ok
    }

    /// Filter one subtree
    ///
    /// Returns `Ok(None)` when neither the node nor any descendant matches.
    /// With no active facet the node is returned as is.
    ///
    /// # Errors
    /// Returns [`FilterError::DepthExceeded`] if nesting is deeper than the
    /// configured guard.
    pub fn filter(
        &self,
        node: &Arc<FieldNode>,
        selection: &Selection,
    ) -> Result<Option<Arc<FieldNode>>, FilterError> {
        if !selection.is_active() {
            return Ok(Some(Arc::clone(node)));
        }
        self.filter_at(node, selection, 0)
    }

    fn filter_at(
        &self,
        node: &Arc<FieldNode>,
        selection: &Selection,
        depth: usize,
    ) -> Result<Option<Arc<FieldNode>>, FilterError> {
        if depth >= self.max_depth {
            tracing::warn!(node = %node.id(), max_depth = self.max_depth, "filter depth guard tripped");
            return Err(FilterError::DepthExceeded {
                max_depth: self.max_depth,
            });
        }

        let mut kept = Vec::with_capacity(node.children().len());
        for child in node.children() {
            if let Some(filtered) = self.filter_at(child, selection, depth + 1)? {
                kept.push(filtered);
            }
        }

        if kept.is_empty() && !self.matches_directly(node, selection) {
            return Ok(None);
        }

        // Untouched subtrees are shared rather than copied.
        let unchanged = kept.len() == node.children().len()
            && kept
                .iter()
                .zip(node.children())
                .all(|(a, b)| Arc::ptr_eq(a, b));
        if unchanged {
            return Ok(Some(Arc::clone(node)));
        }

        Ok(Some(Arc::new(node.shallow_with_children(kept))))
    }

    /// Filter every root field of every step
    ///
    /// Phases and steps are always kept, possibly with no fields.
    ///
    /// # Errors
    /// Same as [`FilterEngine::filter`].
    pub fn filter_schema(&self, schema: &Schema, selection: &Selection) -> Result<Schema, FilterError> {
        if !selection.is_active() {
            return Ok(schema.clone());
        }

        let mut filtered = Schema::new();
        let mut dropped = 0usize;
        for (phase, steps) in schema.phases() {
            let mut kept_steps = Vec::with_capacity(steps.len());
            for step in steps {
                let mut fields = Vec::with_capacity(step.fields.len());
                for field in &step.fields {
                    match self.filter(field, selection)? {
                        Some(f) => fields.push(f),
                        None => dropped += 1,
                    }
                }
                kept_steps.push(step.with_fields(fields));
            }
            filtered.insert_phase(phase, kept_steps);
        }

        tracing::debug!(
            role = selection.role(),
            dimension = selection.dimension(),
            dropped_roots = dropped,
            "filtered schema"
        );
        Ok(filtered)
    }
}

/// Filter a subtree with default settings
///
/// # Errors
/// See [`FilterEngine::filter`].
pub fn filter(
    node: &Arc<FieldNode>,
    selection: &Selection,
) -> Result<Option<Arc<FieldNode>>, FilterError> {
    FilterEngine::new().filter(node, selection)
}
