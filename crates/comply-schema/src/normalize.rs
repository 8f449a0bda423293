//! Ingestion normalizer
//!
//! Turns a loosely shaped JSON value tree into a typed [`Schema`]. Field
//! keys that are missing or hold an unexpected shape become "no value";
//! only the phase/step skeleton must be well formed.

use crate::error::{SchemaError, SchemaResult};
use crate::facet::FacetList;
use crate::node::{FieldNode, NodeIdAllocator};
use crate::schema::{Schema, Step};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Default nesting guard for ingestion
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Raw schema keys
mod keys {
    pub(super) const STEP_NAME: &str = "StepName";
    pub(super) const FIELDS: &str = "Fields";
    pub(super) const CONTROLS: &str = "controls";
    pub(super) const FIELD_NAME: &str = "FieldName";
    pub(super) const CONTROL_NUMBER: &str = "control_number";
    pub(super) const FIELD_TYPE: &str = "FieldType";
    pub(super) const JK_TYPE: &str = "jkType";
    pub(super) const ROLE: &str = "Role";
    pub(super) const TRUST_DIMENSION: &str = "TrustDimension";
    pub(super) const CONTROL: &str = "Control";
    pub(super) const REQUIREMENT_CONTROL_NUMBER: &str = "requirement_control_number";
    pub(super) const JK_TEXT: &str = "jkText";
    pub(super) const JK_NAME: &str = "jkName";
}

/// Schema normalizer
///
/// Assigns pre-order [`crate::NodeId`]s, so one normalizer run yields ids
/// unique across the whole schema.
#[derive(Debug)]
pub struct Normalizer {
    ids: NodeIdAllocator,
    max_depth: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Create normalizer with the default depth guard
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            ids: NodeIdAllocator::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// With a custom depth guard
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Normalize a whole schema
    ///
    /// # Errors
    /// Returns error if the root is not a phase mapping, a phase is not a
    /// step array, a step is not an object, or nesting exceeds the guard.
    pub fn normalize(mut self, root: &Value) -> SchemaResult<Schema> {
        let phases = root
            .as_object()
            .ok_or_else(|| SchemaError::shape("root", "an object of phase name to steps"))?;

        let mut schema = Schema::new();
        for (phase, steps) in phases {
            let steps = steps
                .as_array()
                .ok_or_else(|| SchemaError::shape(format!("phase '{phase}'"), "an array of steps"))?;

            let mut normalized = Vec::with_capacity(steps.len());
            for (index, step) in steps.iter().enumerate() {
                let step = step.as_object().ok_or_else(|| {
                    SchemaError::shape(format!("phase '{phase}' step {index}"), "a step object")
                })?;
                normalized.push(self.step(step)?);
            }
            schema.insert_phase(phase.clone(), normalized);
        }

        tracing::debug!(
            phases = schema.phase_count(),
            steps = schema.step_count(),
            nodes = self.ids.allocated(),
            "normalized schema"
        );
        Ok(schema)
    }

    fn step(&mut self, step: &Map<String, Value>) -> SchemaResult<Step> {
        let name = string_value(step.get(keys::STEP_NAME));
        let fields = self.children(step.get(keys::FIELDS), None, 0)?;
        Ok(Step::new(name, fields))
    }

    fn children(
        &mut self,
        fields: Option<&Value>,
        controls: Option<&Value>,
        depth: usize,
    ) -> SchemaResult<Vec<Arc<FieldNode>>> {
        let mut out = Vec::new();
        for list in [fields, controls].into_iter().flatten() {
            let Some(items) = list.as_array() else {
                continue;
            };
            for item in items {
                if let Some(obj) = item.as_object() {
                    out.push(Arc::new(self.node(obj, depth)?));
                }
            }
        }
        Ok(out)
    }

    fn node(&mut self, obj: &Map<String, Value>, depth: usize) -> SchemaResult<FieldNode> {
        if depth >= self.max_depth {
            return Err(SchemaError::TooDeep {
                max_depth: self.max_depth,
            });
        }

        let id = self.ids.allocate().ok_or(SchemaError::TooManyNodes)?;
        let mut node = FieldNode::new(id)
            .with_roles(facet_value(obj.get(keys::ROLE)))
            .with_dimensions(facet_value(obj.get(keys::TRUST_DIMENSION)))
            .with_controls(facet_value(obj.get(keys::CONTROL)));

        let field_type =
            string_value(obj.get(keys::FIELD_TYPE)).or_else(|| string_value(obj.get(keys::JK_TYPE)));
        if let Some(field_type) = field_type {
            node = node.with_field_type(field_type);
        }
        if let Some(name) = string_value(obj.get(keys::FIELD_NAME)) {
            node = node.with_field_name(name);
        }
        if let Some(number) = string_value(obj.get(keys::CONTROL_NUMBER)) {
            node = node.with_control_number(number);
        }
        if let Some(key) = string_value(obj.get(keys::REQUIREMENT_CONTROL_NUMBER)) {
            node = node.with_requirement_control_number(key);
        }
        if let Some(text) = string_value(obj.get(keys::JK_TEXT)) {
            node = node.with_text(text);
        }
        if let Some(label) = string_value(obj.get(keys::JK_NAME)) {
            node = node.with_label(label);
        }

        let children = self.children(obj.get(keys::FIELDS), obj.get(keys::CONTROLS), depth + 1)?;
        Ok(node.with_children(children))
    }
}

/// Normalize with default settings
///
/// # Errors
/// See [`Normalizer::normalize`].
pub fn normalize(root: &Value) -> SchemaResult<Schema> {
    Normalizer::new().normalize(root)
}

/// Scalar as string; integers are rendered, everything else is absent
///
/// Floats are absent because their authored text is already lost: `5.10`
/// arrives as `5.1` and would collide with a different key.
fn string_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if !n.is_f64() => Some(n.to_string()),
        Value::Number(n) => {
            tracing::trace!(value = %n, "dropping non-integer number");
            None
        }
        _ => None,
    }
}

/// Comma-separated string or array of scalars
fn facet_value(value: Option<&Value>) -> FacetList {
    match value {
        Some(Value::String(s)) => FacetList::parse(s),
        Some(Value::Array(items)) => {
            FacetList::from_tokens(items.iter().filter_map(|v| string_value(Some(v))))
        }
        number @ Some(Value::Number(_)) => {
            string_value(number).map_or_else(FacetList::empty, |n| FacetList::parse(&n))
        }
        _ => FacetList::empty(),
    }
}
