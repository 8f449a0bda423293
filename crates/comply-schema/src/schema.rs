//! Normalized schema tree
//!
//! `phase name → [Step]`, each step holding an optional name and its root
//! field nodes. Phase and step order is the authored order.

use crate::node::FieldNode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One questionnaire step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// `StepName`, if authored
    pub name: Option<String>,
    /// Root field nodes
    pub fields: Vec<Arc<FieldNode>>,
}

impl Step {
    /// Create a step
    #[inline]
    #[must_use]
    pub fn new(name: Option<String>, fields: Vec<Arc<FieldNode>>) -> Self {
        Self { name, fields }
    }

    /// Create a named step
    #[inline]
    #[must_use]
    pub fn named(name: impl Into<String>, fields: Vec<FieldNode>) -> Self {
        Self {
            name: Some(name.into()),
            fields: fields.into_iter().map(Arc::new).collect(),
        }
    }

    /// Step name or `fallback`
    #[inline]
    #[must_use]
    pub fn name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(fallback)
    }

    /// Same step with different root fields
    #[must_use]
    pub fn with_fields(&self, fields: Vec<Arc<FieldNode>>) -> Self {
        Self {
            name: self.name.clone(),
            fields,
        }
    }

    /// Total node count across all root fields
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.fields.iter().map(|f| f.subtree_len()).sum()
    }
}

/// Ordered mapping of phase name to steps
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    phases: IndexMap<String, Vec<Step>>,
}

impl Schema {
    /// Empty schema
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step to a phase, creating the phase if needed
    pub fn push_step(&mut self, phase: impl Into<String>, step: Step) {
        self.phases.entry(phase.into()).or_default().push(step);
    }

    /// Builder form of [`Schema::push_step`]
    #[must_use]
    pub fn with_step(mut self, phase: impl Into<String>, step: Step) -> Self {
        self.push_step(phase, step);
        self
    }

    /// Replace a phase's steps
    pub fn insert_phase(&mut self, phase: impl Into<String>, steps: Vec<Step>) {
        self.phases.insert(phase.into(), steps);
    }

    /// Phases in authored order
    #[inline]
    pub fn phases(&self) -> impl Iterator<Item = (&str, &[Step])> {
        self.phases.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Every `(phase, step)` pair in order
    pub fn steps(&self) -> impl Iterator<Item = (&str, &Step)> {
        self.phases
            .iter()
            .flat_map(|(phase, steps)| steps.iter().map(move |s| (phase.as_str(), s)))
    }

    /// Steps of one phase
    #[must_use]
    pub fn phase(&self, name: &str) -> Option<&[Step]> {
        self.phases.get(name).map(Vec::as_slice)
    }

    /// Number of phases
    #[inline]
    #[must_use]
    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// Number of steps across phases
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.phases.values().map(Vec::len).sum()
    }

    /// Number of field nodes across the whole tree
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.steps().map(|(_, s)| s.node_count()).sum()
    }

    /// Check if there are no phases
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }
}
