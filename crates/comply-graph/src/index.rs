//! Compliance hierarchy index
//!
//! Provides [`StepGroups`], the `Step → Group → Requirement → Implementation`
//! decomposition, plus [`ImplementationIndex`] for looking up which nodes
//! reference a control key anywhere in a schema.
//!
//! All maps keep insertion order so renderers see authored order.

use comply_schema::{FieldNode, NodeId};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

/// Implementation nodes deduplicated by identity
pub type ImplementationSet = IndexMap<NodeId, Arc<FieldNode>>;

/// Requirement entries of one group, keyed by control key
pub type RequirementMap = IndexMap<String, RequirementEntry>;

/// Group entries of one step, keyed by group name
pub type GroupMap = IndexMap<String, GroupEntry>;

/// A requirement and the implementations linked to it
#[derive(Debug, Clone, Serialize)]
pub struct RequirementEntry {
    node: Arc<FieldNode>,
    #[serde(serialize_with = "serialize_set")]
    implementations: ImplementationSet,
}

impl RequirementEntry {
    /// Create entry with no implementations
    #[inline]
    #[must_use]
    pub fn new(node: Arc<FieldNode>) -> Self {
        Self {
            node,
            implementations: ImplementationSet::new(),
        }
    }

    /// Defining requirement node
    #[inline]
    #[must_use]
    pub fn node(&self) -> &Arc<FieldNode> {
        &self.node
    }

    /// Requirement control key
    #[inline]
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.node.requirement_key()
    }

    /// Link an implementation; returns `false` if it was already linked
    pub fn link(&mut self, implementation: Arc<FieldNode>) -> bool {
        self.implementations
            .insert(implementation.id(), implementation)
            .is_none()
    }

    /// Linked implementations in link order
    pub fn implementations(&self) -> impl Iterator<Item = &Arc<FieldNode>> {
        self.implementations.values()
    }

    /// Check if a node is linked
    #[inline]
    #[must_use]
    pub fn is_linked(&self, id: NodeId) -> bool {
        self.implementations.contains_key(&id)
    }

    /// Number of linked implementations
    #[inline]
    #[must_use]
    pub fn implementation_count(&self) -> usize {
        self.implementations.len()
    }
}

/// A field group that owns at least one requirement
#[derive(Debug, Clone, Serialize)]
pub struct GroupEntry {
    node: Arc<FieldNode>,
    requirements: RequirementMap,
}

impl GroupEntry {
    /// Create entry with no requirements
    #[inline]
    #[must_use]
    pub fn new(node: Arc<FieldNode>) -> Self {
        Self {
            node,
            requirements: RequirementMap::new(),
        }
    }

    /// Group node that created this entry
    #[inline]
    #[must_use]
    pub fn node(&self) -> &Arc<FieldNode> {
        &self.node
    }

    /// Register a requirement slot unless the key is already present
    pub fn register(&mut self, key: &str, requirement: &Arc<FieldNode>) {
        self.requirements
            .entry(key.to_string())
            .or_insert_with(|| RequirementEntry::new(Arc::clone(requirement)));
    }

    /// Requirements in registration order
    pub fn requirements(&self) -> impl Iterator<Item = (&str, &RequirementEntry)> {
        self.requirements.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Mutable requirement lookup
    pub fn requirement_mut(&mut self, key: &str) -> Option<&mut RequirementEntry> {
        self.requirements.get_mut(key)
    }

    /// Mutable requirements in registration order
    pub fn requirements_mut(&mut self) -> impl Iterator<Item = (&str, &mut RequirementEntry)> {
        self.requirements.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Requirement by key
    #[inline]
    #[must_use]
    pub fn requirement(&self, key: &str) -> Option<&RequirementEntry> {
        self.requirements.get(key)
    }

    /// Number of requirement slots
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    /// Check if there are no requirement slots
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }
}

/// Step name → group name → requirement key → implementations
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct StepGroups {
    steps: IndexMap<String, GroupMap>,
}

impl StepGroups {
    /// Empty index
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups of a step, creating the step bucket if needed
    pub fn step_mut(&mut self, step: &str) -> &mut GroupMap {
        self.steps.entry(step.to_string()).or_default()
    }

    /// Mutable iteration over every step bucket
    pub fn steps_mut(&mut self) -> impl Iterator<Item = (&str, &mut GroupMap)> {
        self.steps.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Groups of a step
    #[inline]
    #[must_use]
    pub fn step(&self, step: &str) -> Option<&GroupMap> {
        self.steps.get(step)
    }

    /// Step buckets in first-seen order
    pub fn steps(&self) -> impl Iterator<Item = (&str, &GroupMap)> {
        self.steps.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// One group of one step
    #[must_use]
    pub fn group(&self, step: &str, group: &str) -> Option<&GroupEntry> {
        self.steps.get(step)?.get(group)
    }

    /// One requirement of one group
    #[must_use]
    pub fn requirement(&self, step: &str, group: &str, key: &str) -> Option<&RequirementEntry> {
        self.group(step, group)?.requirement(key)
    }

    /// Every requirement with its step and group names
    pub fn requirements(&self) -> impl Iterator<Item = (&str, &str, &RequirementEntry)> {
        self.steps.iter().flat_map(|(step, groups)| {
            groups.iter().flat_map(move |(group, entry)| {
                entry
                    .requirements()
                    .map(move |(_, req)| (step.as_str(), group.as_str(), req))
            })
        })
    }

    /// Number of step buckets
    #[inline]
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Number of groups across steps
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.steps.values().map(IndexMap::len).sum()
    }

    /// Number of requirement slots across steps
    #[must_use]
    pub fn requirement_count(&self) -> usize {
        self.requirements().count()
    }

    /// Number of requirement-implementation links
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.requirements()
            .map(|(_, _, r)| r.implementation_count())
            .sum()
    }

    /// Check if no step has a bucket
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Control key → every implementation node referencing it
///
/// Harvested from all steps, regardless of step name or requirement status.
#[derive(Debug, Clone, Default)]
pub struct ImplementationIndex {
    by_key: IndexMap<String, ImplementationSet>,
}

impl ImplementationIndex {
    /// Empty index
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a node under each of its target keys
    pub fn record(&mut self, node: &Arc<FieldNode>) {
        for key in node.target_keys().iter() {
            self.by_key
                .entry(key.to_string())
                .or_default()
                .insert(node.id(), Arc::clone(node));
        }
    }

    /// Implementations referencing `key`
    pub fn get(&self, key: &str) -> impl Iterator<Item = &Arc<FieldNode>> {
        self.by_key.get(key).into_iter().flat_map(IndexMap::values)
    }

    /// Referenced keys in first-seen order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.by_key.keys().map(String::as_str)
    }

    /// Number of distinct keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Check if nothing was recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Result of one build: the hierarchy plus the harvested references
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComplianceGraph {
    /// Step / group / requirement / implementation hierarchy
    pub steps: StepGroups,
    /// Every implementation reference in the schema, by key
    pub harvested: ImplementationIndex,
}

impl ComplianceGraph {
    /// Flatten the hierarchy into table rows
    ///
    /// A requirement with no implementations yields one row with
    /// `implementation: None`.
    #[must_use]
    pub fn rows(&self) -> Vec<GraphRow<'_>> {
        let mut rows = Vec::new();
        for (step, group, requirement) in self.steps.requirements() {
            if requirement.implementation_count() == 0 {
                rows.push(GraphRow {
                    step,
                    group,
                    requirement,
                    implementation: None,
                });
                continue;
            }
            for implementation in requirement.implementations() {
                rows.push(GraphRow {
                    step,
                    group,
                    requirement,
                    implementation: Some(implementation),
                });
            }
        }
        rows
    }
}

/// One row of the flattened hierarchy
#[derive(Debug, Clone, Copy)]
pub struct GraphRow<'a> {
    /// Step name
    pub step: &'a str,
    /// Group name
    pub group: &'a str,
    /// Requirement entry
    pub requirement: &'a RequirementEntry,
    /// Linked implementation, if any
    pub implementation: Option<&'a Arc<FieldNode>>,
}

fn serialize_set<S: serde::Serializer>(set: &ImplementationSet, s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(set.values())
}

// Keys map to node ids only; the nodes themselves live in the hierarchy.
impl Serialize for ImplementationIndex {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_map(
            self.by_key
                .iter()
                .map(|(k, set)| (k, set.keys().collect::<Vec<_>>())),
        )
    }
}
