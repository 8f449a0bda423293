//! Graph builder
//!
//! Walks a (usually filtered) schema and cross-references requirement and
//! implementation nodes into a [`ComplianceGraph`].
//!
//! Per step:
//! 1. Resolve the step name (default name when absent).
//! 2. Flatten the step's field forest.
//! 3. Harvest every implementation candidate into the key index.
//! 4. Skip the rest unless the name starts with the article prefix.
//! 5. Promote field groups with requirement children to [`GroupEntry`]s.
//! 6. Link the step's implementations into the requirements this step
//!    registered (not those of a same-named step), but only where the
//!    requirement's captured status is applicable.

use crate::error::GraphError;
use crate::flatten::flatten;
use crate::index::{ComplianceGraph, GroupEntry, GroupMap, ImplementationIndex, StepGroups};
use comply_schema::{CapturedValues, FieldNode, Schema, DEFAULT_MAX_DEPTH};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Step-name prefix that admits a step into the hierarchy
pub const DEFAULT_ARTICLE_PREFIX: &str = "Article";

/// Name used for steps without `StepName`
pub const DEFAULT_STEP_NAME: &str = "General Procedure";

/// Status value that makes a requirement accept implementations
pub const DEFAULT_APPLICABLE_STATUS: &str = "Applicable";

/// Name used for groups without any identifying field
pub const UNNAMED_GROUP: &str = "Unnamed Group";

/// Where implementations are looked for when linking a requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkScope {
    /// Only implementations in the requirement's own step
    #[default]
    Step,
    /// Implementations anywhere in the schema
    Global,
}

/// Builds [`ComplianceGraph`]s
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    article_prefix: String,
    default_step_name: String,
    applicable_status: String,
    link_scope: LinkScope,
    max_depth: usize,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Create builder with default conventions
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            article_prefix: DEFAULT_ARTICLE_PREFIX.to_string(),
            default_step_name: DEFAULT_STEP_NAME.to_string(),
            applicable_status: DEFAULT_APPLICABLE_STATUS.to_string(),
            link_scope: LinkScope::Step,
            max_depth: DEFAULT_MAX_DEPTH,
        }
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

    /// With link scope
    #[inline]
    #[must_use]
    pub fn with_link_scope(mut self, scope: LinkScope) -> Self {
        self.link_scope = scope;
        self
    }

    /// With flatten depth guard
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Check whether a step name takes part in the hierarchy
    #[inline]
    #[must_use]
    pub fn admits_step(&self, step_name: &str) -> bool {
        step_name.starts_with(&self.article_prefix)
    }

    /// Check a requirement's captured status
    ///
    /// Read from `values` on every call; nothing is cached.
    #[must_use]
    pub fn is_applicable<V>(&self, requirement: &FieldNode, values: &V) -> bool
    where
        V: CapturedValues + ?Sized,
    {
        values
            .status(requirement)
            .is_some_and(|s| s == self.applicable_status)
    }

    /// Build the graph for a schema
    ///
    /// # Errors
    /// Returns [`GraphError::DepthExceeded`] if a step nests deeper than
    /// the configured guard.
    pub fn build<V>(&self, schema: &Schema, values: &V) -> Result<ComplianceGraph, GraphError>
    where
        V: CapturedValues + ?Sized,
    {
        let mut graph = ComplianceGraph::default();

        for (phase, step) in schema.steps() {
            let step_name = step.name_or(&self.default_step_name);
            let fields = flatten(&step.fields, self.max_depth).ok_or_else(|| {
                GraphError::DepthExceeded {
                    step: step_name.to_string(),
                    max_depth: self.max_depth,
                }
            })?;

            let implementations: Vec<&Arc<FieldNode>> = fields
                .iter()
                .copied()
                .filter(|f| f.is_implementation_candidate())
                .collect();
            for implementation in &implementations {
                graph.harvested.record(implementation);
            }

            if !self.admits_step(step_name) {
                tracing::trace!(phase, step = step_name, "step outside hierarchy");
                continue;
            }

            let groups = graph.steps.step_mut(step_name);
            let slots = register_groups(groups, &fields);

            if self.link_scope == LinkScope::Step {
                for implementation in implementations {
                    self.link(groups, &slots, implementation, values);
                }
            }
        }

        if self.link_scope == LinkScope::Global {
            self.link_globally(&mut graph.steps, &graph.harvested, values);
        }

        tracing::debug!(
            steps = graph.steps.step_count(),
            groups = graph.steps.group_count(),
            requirements = graph.steps.requirement_count(),
            links = graph.steps.link_count(),
            harvested_keys = graph.harvested.len(),
            scope = ?self.link_scope,
            "built compliance graph"
        );
        Ok(graph)
    }

    /// Attach one implementation to every applicable requirement it names
    ///
    /// Only `slots` are candidates: steps sharing a name share one
    /// [`GroupMap`], but never each other's implementations.
    fn link<V>(
        &self,
        groups: &mut GroupMap,
        slots: &StepSlots,
        implementation: &Arc<FieldNode>,
        values: &V,
    ) where
        V: CapturedValues + ?Sized,
    {
        for key in implementation.target_keys().iter() {
            for (group, _) in slots.iter().filter(|(_, k)| k == key) {
                let Some(requirement) = groups.get_mut(group).and_then(|g| g.requirement_mut(key))
                else {
                    continue;
                };
                if self.is_applicable(requirement.node(), values) {
                    requirement.link(Arc::clone(implementation));
                }
            }
        }
    }

    fn link_globally<V>(&self, steps: &mut StepGroups, harvested: &ImplementationIndex, values: &V)
    where
        V: CapturedValues + ?Sized,
    {
        for (_, groups) in steps.steps_mut() {
            for group in groups.values_mut() {
                for (key, requirement) in group.requirements_mut() {
                    if !self.is_applicable(requirement.node(), values) {
                        continue;
                    }
                    for implementation in harvested.get(key) {
                        requirement.link(Arc::clone(implementation));
                    }
                }
            }
        }
    }
}

/// `(group name, requirement key)` slots registered by one step
type StepSlots = IndexSet<(String, String)>;

/// First pass: promote field groups that own requirement children
///
/// Returns the slots this step's own requirements occupy.
fn register_groups(groups: &mut GroupMap, fields: &[&Arc<FieldNode>]) -> StepSlots {
    let mut slots = StepSlots::new();
    for field in fields.iter().copied().filter(|f| f.is_group()) {
        let mut requirements = field
            .children()
            .iter()
            .filter(|c| c.is_requirement())
            .peekable();
        if requirements.peek().is_none() {
            continue;
        }

        let name = field.display_name().unwrap_or(UNNAMED_GROUP);
        let group = groups
            .entry(name.to_string())
            .or_insert_with(|| GroupEntry::new(Arc::clone(field)));
        for requirement in requirements {
            if let Some(key) = requirement.requirement_key() {
                group.register(key, requirement);
                slots.insert((name.to_string(), key.to_string()));
            }
        }
    }
    slots
}

/// Build with default conventions
///
/// # Errors
/// See [`GraphBuilder::build`].
pub fn build<V>(schema: &Schema, values: &V) -> Result<ComplianceGraph, GraphError>
where
    V: CapturedValues + ?Sized,
{
    GraphBuilder::new().build(schema, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use comply_schema::{NoValues, Step, ValueStore};
    use comply_test_utils::{single_step_schema, Fixture};

    #[test]
    fn admits_only_prefixed_steps() {
        let builder = GraphBuilder::new();
        assert!(builder.admits_step("Article 21"));
        assert!(!builder.admits_step("article 21"));
        assert!(!builder.admits_step("General Procedure"));
    }

    #[test]
    fn requirement_slot_without_implementations() {
        let mut fx = Fixture::new();
        let r1 = fx.requirement("R1");
        let group = fx.group("G", vec![r1]);
        let schema = single_step_schema("Article 1", vec![group]);

        let graph = build(&schema, &NoValues).unwrap();
        let req = graph.steps.requirement("Article 1", "G", "R1").unwrap();
        assert_eq!(req.implementation_count(), 0);

        let applicable = ValueStore::new().with_status("R1", "Applicable");
        let graph = build(&schema, &applicable).unwrap();
        let req = graph.steps.requirement("Article 1", "G", "R1").unwrap();
        assert_eq!(req.implementation_count(), 0);
    }

    #[test]
    fn group_without_requirements_is_not_promoted() {
        let mut fx = Fixture::new();
        let leaf = fx.leaf("a");
        let group = fx.group("G", vec![leaf]);
        let schema = single_step_schema("Article 1", vec![group]);

        let graph = build(&schema, &NoValues).unwrap();
        assert_eq!(graph.steps.step("Article 1").map(GroupMap::len), Some(0));
    }

    #[test]
    fn blank_requirement_key_is_skipped() {
        let mut fx = Fixture::new();
        let blank = fx.requirement("  ");
        let r1 = fx.requirement("R1");
        let group = fx.group("G", vec![blank, r1]);
        let schema = single_step_schema("Article 1", vec![group]);

        let graph = build(&schema, &NoValues).unwrap();
        assert_eq!(graph.steps.group("Article 1", "G").map(GroupEntry::len), Some(1));
    }

    #[test]
    fn default_step_name_is_not_an_article() {
        let mut fx = Fixture::new();
        let r1 = fx.requirement("R1");
        let group = fx.group("G", vec![r1]);
        let schema = Schema::new().with_step("P", Step::new(None, vec![Arc::new(group)]));

        let graph = build(&schema, &NoValues).unwrap();
        assert!(graph.steps.is_empty());

        let graph = GraphBuilder::new()
            .with_article_prefix("General")
            .build(&schema, &NoValues)
            .unwrap();
        assert!(graph.steps.step(DEFAULT_STEP_NAME).is_some());
    }

    #[test]
    fn custom_applicable_status() {
        let mut fx = Fixture::new();
        let r1 = fx.requirement("R1");
        let group = fx.group("G", vec![r1]);
        let imp = fx.implementation("i", "risk", "R1");
        let schema = single_step_schema("Article 1", vec![group, imp]);
        let values = ValueStore::new().with_status("R1", "Yes");

        assert_eq!(build(&schema, &values).unwrap().steps.link_count(), 0);
        let graph = GraphBuilder::new()
            .with_applicable_status("Yes")
            .build(&schema, &values)
            .unwrap();
        assert_eq!(graph.steps.link_count(), 1);
    }

    #[test]
    fn depth_guard_names_step() {
        let mut fx = Fixture::new();
        let r1 = fx.requirement("R1");
        let inner = fx.group("inner", vec![r1]);
        let outer = fx.group("outer", vec![inner]);
        let schema = single_step_schema("Article 1", vec![outer]);

        let err = GraphBuilder::new()
            .with_max_depth(2)
            .build(&schema, &NoValues)
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::DepthExceeded {
                step: "Article 1".to_string(),
                max_depth: 2
            }
        );
    }

    #[test]
    fn unnamed_group_fallback() {
        let mut fx = Fixture::new();
        let requirement = fx.requirement("R1");
        let group = FieldNode::new(comply_schema::NodeId(99))
            .with_field_type("fieldGroup")
            .with_child(requirement);
        let schema = single_step_schema("Article 1", vec![group]);

        let graph = build(&schema, &NoValues).unwrap();
        assert!(graph.steps.group("Article 1", UNNAMED_GROUP).is_some());
    }
}
