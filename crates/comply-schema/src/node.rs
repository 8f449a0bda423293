//! Schema field nodes
//!
//! A [`FieldNode`] is one node of the questionnaire tree, already normalized:
//! facets are parsed into [`FacetList`]s, `Fields` and `controls` are merged
//! into a single ordered child list, and the node carries a [`NodeKind`] tag.

use crate::facet::FacetList;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Type tag for requirement nodes
pub const REQUIREMENT_TYPE: &str = "requirement";

/// Type tag for field group nodes
pub const FIELD_GROUP_TYPE: &str = "fieldGroup";

/// Schema-unique node identity
///
/// Assigned once at ingestion. Shallow copies keep the id, so it is the
/// identity used to deduplicate implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Sequential [`NodeId`] source
///
/// Hands out at most `u32::MAX + 1` ids, then refuses instead of wrapping.
#[derive(Debug, Default)]
pub struct NodeIdAllocator {
    next: u32,
    exhausted: bool,
}

impl NodeIdAllocator {
    /// Create allocator starting at zero
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create allocator whose first id is `first`
    #[inline]
    #[must_use]
    pub fn starting_at(first: u32) -> Self {
        Self {
            next: first,
            exhausted: false,
        }
    }

    /// Hand out the next id, or `None` once the id space is used up
    pub fn allocate(&mut self) -> Option<NodeId> {
        if self.exhausted {
            return None;
        }
        let id = NodeId(self.next);
        match self.next.checked_add(1) {
            Some(next) => self.next = next,
            None => self.exhausted = true,
        }
        Some(id)
    }

    /// Next id that [`NodeIdAllocator::allocate`] would hand out
    #[inline]
    #[must_use]
    pub fn allocated(&self) -> u64 {
        u64::from(self.next) + u64::from(self.exhausted)
    }
}

/// Normalized node classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// `fieldGroup` container
    Group,

    /// Obligation that can be marked Applicable / Not Applicable
    Requirement,

    /// Control, risk mitigation or test pointing at requirement keys
    Implementation,

    /// Anything else (plain UI widget)
    #[default]
    Leaf,
}

impl NodeKind {
    /// Classify from type tag and target keys
    #[must_use]
    pub fn classify(field_type: Option<&str>, has_targets: bool) -> Self {
        match field_type {
            Some(REQUIREMENT_TYPE) => Self::Requirement,
            Some(FIELD_GROUP_TYPE) => Self::Group,
            _ if has_targets => Self::Implementation,
            _ => Self::Leaf,
        }
    }
}

/// A node in the schema tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldNode {
    id: NodeId,
    kind: NodeKind,
    field_name: Option<String>,
    control_number: Option<String>,
    field_type: Option<String>,
    roles: FacetList,
    dimensions: FacetList,
    controls: FacetList,
    requirement_control_number: Option<String>,
    text: Option<String>,
    label: Option<String>,
    children: Vec<Arc<FieldNode>>,
}

impl FieldNode {
    /// Create an untyped leaf node
    #[inline]
    #[must_use]
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            kind: NodeKind::Leaf,
            field_name: None,
            control_number: None,
            field_type: None,
            roles: FacetList::empty(),
            dimensions: FacetList::empty(),
            controls: FacetList::empty(),
            requirement_control_number: None,
            text: None,
            label: None,
            children: Vec::new(),
        }
    }

    /// With `FieldType` tag
    #[must_use]
    pub fn with_field_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = non_empty(field_type.into());
        self.reclassify()
    }

    /// With `FieldName`
    #[must_use]
    pub fn with_field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = non_empty(name.into());
        self
    }

    /// With `control_number`
    #[must_use]
    pub fn with_control_number(mut self, number: impl Into<String>) -> Self {
        self.control_number = non_empty(number.into());
        self
    }

    /// With `Role` facet
    #[must_use]
    pub fn with_roles(mut self, roles: impl Into<FacetList>) -> Self {
        self.roles = roles.into();
        self
    }

    /// With `TrustDimension` facet
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: impl Into<FacetList>) -> Self {
        self.dimensions = dimensions.into();
        self
    }

    /// With `Control` facet
    #[must_use]
    pub fn with_controls(mut self, controls: impl Into<FacetList>) -> Self {
        self.controls = controls.into();
        self.reclassify()
    }

    /// With `requirement_control_number`
    ///
    /// On a requirement this is its own key; on anything else it is a
    /// comma-separated list of requirement keys the node implements.
    #[must_use]
    pub fn with_requirement_control_number(mut self, value: impl Into<String>) -> Self {
        self.requirement_control_number = non_empty(value.into());
        self.reclassify()
    }

    /// With descriptive text (`jkText`)
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = non_empty(text.into());
        self
    }

    /// With display label (`jkName`)
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = non_empty(label.into());
        self
    }

    /// With child nodes
    #[must_use]
    pub fn with_children(mut self, children: Vec<Arc<FieldNode>>) -> Self {
        self.children = children;
        self
    }

    /// Append one child node
    #[must_use]
    pub fn with_child(mut self, child: FieldNode) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    /// Shallow copy with the child list replaced; identity is kept
    #[must_use]
    pub fn shallow_with_children(&self, children: Vec<Arc<FieldNode>>) -> Self {
        Self {
            id: self.id,
            kind: self.kind,
            field_name: self.field_name.clone(),
            control_number: self.control_number.clone(),
            field_type: self.field_type.clone(),
            roles: self.roles.clone(),
            dimensions: self.dimensions.clone(),
            controls: self.controls.clone(),
            requirement_control_number: self.requirement_control_number.clone(),
            text: self.text.clone(),
            label: self.label.clone(),
            children,
        }
    }

    fn reclassify(mut self) -> Self {
        let has_targets = !self.target_keys().is_empty();
        self.kind = NodeKind::classify(self.field_type.as_deref(), has_targets);
        self
    }

    /// Node identity
    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Normalized classification
    #[inline]
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Raw type tag (`FieldType` or `jkType`)
    #[inline]
    #[must_use]
    pub fn field_type(&self) -> Option<&str> {
        self.field_type.as_deref()
    }

    /// `FieldName`
    #[inline]
    #[must_use]
    pub fn field_name(&self) -> Option<&str> {
        self.field_name.as_deref()
    }

    /// `control_number`
    #[inline]
    #[must_use]
    pub fn control_number(&self) -> Option<&str> {
        self.control_number.as_deref()
    }

    /// `Role` facet
    #[inline]
    #[must_use]
    pub fn roles(&self) -> &FacetList {
        &self.roles
    }

    /// `TrustDimension` facet
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> &FacetList {
        &self.dimensions
    }

    /// `Control` facet
    #[inline]
    #[must_use]
    pub fn controls(&self) -> &FacetList {
        &self.controls
    }

    /// Raw `requirement_control_number`
    #[inline]
    #[must_use]
    pub fn requirement_control_number(&self) -> Option<&str> {
        self.requirement_control_number.as_deref()
    }

    /// `jkText`
    #[inline]
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// `jkName`
    #[inline]
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Child nodes (`Fields` then `controls`)
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Arc<FieldNode>] {
        &self.children
    }

    /// Check for the requirement kind
    #[inline]
    #[must_use]
    pub fn is_requirement(&self) -> bool {
        self.kind == NodeKind::Requirement
    }

    /// Check for the group kind
    #[inline]
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.kind == NodeKind::Group
    }

    /// A requirement's own control key
    ///
    /// `None` when the node is not a requirement or the key is blank.
    #[must_use]
    pub fn requirement_key(&self) -> Option<&str> {
        if !self.is_requirement() {
            return None;
        }
        self.requirement_control_number
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Requirement keys this node implements
    ///
    /// Union of `requirement_control_number` tokens and `Control` tokens.
    /// Always empty for requirement nodes.
    #[must_use]
    pub fn target_keys(&self) -> FacetList {
        if self.field_type.as_deref() == Some(REQUIREMENT_TYPE) {
            return FacetList::empty();
        }
        let mut keys = self
            .requirement_control_number
            .as_deref()
            .map(FacetList::parse)
            .unwrap_or_default();
        keys.merge(&self.controls);
        keys
    }

    /// Check whether this node implements at least one requirement key
    #[inline]
    #[must_use]
    pub fn is_implementation_candidate(&self) -> bool {
        !self.is_requirement() && !self.target_keys().is_empty()
    }

    /// Identifier used for captured-value lookups
    ///
    /// `FieldName`, then `control_number`, then a requirement's key.
    #[must_use]
    pub fn field_id(&self) -> Option<&str> {
        self.field_name
            .as_deref()
            .or(self.control_number.as_deref())
            .or_else(|| self.requirement_key())
    }

    /// Human-facing name: `FieldName`, `jkName`, then `control_number`
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.field_name
            .as_deref()
            .or(self.label.as_deref())
            .or(self.control_number.as_deref())
    }

    /// Number of nodes in this subtree, including `self`
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(|c| c.subtree_len()).sum::<usize>()
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}
