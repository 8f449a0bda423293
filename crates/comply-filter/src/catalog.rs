//! Facet vocabulary of a schema
//!
//! Lists every role and trust dimension that appears anywhere in a schema,
//! in first-seen order, so a host can offer them as filter choices.

use comply_schema::{FieldNode, Schema};
use indexmap::IndexSet;
use serde::Serialize;

/// Distinct facet values found in a schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetCatalog {
    roles: IndexSet<String>,
    dimensions: IndexSet<String>,
}

impl FacetCatalog {
    /// Walk the whole schema and collect facet values
    #[must_use]
    pub fn collect(schema: &Schema) -> Self {
        let mut catalog = Self::default();
        let mut stack: Vec<&FieldNode> = Vec::new();

        for (_, step) in schema.steps() {
            stack.extend(step.fields.iter().rev().map(|f| &**f));
            while let Some(node) = stack.pop() {
                catalog.roles.extend(node.roles().iter().map(str::to_string));
                catalog
                    .dimensions
                    .extend(node.dimensions().iter().map(str::to_string));
                stack.extend(node.children().iter().rev().map(|f| &**f));
            }
        }
        catalog
    }

    /// Roles in first-seen order
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(String::as_str)
    }

    /// Dimensions in first-seen order
    pub fn dimensions(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(String::as_str)
    }

    /// Dimensions excluding `wildcard`, for a chooser
    pub fn selectable_dimensions<'a>(&'a self, wildcard: &'a str) -> impl Iterator<Item = &'a str> {
        self.dimensions().filter(move |d| *d != wildcard)
    }

    /// Check whether a role appears anywhere
    #[inline]
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Check whether a dimension appears anywhere
    #[inline]
    #[must_use]
    pub fn has_dimension(&self, dimension: &str) -> bool {
        self.dimensions.contains(dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comply_schema::{NodeId, Step};

    #[test]
    fn catalog_collects_in_preorder() {
        let field = FieldNode::new(NodeId(0))
            .with_roles("Admin")
            .with_dimensions("Security")
            .with_child(
                FieldNode::new(NodeId(1))
                    .with_roles("Auditor,Admin")
                    .with_dimensions("Comply"),
            );
        let other = FieldNode::new(NodeId(2)).with_roles("Owner");
        let schema = Schema::new()
            .with_step("P", Step::named("Article 1", vec![field]))
            .with_step("Q", Step::named("Article 2", vec![other]));

        let catalog = FacetCatalog::collect(&schema);
        assert_eq!(catalog.roles().collect::<Vec<_>>(), vec!["Admin", "Auditor", "Owner"]);
        assert_eq!(catalog.dimensions().collect::<Vec<_>>(), vec!["Security", "Comply"]);
        assert_eq!(
            catalog.selectable_dimensions("Comply").collect::<Vec<_>>(),
            vec!["Security"]
        );
        assert!(catalog.has_role("Owner"));
        assert!(!catalog.has_dimension("Privacy"));
    }

    #[test]
    fn empty_schema_catalog() {
        let catalog = FacetCatalog::collect(&Schema::new());
        assert_eq!(catalog.roles().count(), 0);
    }
}
