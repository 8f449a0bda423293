use comply_filter::{FacetCatalog, FilterEngine, Selection};
use comply_schema::{FacetList, FieldNode, NodeId, NodeIdAllocator};
use comply_test_utils::sample_schema;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

const ROLES: [&str; 3] = ["Admin", "Auditor", "Owner"];
const DIMENSIONS: [&str; 4] = ["Security", "Privacy", "Resilience", "Comply"];

#[derive(Debug, Clone)]
struct Shape {
    roles: Vec<usize>,
    dims: Vec<usize>,
    children: Vec<Shape>,
}

fn shape() -> impl Strategy<Value = Shape> {
    let leaf = (
        proptest::collection::vec(0..ROLES.len(), 0..3),
        proptest::collection::vec(0..DIMENSIONS.len(), 0..3),
    )
        .prop_map(|(roles, dims)| Shape {
            roles,
            dims,
            children: Vec::new(),
        });

    leaf.prop_recursive(5, 48, 4, |inner| {
        (
            proptest::collection::vec(0..ROLES.len(), 0..3),
            proptest::collection::vec(0..DIMENSIONS.len(), 0..3),
            proptest::collection::vec(inner, 0..4),
        )
            .prop_map(|(roles, dims, children)| Shape {
                roles,
                dims,
                children,
            })
    })
}

fn build(shape: &Shape, ids: &mut NodeIdAllocator) -> FieldNode {
    let node = FieldNode::new(ids.allocate().unwrap())
        .with_roles(FacetList::from_tokens(shape.roles.iter().map(|&i| ROLES[i])))
        .with_dimensions(FacetList::from_tokens(shape.dims.iter().map(|&i| DIMENSIONS[i])));
    let children = shape
        .children
        .iter()
        .map(|c| Arc::new(build(c, ids)))
        .collect();
    node.with_children(children)
}

fn tree() -> impl Strategy<Value = Arc<FieldNode>> {
    shape().prop_map(|s| Arc::new(build(&s, &mut NodeIdAllocator::new())))
}

fn selection() -> impl Strategy<Value = Selection> {
    (
        proptest::option::of(0..ROLES.len()),
        proptest::option::of(0..DIMENSIONS.len() - 1),
    )
        .prop_map(|(role, dim)| Selection::new(role.map(|r| ROLES[r]), dim.map(|d| DIMENSIONS[d])))
}

fn ids(node: &FieldNode, out: &mut HashSet<NodeId>) {
    out.insert(node.id());
    for child in node.children() {
        ids(child, out);
    }
}

/// Paths from the root to every node that matches directly
fn matching_paths(
    engine: &FilterEngine,
    node: &FieldNode,
    selection: &Selection,
    path: &mut Vec<NodeId>,
    out: &mut Vec<Vec<NodeId>>,
) {
    path.push(node.id());
    if engine.matches_directly(node, selection) {
        out.push(path.clone());
    }
    for child in node.children() {
        matching_paths(engine, child, selection, path, out);
    }
    path.pop();
}

fn every_node_justified(engine: &FilterEngine, node: &FieldNode, selection: &Selection) -> bool {
    (engine.matches_directly(node, selection) || !node.children().is_empty())
        && node
            .children()
            .iter()
            .all(|c| every_node_justified(engine, c, selection))
}

proptest! {
    #[test]
    fn prop_filter_is_idempotent(tree in tree(), sel in selection()) {
        let engine = FilterEngine::new();
        let once = engine.filter(&tree, &sel).unwrap();
        let twice = match &once {
            Some(t) => engine.filter(t, &sel).unwrap(),
            None => None,
        };
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_matching_descendant_keeps_ancestors(tree in tree(), sel in selection()) {
        let engine = FilterEngine::new();
        let mut paths = Vec::new();
        matching_paths(&engine, &tree, &sel, &mut Vec::new(), &mut paths);

        let filtered = engine.filter(&tree, &sel).unwrap();
        let mut kept = HashSet::new();
        if let Some(f) = &filtered {
            ids(f, &mut kept);
        }

        prop_assert_eq!(filtered.is_some(), !paths.is_empty());
        for path in paths {
            for id in path {
                prop_assert!(kept.contains(&id));
            }
        }
    }

    #[test]
    fn prop_survivors_match_or_have_children(tree in tree(), sel in selection()) {
        let engine = FilterEngine::new();
        if let Some(filtered) = engine.filter(&tree, &sel).unwrap() {
            prop_assert!(every_node_justified(&engine, &filtered, &sel));
        }
    }

    #[test]
    fn prop_wildcard_survives_any_dimension(dim in 0..DIMENSIONS.len() - 1, other in 0..DIMENSIONS.len()) {
        let node = Arc::new(
            FieldNode::new(NodeId(0)).with_dimensions(format!("{},Comply", DIMENSIONS[other]).as_str()),
        );
        let sel = Selection::all().with_dimension(DIMENSIONS[dim]);
        prop_assert!(FilterEngine::new().filter(&node, &sel).unwrap().is_some());
    }
}

#[test]
fn sample_schema_admin_security() {
    let schema = sample_schema();
    let engine = FilterEngine::new();
    let sel = Selection::all().with_role("Admin").with_dimension("Security");

    let filtered = engine.filter_schema(&schema, &sel).unwrap();
    let step = &filtered.phase("Preparation").unwrap()[0];
    let names: Vec<_> = step
        .fields
        .iter()
        .filter_map(|f| f.field_name())
        .collect();

    // plan-1 carries the wildcard dimension but not the Admin role
    assert_eq!(names, vec!["Governance", "risk-1"]);
    assert_eq!(step.fields[0].children().len(), 1);
    assert_eq!(step.fields[0].children()[0].requirement_key(), Some("21.2(a)"));

    // Steps are kept even when emptied.
    assert_eq!(filtered.step_count(), schema.step_count());
    assert!(filtered.phase("Preparation").unwrap()[1].fields.is_empty());
}

#[test]
fn sample_schema_catalog() {
    let catalog = FacetCatalog::collect(&sample_schema());
    assert_eq!(catalog.roles().collect::<Vec<_>>(), vec!["Admin", "Auditor"]);
    assert!(catalog.has_dimension("Comply"));
}
