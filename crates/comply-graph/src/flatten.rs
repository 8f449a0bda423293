//! Step flattening
//!
//! Collects every node of a step's field forest into one pre-order list.
//! Kept separate from filtering so each pass can be tested on its own.

use comply_schema::FieldNode;
use std::sync::Arc;

/// Flatten a field forest in pre-order
///
/// Returns `None` if any node sits at or below `max_depth`.
#[must_use]
pub fn flatten(fields: &[Arc<FieldNode>], max_depth: usize) -> Option<Vec<&Arc<FieldNode>>> {
    let mut out = Vec::new();
    let mut stack: Vec<(&Arc<FieldNode>, usize)> = fields.iter().rev().map(|f| (f, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        if depth >= max_depth {
            return None;
        }
        out.push(node);
        stack.extend(node.children().iter().rev().map(|c| (c, depth + 1)));
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use comply_schema::NodeId;

    fn n(id: u32) -> FieldNode {
        FieldNode::new(NodeId(id))
    }

    #[test]
    fn flatten_is_preorder() {
        let fields = vec![
            Arc::new(n(0).with_child(n(1).with_child(n(2))).with_child(n(3))),
            Arc::new(n(4)),
        ];

        let ids: Vec<_> = flatten(&fields, 16)
            .unwrap()
            .into_iter()
            .map(|f| f.id().0)
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn flatten_keeps_identity() {
        let fields = vec![Arc::new(n(0).with_child(n(1)))];
        let flat = flatten(&fields, 16).unwrap();
        assert!(Arc::ptr_eq(flat[0], &fields[0]));
        assert!(Arc::ptr_eq(flat[1], &fields[0].children()[0]));
    }

    #[test]
    fn flatten_empty() {
        assert!(flatten(&[], 1).unwrap().is_empty());
    }

    #[test]
    fn flatten_depth_guard() {
        let fields = vec![Arc::new(n(0).with_child(n(1).with_child(n(2))))];
        assert!(flatten(&fields, 2).is_none());
        assert_eq!(flatten(&fields, 3).map(|f| f.len()), Some(3));
    }
}
