// ChangeSetReconciler: current tree structure vs load-time baseline →
// parent-reference deltas for a save operation.

use std::collections::HashMap;

use dendro_core::NodeId;

use crate::Node;

/// One parent-reference delta: `node_id` moved from `old_parent_id` to
/// `new_parent_id`. Only non-root nodes appear (the root never re-parents).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentChange {
    pub node_id: NodeId,
    pub old_parent_id: NodeId,
    pub new_parent_id: NodeId,
}

/// Capture the parent of every non-root node, keyed by node id.
/// Taken once per load; the baseline for `compute_changes`.
pub fn capture_parents(root: &Node) -> HashMap<NodeId, NodeId> {
    let mut parents = HashMap::new();
    collect(root, &mut parents);
    parents
}

fn collect(node: &Node, out: &mut HashMap<NodeId, NodeId>) {
    for child in node.children_all() {
        out.insert(child.id.clone(), node.id.clone());
        collect(child, out);
    }
}

/// Walk the whole tree (hidden children included) and emit one change for
/// every node whose structural parent differs from the baseline, in
/// depth-first order. Pure; the caller applies the changes externally and
/// resets the baseline after a successful save.
pub fn compute_changes(root: &Node, original_parents: &HashMap<NodeId, NodeId>) -> Vec<ParentChange> {
    let mut changes = Vec::new();
    diff(root, original_parents, &mut changes);
    changes
}

fn diff(node: &Node, original_parents: &HashMap<NodeId, NodeId>, out: &mut Vec<ParentChange>) {
    for child in node.children_all() {
        if let Some(old_parent) = original_parents.get(&child.id) {
            if old_parent != &node.id {
                out.push(ParentChange {
                    node_id: child.id.clone(),
                    old_parent_id: old_parent.clone(),
                    new_parent_id: node.id.clone(),
                });
            }
        }
        diff(child, original_parents, out);
    }
}
