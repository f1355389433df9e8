// Node model: builds an owned tree from flat records, owns the
// expand/collapse state machine, and reconciles structural changes back
// into parent-reference deltas for a save operation.

mod builder;
mod reconcile;
mod tests;

pub use builder::{build, MalformedHierarchyError};
pub use reconcile::{capture_parents, compute_changes, ParentChange};

use dendro_core::{NodeId, Vec2};

// ──────────────────────────────────────────────
// Node
// ──────────────────────────────────────────────

/// Visibility state of a node's children.
///
/// A node with descendants is either `Expanded` or `Collapsed`; a node
/// without descendants is `Leaf`. The two populated variants hold the same
/// owned children, so toggling is a tag swap and never loses the subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeState {
    Leaf,
    Expanded(Vec<Node>),
    Collapsed(Vec<Node>),
}

/// In-memory representation of one record plus layout and visibility state.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    /// Current parent (updated on re-parenting). `None` for the root.
    pub parent_id: Option<NodeId>,
    pub state: NodeState,
    pub position: Vec2,
    /// Position before the most recent layout pass. Used only for
    /// transition interpolation, never for structural decisions.
    pub previous_position: Vec2,
    pub depth: usize,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: String, parent_id: Option<NodeId>, depth: usize) -> Self {
        Self {
            id,
            name,
            parent_id,
            state: NodeState::Leaf,
            position: Vec2::default(),
            previous_position: Vec2::default(),
            depth,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.state, NodeState::Leaf)
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self.state, NodeState::Expanded(_))
    }

    pub fn is_collapsed(&self) -> bool {
        matches!(self.state, NodeState::Collapsed(_))
    }

    /// Currently visible children. Empty for leaves and collapsed nodes.
    pub fn children(&self) -> &[Node] {
        match &self.state {
            NodeState::Expanded(children) => children,
            _ => &[],
        }
    }

    /// All children regardless of visibility.
    pub fn children_all(&self) -> &[Node] {
        match &self.state {
            NodeState::Expanded(children) | NodeState::Collapsed(children) => children,
            NodeState::Leaf => &[],
        }
    }

    pub fn children_all_mut(&mut self) -> &mut [Node] {
        match &mut self.state {
            NodeState::Expanded(children) | NodeState::Collapsed(children) => children,
            NodeState::Leaf => &mut [],
        }
    }

    /// Number of children, visible or hidden.
    pub fn child_count(&self) -> usize {
        self.children_all().len()
    }

    /// Visit every node in the subtree (hidden children included),
    /// depth-first, parent before children.
    pub fn visit<F: FnMut(&Node)>(&self, f: &mut F) {
        f(self);
        for child in self.children_all() {
            child.visit(f);
        }
    }

    pub fn visit_mut<F: FnMut(&mut Node)>(&mut self, f: &mut F) {
        f(self);
        for child in self.children_all_mut() {
            child.visit_mut(f);
        }
    }

    /// Total node count of the subtree, hidden children included.
    pub fn count(&self) -> usize {
        let mut n = 0;
        self.visit(&mut |_| n += 1);
        n
    }

    /// Longest node name (in chars) across the subtree. Drives the spacing
    /// between depth levels.
    pub fn max_label_len(&self) -> usize {
        let mut max = 0;
        self.visit(&mut |node| max = max.max(node.name.chars().count()));
        max
    }

    /// Find a node by id anywhere in the subtree (hidden included).
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children_all().iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children_all_mut()
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }

    /// Returns true if `id` names this node or any descendant.
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    // ── Expand / collapse ─────────────────────

    /// Collapse the whole subtree, deepest nodes first, so a later expand
    /// restores exactly one level of children.
    pub fn collapse_recursive(&mut self) {
        for child in self.children_all_mut() {
            child.collapse_recursive();
        }
        if let NodeState::Expanded(children) = &mut self.state {
            let children = std::mem::take(children);
            self.state = NodeState::Collapsed(children);
        }
    }

    /// Make this node's direct children visible. Children keep their own
    /// collapsed state.
    pub fn expand(&mut self) {
        if let NodeState::Collapsed(children) = &mut self.state {
            let children = std::mem::take(children);
            self.state = NodeState::Expanded(children);
        }
    }

    /// Expand the whole subtree.
    pub fn expand_recursive(&mut self) {
        self.expand();
        for child in self.children_all_mut() {
            child.expand_recursive();
        }
    }

    /// Toggle between expanded and collapsed. Collapsing collapses all
    /// descendants first; expanding restores one level. Returns false for
    /// leaves (nothing to toggle).
    pub fn toggle(&mut self) -> bool {
        match self.state {
            NodeState::Leaf => false,
            NodeState::Expanded(_) => {
                self.collapse_recursive();
                true
            }
            NodeState::Collapsed(_) => {
                self.expand();
                true
            }
        }
    }

    // ── Structural mutation ───────────────────

    /// Remove the node with the given id from this subtree and return it.
    /// The root itself cannot be detached.
    pub fn detach(&mut self, id: &str) -> Option<Node> {
        let children = match &mut self.state {
            NodeState::Expanded(children) | NodeState::Collapsed(children) => children,
            NodeState::Leaf => return None,
        };

        if let Some(index) = children.iter().position(|child| child.id == id) {
            let node = children.remove(index);
            if children.is_empty() {
                self.state = NodeState::Leaf;
            }
            return Some(node);
        }

        children.iter_mut().find_map(|child| child.detach(id))
    }

    /// Attach `node` as a child of the node with id `parent_id`. A leaf
    /// target becomes an expanded parent; expanded and collapsed targets
    /// keep their visibility. Returns false if the parent is not found.
    pub fn attach_child(&mut self, parent_id: &str, mut node: Node) -> bool {
        let Some(parent) = self.find_mut(parent_id) else {
            return false;
        };
        node.parent_id = Some(parent.id.clone());
        match &mut parent.state {
            NodeState::Leaf => parent.state = NodeState::Expanded(vec![node]),
            NodeState::Expanded(children) | NodeState::Collapsed(children) => children.push(node),
        }
        true
    }

    /// Re-sort every sibling group in the subtree by name,
    /// case-insensitively, ties broken by exact name. Keeps iteration order
    /// deterministic after structural mutations.
    pub fn sort_recursive(&mut self) {
        let children = match &mut self.state {
            NodeState::Expanded(children) | NodeState::Collapsed(children) => children,
            NodeState::Leaf => return,
        };
        children.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        for child in children {
            child.sort_recursive();
        }
    }
}
