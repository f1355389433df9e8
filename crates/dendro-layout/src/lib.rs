// Tidy tree layout engine: positions for the visible set of a rooted tree,
// rendered left-to-right. x is the depth axis, y the breadth axis.

mod tests;

use std::collections::HashMap;

use dendro_core::{Extent, NodeId, TreeConfig, Vec2};
use dendro_model::Node;

/// Fraction of the longest label that spaces two depth levels apart,
/// before the configurable factor is applied.
const LABEL_UNIT_RATIO: f32 = 0.8;

/// Outcome of one layout pass over the visible set.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    /// Final position per visible node.
    pub positions: HashMap<NodeId, Vec2>,
    /// Bounding box of the visible positions.
    pub extent: Extent,
    pub visible_count: usize,
    /// Number of visible depth levels (root-only tree = 1).
    pub depth_count: usize,
}

// ──────────────────────────────────────────────
// TidyLayout
// ──────────────────────────────────────────────

/// Stateful layout engine. `measure` derives the per-level spacing unit from
/// the longest label once per load; `layout` may then run any number of
/// times as the visible set changes.
#[derive(Debug, Clone)]
pub struct TidyLayout {
    vertical_node_distance: f32,
    horizontal_spacing_factor: f32,
    /// `LABEL_UNIT_RATIO ×` longest label length, in characters.
    level_unit: f32,
}

impl TidyLayout {
    pub fn new(config: &TreeConfig) -> Self {
        Self {
            vertical_node_distance: config.vertical_node_distance,
            horizontal_spacing_factor: config.horizontal_spacing_factor,
            level_unit: 0.0,
        }
    }

    /// Derive the depth-level spacing from the longest label across the
    /// whole tree (hidden nodes included), so expanding never changes the
    /// horizontal rhythm mid-session.
    pub fn measure(&mut self, root: &Node) {
        self.level_unit = LABEL_UNIT_RATIO * root.max_label_len() as f32;
    }

    /// Spacing between two adjacent depth levels.
    pub fn level_offset(&self) -> f32 {
        self.level_unit * self.horizontal_spacing_factor
    }

    /// Horizontal room reserved past the deepest node so trailing labels
    /// fit when the canvas is sized to the tree.
    pub fn label_margin(&self) -> f32 {
        self.level_unit * 20.0
    }

    /// Lay out every node reachable through expanded parents.
    pub fn layout(&self, root: &mut Node) -> LayoutResult {
        self.layout_filtered(root, |_| true)
    }

    /// Lay out the visible set, additionally restricted by a predicate: a
    /// node is placed only when it and all its ancestors pass. The root is
    /// always placed, so the result is never empty.
    ///
    /// Every node's current position is copied to `previous_position`
    /// before new positions are assigned, enabling position-interpolated
    /// transitions in the render backend. Hidden and filtered nodes keep
    /// their stale position.
    pub fn layout_filtered<F>(&self, root: &mut Node, visible: F) -> LayoutResult
    where
        F: Fn(&Node) -> bool,
    {
        root.visit_mut(&mut |node| node.previous_position = node.position);

        // First pass: visible nodes per depth level and visible leaf count.
        let mut level_widths: Vec<usize> = Vec::new();
        let mut leaf_count = 0;
        survey(root, 0, &visible, &mut level_widths, &mut leaf_count);

        // The breadth extent grows with the widest level, so expanding the
        // widest level reflows the whole tree instead of clipping.
        let max_level_width = level_widths.iter().copied().max().unwrap_or(1);
        let tree_height = max_level_width as f32 * self.vertical_node_distance;
        let leaf_step = if leaf_count > 1 {
            tree_height / (leaf_count - 1) as f32
        } else {
            0.0
        };

        // Second pass: leaves take consecutive breadth slots, parents are
        // centered over their children's span.
        let mut cursor = Cursor {
            next_leaf: 0,
            leaf_step,
            single_leaf_y: tree_height / 2.0,
            level_offset: self.level_offset(),
            leaf_count,
        };
        let mut result = LayoutResult {
            positions: HashMap::new(),
            extent: Extent::point(Vec2::default()),
            visible_count: 0,
            depth_count: level_widths.len(),
        };
        assign(root, 0, &visible, &mut cursor, &mut result);
        result.extent = extent_of(&result.positions);
        result
    }
}

struct Cursor {
    next_leaf: usize,
    leaf_step: f32,
    single_leaf_y: f32,
    level_offset: f32,
    leaf_count: usize,
}

/// Visible children of a node under the predicate.
fn visible_children<'a, F>(node: &'a Node, visible: &F) -> Vec<&'a Node>
where
    F: Fn(&Node) -> bool,
{
    node.children().iter().filter(|child| visible(child)).collect()
}

fn survey<F>(node: &Node, depth: usize, visible: &F, level_widths: &mut Vec<usize>, leaves: &mut usize)
where
    F: Fn(&Node) -> bool,
{
    if level_widths.len() <= depth {
        level_widths.push(0);
    }
    level_widths[depth] += 1;

    let children = visible_children(node, visible);
    if children.is_empty() {
        *leaves += 1;
    }
    for child in children {
        survey(child, depth + 1, visible, level_widths, leaves);
    }
}

/// Assign positions depth-first and return the node's breadth coordinate.
fn assign<F>(node: &mut Node, depth: usize, visible: &F, cursor: &mut Cursor, out: &mut LayoutResult) -> f32
where
    F: Fn(&Node) -> bool,
{
    node.depth = depth;
    let x = depth as f32 * cursor.level_offset;

    let y = match visible_children_mut(node, visible) {
        Some(children) => {
            // Center the parent over the span of its children.
            let mut first = None;
            let mut last = 0.0;
            for child in children {
                let child_y = assign(child, depth + 1, visible, cursor, out);
                first.get_or_insert(child_y);
                last = child_y;
            }
            (first.unwrap_or(last) + last) / 2.0
        }
        None if cursor.leaf_count == 1 => cursor.single_leaf_y,
        None => {
            let slot = cursor.next_leaf;
            cursor.next_leaf += 1;
            slot as f32 * cursor.leaf_step
        }
    };

    node.position = Vec2::new(x, y);
    out.positions.insert(node.id.clone(), node.position);
    out.visible_count += 1;
    y
}

fn visible_children_mut<'a, F>(node: &'a mut Node, visible: &F) -> Option<Vec<&'a mut Node>>
where
    F: Fn(&Node) -> bool,
{
    if !node.is_expanded() {
        return None;
    }
    let children: Vec<&mut Node> = node
        .children_all_mut()
        .iter_mut()
        .filter(|child| visible(child))
        .collect();
    if children.is_empty() {
        None
    } else {
        Some(children)
    }
}

fn extent_of(positions: &HashMap<NodeId, Vec2>) -> Extent {
    let mut iter = positions.values();
    let Some(first) = iter.next() else {
        return Extent::point(Vec2::default());
    };
    let mut extent = Extent::point(*first);
    for p in iter {
        extent.include(*p);
    }
    extent
}
