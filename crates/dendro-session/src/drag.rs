use dendro_core::{NodeId, Size, Vec2};

/// Distance from a viewport edge (px) at which dragging starts an edge pan.
pub const PAN_BOUNDARY: f32 = 20.0;

/// Pixels the viewport moves per edge-pan tick.
pub const PAN_SPEED: f32 = 200.0;

/// Interval the host should use between `tick_edge_pan` calls.
pub const PAN_TICK_MS: u64 = 50;

/// Direction of an active edge pan while dragging near a viewport edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Left,
    Right,
    Up,
    Down,
}

impl PanDirection {
    /// Viewport translate delta for one pan tick. Panning left moves the
    /// content right so more of the left side becomes visible.
    pub(crate) fn step(self) -> Vec2 {
        match self {
            Self::Left => Vec2::new(PAN_SPEED, 0.0),
            Self::Right => Vec2::new(-PAN_SPEED, 0.0),
            Self::Up => Vec2::new(0.0, PAN_SPEED),
            Self::Down => Vec2::new(0.0, -PAN_SPEED),
        }
    }

    /// Edge-pan direction for a pointer position, if it is within the pan
    /// boundary of any viewport edge.
    pub(crate) fn at_edge(pointer: Vec2, viewport_size: Size) -> Option<Self> {
        if pointer.x < PAN_BOUNDARY {
            Some(Self::Left)
        } else if pointer.x > viewport_size.width - PAN_BOUNDARY {
            Some(Self::Right)
        } else if pointer.y < PAN_BOUNDARY {
            Some(Self::Up)
        } else if pointer.y > viewport_size.height - PAN_BOUNDARY {
            Some(Self::Down)
        } else {
            None
        }
    }
}

/// Transient state of one drag gesture. Created on `drag_start`, destroyed
/// on `drag_end`; everything here is preview state — the node graph is only
/// touched at commit.
#[derive(Debug, Clone)]
pub(crate) struct DragSession {
    pub node_id: NodeId,
    pub original_parent_id: NodeId,
    /// Accumulated pointer delta, forwarded to the backend as a purely
    /// visual offset.
    pub offset: Vec2,
    pub hover_target: Option<NodeId>,
    /// True once the first move arrived and subtree glyphs were hidden.
    pub started: bool,
    pub subtree_suppressed: bool,
    /// At most one edge pan is active; a new direction replaces it.
    pub edge_pan: Option<PanDirection>,
}

impl DragSession {
    pub fn new(node_id: NodeId, original_parent_id: NodeId) -> Self {
        Self {
            node_id,
            original_parent_id,
            offset: Vec2::default(),
            hover_target: None,
            started: false,
            subtree_suppressed: false,
            edge_pan: None,
        }
    }
}
