use std::fmt;

// ──────────────────────────────────────────────
// Geometry
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Bounding box of the visible tree, min/max over node positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: Vec2,
    pub max: Vec2,
}

impl Extent {
    /// An extent covering exactly one point.
    pub fn point(p: Vec2) -> Self {
        Self { min: p, max: p }
    }

    /// Grow the extent to include a point.
    pub fn include(&mut self, p: Vec2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

// ──────────────────────────────────────────────
// Colors
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
}

// ──────────────────────────────────────────────
// Identity & records
// ──────────────────────────────────────────────

pub type NodeId = String;

/// One flat input record as delivered by the data source.
/// `parent_id = None` marks the root; exactly one root is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: NodeId,
    pub name: String,
    pub parent_id: Option<NodeId>,
}

impl Record {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, parent_id: Option<NodeId>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id,
        }
    }
}

/// Reference to an externally defined action (the host resolves it).
pub type ActionRef = String;

// ──────────────────────────────────────────────
// Configuration
// ──────────────────────────────────────────────

/// Recognized widget options. Styling fields are passed through to the
/// render backend untouched; the layout/session fields drive the core.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeConfig {
    pub node_radius: f32,
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub font_size: f32,
    pub font_color: Color,
    pub background_color: Color,
    /// Vertical pixels reserved per node on the widest tree level.
    pub vertical_node_distance: f32,
    /// Multiplier on the label-derived unit for spacing between depth levels.
    pub horizontal_spacing_factor: f32,
    pub transition_duration_ms: u32,
    pub drag_drop_enabled: bool,
    pub collapse_expand_all_enabled: bool,
    pub centralize_on_click: bool,
    /// When set, clicking a node dispatches this action instead of toggling.
    pub on_click_action: Option<ActionRef>,
    /// Required when drag & drop is enabled.
    pub save_action: Option<ActionRef>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            node_radius: 4.5,
            stroke_color: Color::BLACK,
            stroke_width: 1.5,
            font_size: 12.0,
            font_color: Color::BLACK,
            background_color: Color::WHITE,
            vertical_node_distance: 25.0,
            horizontal_spacing_factor: 10.0,
            transition_duration_ms: 750,
            drag_drop_enabled: false,
            collapse_expand_all_enabled: true,
            centralize_on_click: false,
            on_click_action: None,
            save_action: None,
        }
    }
}

// ──────────────────────────────────────────────
// Viewport
// ──────────────────────────────────────────────

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 3.0;

/// Pan/zoom transform of the rendered tree. One per session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub translate: Vec2,
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            translate: Vec2::default(),
        }
    }

    /// Set the scale, clamped to the allowed range, keeping `focal`
    /// (in screen coordinates) stationary.
    pub fn zoom(&mut self, scale: f32, focal: Vec2) {
        let new_scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        let ratio = new_scale / self.scale;
        self.translate.x = focal.x - (focal.x - self.translate.x) * ratio;
        self.translate.y = focal.y - (focal.y - self.translate.y) * ratio;
        self.scale = new_scale;
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.translate.x += delta.x;
        self.translate.y += delta.y;
    }

    /// Translate so that a tree-space position maps to the center of a
    /// viewport of the given size, at the current scale.
    pub fn center_on(&mut self, position: Vec2, viewport_size: Size) {
        self.translate.x = -position.x * self.scale + viewport_size.width / 2.0;
        self.translate.y = -position.y * self.scale + viewport_size.height / 2.0;
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

// ──────────────────────────────────────────────
// Render frame
// ──────────────────────────────────────────────

/// One node glyph in a render frame. `previous_position` is where the glyph
/// was before the latest layout pass; backends interpolate between the two.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeGlyph {
    pub id: NodeId,
    pub name: String,
    pub position: Vec2,
    pub previous_position: Vec2,
    pub depth: usize,
    /// True when the node has children, visible or hidden.
    pub has_children: bool,
    /// True when the node's children are currently hidden.
    pub collapsed: bool,
}

/// One parent→child link curve in a render frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkGlyph {
    pub source: NodeId,
    pub target: NodeId,
    pub source_position: Vec2,
    pub target_position: Vec2,
}

/// The animation anchor of a structural change: new glyphs enter at the
/// anchor's previous position, exiting glyphs leave toward its new one.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameAnchor {
    pub id: NodeId,
    pub previous_position: Vec2,
    pub position: Vec2,
}

/// Complete description of one layout pass, handed to the render backend.
/// Frames always carry the full visible set; a frame supersedes any
/// in-flight transitions from the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub nodes: Vec<NodeGlyph>,
    pub links: Vec<LinkGlyph>,
    pub anchor: FrameAnchor,
    pub extent: Extent,
    /// Present on the first layout of a load only; the backend sizes its
    /// canvas to this once and keeps it fixed afterwards.
    pub canvas_size: Option<Size>,
    pub transition_duration_ms: u32,
}

/// Temporary connector drawn between a dragged node and its hover target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropConnector {
    pub source: Vec2,
    pub target: Vec2,
}

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Failure reported by an external collaborator (data source or action).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BackendError {}

// ──────────────────────────────────────────────
// Trait: DataSource
// ──────────────────────────────────────────────

/// Delivers the flat record list for a subject. Invoked once per full
/// (re)load; the host adapts whatever async machinery it has and calls
/// back into the session when records are available.
pub trait DataSource {
    fn fetch_records(&mut self, subject_id: &str) -> Result<Vec<Record>, BackendError>;
}

// ──────────────────────────────────────────────
// Trait: ActionInvoker
// ──────────────────────────────────────────────

/// Triggers an externally defined action for a set of subject ids.
/// Used for the optional per-node click action and the save action.
pub trait ActionInvoker {
    fn invoke(&mut self, action: &ActionRef, subject_ids: &[NodeId]) -> Result<(), BackendError>;
}

// ──────────────────────────────────────────────
// Trait: RenderBackend
// ──────────────────────────────────────────────

/// Draws node glyphs and link curves. The session pushes complete frames;
/// the backend owns transitions, hit areas, and all visual concerns.
pub trait RenderBackend {
    /// Redraw after a layout pass.
    fn render(&mut self, frame: &RenderFrame);

    /// The pan/zoom transform changed.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Live drag feedback: offset a node glyph from its committed position.
    /// Purely visual; the committed position is untouched.
    fn preview_drag(&mut self, node: &NodeId, offset: Vec2);

    /// Hide or restore a node's subtree glyphs during a drag.
    fn suppress_subtree(&mut self, node: &NodeId, suppressed: bool);

    /// Show or clear the temporary drag-affiliation connector.
    fn set_drop_connector(&mut self, connector: Option<DropConnector>);
}
