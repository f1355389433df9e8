// Interaction controller: owns one rendered tree instance — root node,
// viewport transform, drag state, parent baseline — and turns host gestures
// into structural changes, layout passes and render frames.

mod drag;

pub use drag::{PanDirection, PAN_BOUNDARY, PAN_SPEED, PAN_TICK_MS};

use std::collections::HashMap;
use std::fmt;

use dendro_core::{
    ActionInvoker, BackendError, DataSource, DropConnector, FrameAnchor, LinkGlyph, NodeGlyph,
    NodeId, Record, RenderBackend, RenderFrame, Size, TreeConfig, Vec2, Viewport,
};
use dendro_layout::TidyLayout;
use dendro_model::{
    build, capture_parents, compute_changes, MalformedHierarchyError, Node, ParentChange,
};

use drag::DragSession;

/// Vertical margin above and below the tree.
const ROOT_OFFSET_Y: f32 = 20.0;

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Failure to (re)load a tree. The session keeps its last good state.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    Hierarchy(MalformedHierarchyError),
    Fetch(BackendError),
    /// Drag & drop is enabled but no save action is configured.
    MissingSaveAction,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hierarchy(e) => write!(f, "malformed hierarchy: {}", e),
            Self::Fetch(e) => write!(f, "failed to fetch records: {}", e),
            Self::MissingSaveAction => {
                write!(f, "drag & drop is enabled but no save action is configured")
            }
        }
    }
}

impl std::error::Error for LoadError {}

impl From<MalformedHierarchyError> for LoadError {
    fn from(e: MalformedHierarchyError) -> Self {
        Self::Hierarchy(e)
    }
}

impl From<BackendError> for LoadError {
    fn from(e: BackendError) -> Self {
        Self::Fetch(e)
    }
}

// ──────────────────────────────────────────────
// TreeSession
// ──────────────────────────────────────────────

/// One interactive tree widget instance. All state is owned here; nothing
/// is shared across sessions. Methods are synchronous and are expected to
/// be called from a single host event loop.
pub struct TreeSession<B: RenderBackend> {
    config: TreeConfig,
    backend: B,
    engine: TidyLayout,
    root: Node,
    viewport: Viewport,
    viewport_size: Size,
    /// Parent per node id as of the last load or successful save.
    original_parents: HashMap<NodeId, NodeId>,
    /// Owning context of the record set, used when invoking the save action.
    subject_id: Option<NodeId>,
    drag: Option<DragSession>,
    /// The render canvas is sized on the first layout of a load only.
    initial_sized: bool,
}

impl<B: RenderBackend> TreeSession<B> {
    /// Build a session from an already-fetched record list.
    pub fn load(
        config: TreeConfig,
        backend: B,
        records: &[Record],
        viewport_size: Size,
    ) -> Result<Self, LoadError> {
        if config.drag_drop_enabled && config.save_action.is_none() {
            return Err(LoadError::MissingSaveAction);
        }

        let mut root = build(records)?;
        root.sort_recursive();

        let mut engine = TidyLayout::new(&config);
        engine.measure(&root);

        let original_parents = capture_parents(&root);
        let viewport = initial_viewport(&root);

        let mut session = Self {
            config,
            backend,
            engine,
            root,
            viewport,
            viewport_size,
            original_parents,
            subject_id: None,
            drag: None,
            initial_sized: false,
        };
        session.backend.set_viewport(session.viewport);
        let anchor = session.root.id.clone();
        session.relayout(&anchor);
        Ok(session)
    }

    /// Build a session by fetching records from a data source. The subject
    /// id is remembered and passed to the save action.
    pub fn fetch(
        config: TreeConfig,
        backend: B,
        source: &mut dyn DataSource,
        subject_id: &str,
        viewport_size: Size,
    ) -> Result<Self, LoadError> {
        let records = source.fetch_records(subject_id).map_err(|e| {
            log::error!("record fetch for {} failed: {}", subject_id, e);
            e
        })?;
        let mut session = Self::load(config, backend, &records, viewport_size)?;
        session.subject_id = Some(subject_id.to_string());
        Ok(session)
    }

    /// Replace the whole tree with a fresh record set. On error the current
    /// tree is left untouched. Resets viewport, baseline and canvas sizing.
    pub fn reload(&mut self, records: &[Record]) -> Result<(), LoadError> {
        let mut root = build(records)?;
        root.sort_recursive();

        self.engine = TidyLayout::new(&self.config);
        self.engine.measure(&root);
        self.original_parents = capture_parents(&root);
        self.viewport = initial_viewport(&root);
        self.root = root;
        self.drag = None;
        self.initial_sized = false;

        self.backend.set_viewport(self.viewport);
        let anchor = self.root.id.clone();
        self.relayout(&anchor);
        Ok(())
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
    }

    // ──────────────────────────────────────────
    // Click dispatch & expand/collapse
    // ──────────────────────────────────────────

    /// Click a node. With an external click action configured the action is
    /// dispatched and the toggle is suppressed; otherwise the node toggles
    /// (and the viewport centers on it when `centralize_on_click` is set).
    pub fn click(&mut self, id: &str, invoker: &mut dyn ActionInvoker) {
        if let Some(action) = self.config.on_click_action.clone() {
            if let Err(e) = invoker.invoke(&action, &[id.to_string()]) {
                log::error!("click action {} for {} failed: {}", action, id, e);
            }
            return;
        }
        if self.toggle(id) && self.config.centralize_on_click {
            self.center_on(id);
        }
    }

    /// Toggle a node between expanded and collapsed, re-laying out anchored
    /// at the node. Returns false for leaves and unknown ids.
    pub fn toggle(&mut self, id: &str) -> bool {
        let Some(node) = self.root.find_mut(id) else {
            return false;
        };
        if !node.toggle() {
            return false;
        }
        self.relayout(id);
        true
    }

    /// Collapse everything below the root. Gated by configuration.
    pub fn collapse_all(&mut self) -> bool {
        if !self.config.collapse_expand_all_enabled {
            return false;
        }
        self.root.collapse_recursive();
        let anchor = self.root.id.clone();
        self.relayout(&anchor);
        true
    }

    /// Expand the full stored hierarchy. Gated by configuration.
    pub fn expand_all(&mut self) -> bool {
        if !self.config.collapse_expand_all_enabled {
            return false;
        }
        self.root.expand_recursive();
        let anchor = self.root.id.clone();
        self.relayout(&anchor);
        true
    }

    // ──────────────────────────────────────────
    // Viewport
    // ──────────────────────────────────────────

    /// Zoom to `scale` (clamped to the allowed range) keeping `focal`
    /// stationary on screen.
    pub fn zoom(&mut self, scale: f32, focal: Vec2) {
        self.viewport.zoom(scale, focal);
        self.backend.set_viewport(self.viewport);
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.viewport.pan(delta);
        self.backend.set_viewport(self.viewport);
    }

    /// Center the viewport on a node at the current scale.
    pub fn center_on(&mut self, id: &str) {
        let Some(node) = self.root.find(id) else {
            return;
        };
        self.viewport.center_on(node.position, self.viewport_size);
        self.backend.set_viewport(self.viewport);
    }

    // ──────────────────────────────────────────
    // Drag & drop re-parenting
    // ──────────────────────────────────────────

    /// Begin dragging a node. Refused when drag & drop is disabled, for the
    /// root (it can never be re-parented), for unknown ids, and while
    /// another drag is active.
    pub fn drag_start(&mut self, id: &str) -> bool {
        if !self.config.drag_drop_enabled || self.drag.is_some() || id == self.root.id {
            return false;
        }
        let Some(node) = self.root.find(id) else {
            return false;
        };
        let Some(parent_id) = node.parent_id.clone() else {
            return false;
        };
        self.drag = Some(DragSession::new(id.to_string(), parent_id));
        true
    }

    /// Live drag feedback. Accumulates the visual offset, hides the dragged
    /// subtree's glyphs when the node has more than one visible child, and
    /// starts/stops the edge pan depending on the pointer position.
    pub fn drag_move(&mut self, delta: Vec2, pointer: Vec2) {
        let (node_id, needs_start) = match self.drag.as_ref() {
            Some(drag) => (drag.node_id.clone(), !drag.started),
            None => return,
        };

        if needs_start {
            let multi_child = self
                .root
                .find(&node_id)
                .map(|n| n.children().len() > 1)
                .unwrap_or(false);
            if multi_child {
                self.backend.suppress_subtree(&node_id, true);
            }
            if let Some(drag) = self.drag.as_mut() {
                drag.started = true;
                drag.subtree_suppressed = multi_child;
            }
        }

        let mut offset = Vec2::default();
        let mut hovering = false;
        if let Some(drag) = self.drag.as_mut() {
            drag.offset.x += delta.x;
            drag.offset.y += delta.y;
            drag.edge_pan = PanDirection::at_edge(pointer, self.viewport_size);
            offset = drag.offset;
            hovering = drag.hover_target.is_some();
        }

        self.backend.preview_drag(&node_id, offset);
        if hovering {
            self.update_connector();
        }
    }

    /// Hover a candidate drop target. Candidates equal to the dragged node
    /// or inside its subtree are rejected so a drop can never create a
    /// cycle. Returns whether the candidate was accepted.
    pub fn drag_over(&mut self, candidate: &str) -> bool {
        let Some(drag) = self.drag.as_ref() else {
            return false;
        };
        if candidate == drag.node_id {
            return false;
        }
        let Some(dragged) = self.root.find(&drag.node_id) else {
            return false;
        };
        if dragged.contains(candidate) || self.root.find(candidate).is_none() {
            return false;
        }
        if let Some(drag) = self.drag.as_mut() {
            drag.hover_target = Some(candidate.to_string());
        }
        self.update_connector();
        true
    }

    /// Clear the hover target and its connector.
    pub fn drag_out(&mut self) {
        if let Some(drag) = self.drag.as_mut() {
            drag.hover_target = None;
        }
        self.backend.set_drop_connector(None);
    }

    /// Finish the drag. With a hover target the re-parenting commits: the
    /// node moves under the target, the target is expanded so the node is
    /// visible, siblings re-sort, and the viewport recenters on the node.
    /// Without one the drag is a structural no-op and the re-layout snaps
    /// the glyph back. Returns whether a re-parent was committed.
    pub fn drag_end(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        if drag.subtree_suppressed {
            self.backend.suppress_subtree(&drag.node_id, false);
        }
        self.backend.set_drop_connector(None);

        let committed = match &drag.hover_target {
            Some(target) => self.commit_reparent(&drag.node_id, target),
            None => false,
        };
        self.relayout(&drag.node_id);
        if committed {
            self.center_on(&drag.node_id);
        }
        committed
    }

    /// One step of the edge pan while dragging. The host calls this every
    /// `PAN_TICK_MS` while it returns true.
    pub fn tick_edge_pan(&mut self) -> bool {
        let direction = match self.drag.as_ref().and_then(|d| d.edge_pan) {
            Some(direction) => direction,
            None => return false,
        };
        self.viewport.pan(direction.step());
        self.backend.set_viewport(self.viewport);
        true
    }

    fn commit_reparent(&mut self, node_id: &str, target: &str) -> bool {
        // Re-check the ancestor guard at commit time.
        let Some(dragged) = self.root.find(node_id) else {
            return false;
        };
        if node_id == target || dragged.contains(target) || self.root.find(target).is_none() {
            return false;
        }

        let Some(node) = self.root.detach(node_id) else {
            return false;
        };
        // Target existence outside the dragged subtree was verified above,
        // so the attach cannot miss.
        self.root.attach_child(target, node);
        if let Some(parent) = self.root.find_mut(target) {
            parent.expand();
        }
        self.root.sort_recursive();
        true
    }

    fn update_connector(&mut self) {
        let connector = self.drag.as_ref().and_then(|drag| {
            let target = self.root.find(drag.hover_target.as_deref()?)?;
            let dragged = self.root.find(&drag.node_id)?;
            Some(DropConnector {
                source: target.position,
                target: Vec2::new(
                    dragged.position.x + drag.offset.x,
                    dragged.position.y + drag.offset.y,
                ),
            })
        });
        self.backend.set_drop_connector(connector);
    }

    // ──────────────────────────────────────────
    // Persistence round-trip
    // ──────────────────────────────────────────

    /// Parent-reference deltas accumulated since the last load or save.
    pub fn pending_changes(&self) -> Vec<ParentChange> {
        compute_changes(&self.root, &self.original_parents)
    }

    /// Invoke the configured save action for the owning subject and, on
    /// success, reset the change baseline. A failed save leaves both the
    /// in-memory tree and the baseline intact so the user may re-save.
    pub fn save(&mut self, invoker: &mut dyn ActionInvoker) -> Result<Vec<ParentChange>, BackendError> {
        let Some(action) = self.config.save_action.clone() else {
            return Err(BackendError::new("no save action configured"));
        };
        let changes = self.pending_changes();
        let subject = self
            .subject_id
            .clone()
            .unwrap_or_else(|| self.root.id.clone());

        if let Err(e) = invoker.invoke(&action, &[subject]) {
            log::error!("save action {} failed: {}", action, e);
            return Err(e);
        }

        self.original_parents = capture_parents(&self.root);
        Ok(changes)
    }

    // ──────────────────────────────────────────
    // Layout & frame construction
    // ──────────────────────────────────────────

    /// Re-run the layout and push a complete frame to the backend. Frames
    /// carry the full visible set, so a frame fired while a previous
    /// transition is still running simply supersedes it.
    fn relayout(&mut self, anchor_id: &str) {
        let result = self.engine.layout(&mut self.root);

        let anchor_node = self.root.find(anchor_id).unwrap_or(&self.root);
        let anchor = FrameAnchor {
            id: anchor_node.id.clone(),
            previous_position: anchor_node.previous_position,
            position: anchor_node.position,
        };

        let mut nodes = Vec::with_capacity(result.visible_count);
        let mut links = Vec::new();
        collect_glyphs(&self.root, &mut nodes, &mut links);

        let canvas_size = if self.initial_sized {
            None
        } else {
            self.initial_sized = true;
            Some(Size::new(
                result.extent.max.x + self.engine.label_margin(),
                result.extent.height() + 2.0 * ROOT_OFFSET_Y,
            ))
        };

        self.backend.render(&RenderFrame {
            nodes,
            links,
            anchor,
            extent: result.extent,
            canvas_size,
            transition_duration_ms: self.config.transition_duration_ms,
        });
    }
}

/// Initial pan derived from the root label so it is never clipped at the
/// origin.
fn initial_viewport(root: &Node) -> Viewport {
    let mut viewport = Viewport::new();
    viewport.translate = Vec2::new(
        (root.name.chars().count() as f32 / 0.6) * 6.0,
        ROOT_OFFSET_Y,
    );
    viewport
}

/// Collect glyphs for the visible set: every node reachable through
/// expanded parents, plus one link per visible parent/child pair.
fn collect_glyphs(node: &Node, nodes: &mut Vec<NodeGlyph>, links: &mut Vec<LinkGlyph>) {
    nodes.push(NodeGlyph {
        id: node.id.clone(),
        name: node.name.clone(),
        position: node.position,
        previous_position: node.previous_position,
        depth: node.depth,
        has_children: node.child_count() > 0,
        collapsed: node.is_collapsed(),
    });
    for child in node.children() {
        links.push(LinkGlyph {
            source: node.id.clone(),
            target: child.id.clone(),
            source_position: node.position,
            target_position: child.position,
        });
        collect_glyphs(child, nodes, links);
    }
}
