// Plain-text render backend: keeps the latest frame and prints it as an
// indented outline. Transitions collapse to their end state; drag previews
// and the drop connector are annotated inline.

use std::collections::{HashMap, HashSet};

use dendro_core::{
    DropConnector, NodeGlyph, NodeId, RenderBackend, RenderFrame, Vec2, Viewport,
};

#[derive(Default)]
pub struct TextBackend {
    last_frame: Option<RenderFrame>,
    viewport: Viewport,
    drag_preview: Option<(NodeId, Vec2)>,
    suppressed: HashSet<NodeId>,
    connector: Option<DropConnector>,
}

impl TextBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print the latest frame as an indented outline, one node per line.
    pub fn print_outline(&self) {
        let Some(frame) = &self.last_frame else {
            println!("(no frame)");
            return;
        };

        let by_id: HashMap<&str, &NodeGlyph> =
            frame.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
        // Links are emitted in traversal order, so child order is preserved.
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        for link in &frame.links {
            children
                .entry(link.source.as_str())
                .or_default()
                .push(link.target.as_str());
        }

        println!(
            "viewport scale {:.2} translate ({:.1}, {:.1})",
            self.viewport.scale, self.viewport.translate.x, self.viewport.translate.y
        );
        if let Some(size) = frame.canvas_size {
            println!("canvas {:.0}x{:.0}", size.width, size.height);
        }
        if let Some(root) = frame.nodes.iter().find(|n| n.depth == 0) {
            self.print_node(root.id.as_str(), &by_id, &children, 0);
        }
        if let Some(connector) = self.connector {
            println!(
                "connector ({:.1}, {:.1}) -> ({:.1}, {:.1})",
                connector.source.x, connector.source.y, connector.target.x, connector.target.y
            );
        }
    }

    fn print_node(
        &self,
        id: &str,
        by_id: &HashMap<&str, &NodeGlyph>,
        children: &HashMap<&str, Vec<&str>>,
        indent: usize,
    ) {
        let Some(glyph) = by_id.get(id) else {
            return;
        };
        let marker = if glyph.collapsed {
            "[+]"
        } else if glyph.has_children {
            "[-]"
        } else {
            "( )"
        };
        let mut position = glyph.position;
        let mut note = "";
        if let Some((dragged, offset)) = &self.drag_preview {
            if dragged == &glyph.id {
                position = Vec2::new(position.x + offset.x, position.y + offset.y);
                note = "  (dragging)";
            }
        }
        println!(
            "{}{} {} @ ({:.1}, {:.1}){}",
            "  ".repeat(indent),
            marker,
            glyph.name,
            position.x,
            position.y,
            note
        );
        if self.suppressed.contains(&glyph.id) {
            return;
        }
        if let Some(kids) = children.get(id) {
            for kid in kids {
                self.print_node(kid, by_id, children, indent + 1);
            }
        }
    }
}

impl RenderBackend for TextBackend {
    fn render(&mut self, frame: &RenderFrame) {
        log::debug!(
            "frame: {} nodes, {} links, anchored at {}",
            frame.nodes.len(),
            frame.links.len(),
            frame.anchor.id
        );
        self.last_frame = Some(frame.clone());
        self.drag_preview = None;
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn preview_drag(&mut self, node: &NodeId, offset: Vec2) {
        self.drag_preview = Some((node.clone(), offset));
    }

    fn suppress_subtree(&mut self, node: &NodeId, suppressed: bool) {
        if suppressed {
            self.suppressed.insert(node.clone());
        } else {
            self.suppressed.remove(node);
        }
    }

    fn set_drop_connector(&mut self, connector: Option<DropConnector>) {
        self.connector = connector;
    }
}
