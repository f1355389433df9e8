#[cfg(test)]
mod tests {
    use crate::TidyLayout;
    use dendro_core::{Record, TreeConfig};
    use dendro_model::{build, Node};

    fn record(id: &str, name: &str, parent: Option<&str>) -> Record {
        Record::new(id, name, parent.map(str::to_string))
    }

    /// Helper: root A ("alpha") with children B ("beta") and C ("gamma"),
    /// sorted by name.
    fn three_node_tree() -> Node {
        let records = vec![
            record("A", "alpha", None),
            record("B", "beta", Some("A")),
            record("C", "gamma", Some("A")),
        ];
        let mut root = build(&records).unwrap();
        root.sort_recursive();
        root
    }

    fn engine_for(root: &Node) -> TidyLayout {
        let mut engine = TidyLayout::new(&TreeConfig::default());
        engine.measure(root);
        engine
    }

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    // ──────────────────────────────────────────
    // Basic placement
    // ──────────────────────────────────────────

    #[test]
    fn test_three_nodes_scenario() {
        // 3 visible nodes: A at depth 0, B and C at depth 1
        // with distinct breadth positions.
        let mut root = three_node_tree();
        let engine = engine_for(&root);
        let result = engine.layout(&mut root);

        assert_eq!(result.visible_count, 3);
        assert_eq!(result.depth_count, 2);
        assert_eq!(root.depth, 0);

        let a = result.positions["A"];
        let b = result.positions["B"];
        let c = result.positions["C"];
        assert!(approx_eq(a.x, 0.0));
        assert!(approx_eq(b.x, c.x));
        assert!(b.x > 0.0, "children sit one level deeper than the root");
        assert!(!approx_eq(b.y, c.y), "siblings get distinct breadth positions");
    }

    #[test]
    fn test_parent_centered_over_children() {
        let mut root = three_node_tree();
        let engine = engine_for(&root);
        let result = engine.layout(&mut root);

        let a = result.positions["A"];
        let b = result.positions["B"];
        let c = result.positions["C"];
        assert!(approx_eq(a.y, (b.y + c.y) / 2.0));
    }

    #[test]
    fn test_level_offset_follows_longest_label() {
        let mut root = three_node_tree();
        let config = TreeConfig::default();
        let engine = engine_for(&root);
        let result = engine.layout(&mut root);

        // Longest label is "alpha"/"gamma" (5 chars): 0.8 × 5 × factor.
        let expected = 0.8 * 5.0 * config.horizontal_spacing_factor;
        assert!(approx_eq(engine.level_offset(), expected));
        assert!(approx_eq(result.positions["B"].x, expected));
    }

    #[test]
    fn test_breadth_extent_scales_with_widest_level() {
        let config = TreeConfig::default();
        let mut root = three_node_tree();
        let engine = engine_for(&root);
        let result = engine.layout(&mut root);

        // Widest level has 2 nodes → extent height = 2 × distance.
        assert!(approx_eq(
            result.extent.height(),
            2.0 * config.vertical_node_distance
        ));
    }

    #[test]
    fn test_single_node_layout() {
        let mut root = build(&[record("A", "only", None)]).unwrap();
        let engine = engine_for(&root);
        let result = engine.layout(&mut root);

        assert_eq!(result.visible_count, 1);
        assert_eq!(result.depth_count, 1);
        assert!(approx_eq(result.extent.width(), 0.0));
        assert!(approx_eq(result.extent.height(), 0.0));
    }

    // ──────────────────────────────────────────
    // Idempotence & previous positions
    // ──────────────────────────────────────────

    #[test]
    fn test_layout_is_idempotent_without_structural_change() {
        let mut root = three_node_tree();
        let engine = engine_for(&root);
        let first = engine.layout(&mut root);
        let second = engine.layout(&mut root);
        assert_eq!(first.positions, second.positions);
    }

    #[test]
    fn test_previous_position_holds_pre_layout_position() {
        let mut root = three_node_tree();
        let engine = engine_for(&root);
        engine.layout(&mut root);
        let root_before = root.position;
        let b_before = root.find("B").unwrap().position;

        // Collapse the root so the next layout moves everything.
        root.toggle();
        engine.layout(&mut root);

        assert_eq!(root.previous_position, root_before);
        assert_eq!(root.find("B").unwrap().previous_position, b_before);
    }

    #[test]
    fn test_hidden_nodes_keep_stale_positions() {
        let mut root = three_node_tree();
        let engine = engine_for(&root);
        engine.layout(&mut root);
        let b_before = root.find("B").unwrap().position;

        root.toggle();
        let result = engine.layout(&mut root);

        assert!(!result.positions.contains_key("B"));
        assert_eq!(root.find("B").unwrap().position, b_before);
    }

    // ──────────────────────────────────────────
    // Visibility
    // ──────────────────────────────────────────

    #[test]
    fn test_collapsed_children_are_not_laid_out() {
        let mut root = three_node_tree();
        root.toggle();
        let engine = engine_for(&root);
        let result = engine.layout(&mut root);

        assert_eq!(result.visible_count, 1);
        assert!(result.positions.contains_key("A"));
        assert!(!result.positions.contains_key("B"));
    }

    #[test]
    fn test_predicate_filters_subtrees() {
        let records = vec![
            record("A", "alpha", None),
            record("B", "beta", Some("A")),
            record("C", "gamma", Some("A")),
            record("D", "delta", Some("B")),
        ];
        let mut root = build(&records).unwrap();
        let engine = engine_for(&root);

        // Filtering B must also hide its descendant D.
        let result = engine.layout_filtered(&mut root, |n| n.id != "B");
        assert_eq!(result.visible_count, 2);
        assert!(result.positions.contains_key("A"));
        assert!(result.positions.contains_key("C"));
        assert!(!result.positions.contains_key("D"));
    }

    #[test]
    fn test_root_is_always_placed() {
        let mut root = three_node_tree();
        let engine = engine_for(&root);
        let result = engine.layout_filtered(&mut root, |_| false);
        assert_eq!(result.visible_count, 1);
        assert!(result.positions.contains_key("A"));
    }

    // ──────────────────────────────────────────
    // Deeper trees
    // ──────────────────────────────────────────

    #[test]
    fn test_depths_reassigned_after_reparent() {
        let mut root = three_node_tree();
        let engine = engine_for(&root);
        engine.layout(&mut root);

        let node = root.detach("B").unwrap();
        root.attach_child("C", node);
        root.sort_recursive();
        let result = engine.layout(&mut root);

        assert_eq!(result.depth_count, 3);
        assert_eq!(root.find("B").unwrap().depth, 2);
        let b = result.positions["B"];
        let c = result.positions["C"];
        assert!(approx_eq(b.x, 2.0 * engine.level_offset()));
        assert!(approx_eq(c.y, b.y), "C sits centered over its only child");
    }

    #[test]
    fn test_leaves_evenly_distributed() {
        let records = vec![
            record("A", "root", None),
            record("B", "b", Some("A")),
            record("C", "c", Some("A")),
            record("D", "d", Some("A")),
            record("E", "e", Some("A")),
        ];
        let mut root = build(&records).unwrap();
        root.sort_recursive();
        let engine = engine_for(&root);
        let result = engine.layout(&mut root);

        let ys: Vec<f32> = ["B", "C", "D", "E"]
            .iter()
            .map(|id| result.positions[*id].y)
            .collect();
        let step = ys[1] - ys[0];
        assert!(step > 0.0);
        for pair in ys.windows(2) {
            assert!(approx_eq(pair[1] - pair[0], step));
        }
    }
}
