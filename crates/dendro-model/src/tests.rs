#[cfg(test)]
mod tests {
    use crate::{build, capture_parents, compute_changes, MalformedHierarchyError, NodeState};
    use dendro_core::Record;

    fn record(id: &str, name: &str, parent: Option<&str>) -> Record {
        Record::new(id, name, parent.map(str::to_string))
    }

    /// Helper: root A with children B and C.
    fn three_records() -> Vec<Record> {
        vec![
            record("A", "alpha", None),
            record("B", "beta", Some("A")),
            record("C", "gamma", Some("A")),
        ]
    }

    // ──────────────────────────────────────────
    // Building
    // ──────────────────────────────────────────

    #[test]
    fn test_build_node_count_matches_record_count() {
        let root = build(&three_records()).unwrap();
        assert_eq!(root.count(), 3);
        assert_eq!(root.id, "A");
        assert_eq!(root.children().len(), 2);
    }

    #[test]
    fn test_build_sets_parent_ids_and_depths() {
        let root = build(&three_records()).unwrap();
        assert_eq!(root.parent_id, None);
        assert_eq!(root.depth, 0);
        for child in root.children() {
            assert_eq!(child.parent_id.as_deref(), Some("A"));
            assert_eq!(child.depth, 1);
        }
    }

    #[test]
    fn test_build_empty_string_parent_marks_root() {
        let records = vec![
            record("A", "alpha", Some("")),
            record("B", "beta", Some("A")),
        ];
        let root = build(&records).unwrap();
        assert_eq!(root.id, "A");
        assert_eq!(root.count(), 2);
    }

    #[test]
    fn test_build_no_root_fails() {
        let records = vec![
            record("A", "alpha", Some("B")),
            record("B", "beta", Some("A")),
        ];
        assert_eq!(build(&records), Err(MalformedHierarchyError::NoRoot));
    }

    #[test]
    fn test_build_multiple_roots_fails() {
        let records = vec![record("A", "alpha", None), record("B", "beta", None)];
        assert_eq!(
            build(&records),
            Err(MalformedHierarchyError::MultipleRoots(2))
        );
    }

    #[test]
    fn test_build_dangling_parent_fails() {
        let records = vec![
            record("A", "alpha", None),
            record("B", "beta", Some("missing")),
        ];
        assert_eq!(
            build(&records),
            Err(MalformedHierarchyError::DanglingParent {
                child: "B".into(),
                parent: "missing".into(),
            })
        );
    }

    #[test]
    fn test_build_duplicate_id_fails() {
        let records = vec![
            record("A", "alpha", None),
            record("A", "alias", Some("A")),
        ];
        assert_eq!(
            build(&records),
            Err(MalformedHierarchyError::DuplicateId("A".into()))
        );
    }

    #[test]
    fn test_build_parent_cycle_fails() {
        // B and C reference each other; neither is reachable from A.
        let records = vec![
            record("A", "alpha", None),
            record("B", "beta", Some("C")),
            record("C", "gamma", Some("B")),
        ];
        assert_eq!(
            build(&records),
            Err(MalformedHierarchyError::UnreachableRecords(2))
        );
    }

    #[test]
    fn test_build_normalizes_names_to_nfc() {
        // "e" + combining acute becomes the composed form.
        let records = vec![record("A", "caf\u{0065}\u{0301}", None)];
        let root = build(&records).unwrap();
        assert_eq!(root.name, "caf\u{00e9}");
    }

    #[test]
    fn test_build_does_not_mutate_input() {
        let records = three_records();
        let before = records.clone();
        let _ = build(&records).unwrap();
        assert_eq!(records, before);
    }

    // ──────────────────────────────────────────
    // Expand / collapse
    // ──────────────────────────────────────────

    #[test]
    fn test_toggle_roundtrip_restores_children() {
        let mut root = build(&three_records()).unwrap();
        let before: Vec<String> = root.children().iter().map(|c| c.id.clone()).collect();

        assert!(root.toggle());
        assert!(root.is_collapsed());
        assert!(root.children().is_empty());
        assert_eq!(root.children_all().len(), 2);

        assert!(root.toggle());
        assert!(root.is_expanded());
        let after: Vec<String> = root.children().iter().map(|c| c.id.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_toggle_leaf_is_noop() {
        let mut root = build(&three_records()).unwrap();
        let leaf = root.find_mut("B").unwrap();
        assert!(!leaf.toggle());
        assert!(leaf.is_leaf());
    }

    #[test]
    fn test_collapse_is_recursive_expand_restores_one_level() {
        let records = vec![
            record("A", "alpha", None),
            record("B", "beta", Some("A")),
            record("D", "delta", Some("B")),
        ];
        let mut root = build(&records).unwrap();

        root.toggle(); // collapse A, which collapses B first
        root.toggle(); // expand A one level

        let b = root.find("B").unwrap();
        assert!(b.is_collapsed(), "B should stay collapsed after re-expand");
        assert!(b.children().is_empty());
        assert_eq!(b.children_all().len(), 1);
    }

    #[test]
    fn test_expand_recursive_restores_full_hierarchy() {
        let records = vec![
            record("A", "alpha", None),
            record("B", "beta", Some("A")),
            record("D", "delta", Some("B")),
        ];
        let mut root = build(&records).unwrap();
        root.collapse_recursive();
        root.expand_recursive();

        assert!(root.is_expanded());
        assert!(root.find("B").unwrap().is_expanded());
        assert_eq!(root.find("D").unwrap().children_all().len(), 0);
    }

    #[test]
    fn test_collapse_scenario_hidden_children() {
        // collapse(A) leaves 1 visible node; B and C go hidden.
        let mut root = build(&three_records()).unwrap();
        root.sort_recursive();
        root.toggle();

        assert!(root.children().is_empty());
        let hidden: Vec<&str> = root.children_all().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(hidden, vec!["B", "C"]);
    }

    // ──────────────────────────────────────────
    // Detach / attach
    // ──────────────────────────────────────────

    #[test]
    fn test_detach_and_attach_reparents() {
        let mut root = build(&three_records()).unwrap();
        let node = root.detach("B").unwrap();
        assert!(!root.contains("B"));

        assert!(root.attach_child("C", node));
        let b = root.find("B").unwrap();
        assert_eq!(b.parent_id.as_deref(), Some("C"));
        assert!(root.find("C").unwrap().is_expanded());
    }

    #[test]
    fn test_attach_to_collapsed_target_goes_hidden() {
        let records = vec![
            record("A", "alpha", None),
            record("B", "beta", Some("A")),
            record("C", "gamma", Some("A")),
            record("D", "delta", Some("C")),
        ];
        let mut root = build(&records).unwrap();
        root.find_mut("C").unwrap().collapse_recursive();

        let node = root.detach("B").unwrap();
        assert!(root.attach_child("C", node));

        let c = root.find("C").unwrap();
        assert!(c.is_collapsed());
        assert!(c.children().is_empty());
        assert_eq!(c.children_all().len(), 2);
    }

    #[test]
    fn test_detach_last_child_leaves_a_leaf() {
        let records = vec![record("A", "alpha", None), record("B", "beta", Some("A"))];
        let mut root = build(&records).unwrap();
        let _ = root.detach("B").unwrap();
        assert!(root.is_leaf());
    }

    #[test]
    fn test_detach_missing_returns_none() {
        let mut root = build(&three_records()).unwrap();
        assert!(root.detach("nope").is_none());
        assert_eq!(root.count(), 3);
    }

    // ──────────────────────────────────────────
    // Sibling ordering
    // ──────────────────────────────────────────

    #[test]
    fn test_sort_is_case_insensitive() {
        let records = vec![
            record("A", "root", None),
            record("B", "banana", Some("A")),
            record("C", "Apple", Some("A")),
            record("D", "cherry", Some("A")),
        ];
        let mut root = build(&records).unwrap();
        root.sort_recursive();

        let names: Vec<&str> = root.children().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_sort_reaches_hidden_children() {
        let records = vec![
            record("A", "root", None),
            record("B", "branch", Some("A")),
            record("C", "zeta", Some("B")),
            record("D", "alpha", Some("B")),
        ];
        let mut root = build(&records).unwrap();
        root.find_mut("B").unwrap().collapse_recursive();
        root.sort_recursive();

        let b = root.find("B").unwrap();
        let names: Vec<&str> = b.children_all().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    // ──────────────────────────────────────────
    // Reconciliation
    // ──────────────────────────────────────────

    #[test]
    fn test_no_changes_for_untouched_tree() {
        let root = build(&three_records()).unwrap();
        let baseline = capture_parents(&root);
        assert!(compute_changes(&root, &baseline).is_empty());
    }

    #[test]
    fn test_reparent_emits_exactly_one_change() {
        // Dragging B onto C yields exactly one change: {B, old A, new C}.
        let mut root = build(&three_records()).unwrap();
        let baseline = capture_parents(&root);

        let node = root.detach("B").unwrap();
        root.attach_child("C", node);
        root.sort_recursive();

        let changes = compute_changes(&root, &baseline);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].node_id, "B");
        assert_eq!(changes[0].old_parent_id, "A");
        assert_eq!(changes[0].new_parent_id, "C");
    }

    #[test]
    fn test_changes_cover_hidden_children() {
        let records = vec![
            record("A", "alpha", None),
            record("B", "beta", Some("A")),
            record("C", "gamma", Some("A")),
            record("D", "delta", Some("C")),
        ];
        let mut root = build(&records).unwrap();
        let baseline = capture_parents(&root);

        let node = root.detach("D").unwrap();
        root.attach_child("B", node);
        root.find_mut("B").unwrap().collapse_recursive();

        let changes = compute_changes(&root, &baseline);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].node_id, "D");
        assert_eq!(changes[0].new_parent_id, "B");
    }

    #[test]
    fn test_move_back_cancels_the_change() {
        let mut root = build(&three_records()).unwrap();
        let baseline = capture_parents(&root);

        let node = root.detach("B").unwrap();
        root.attach_child("C", node);
        let node = root.detach("B").unwrap();
        root.attach_child("A", node);

        assert!(compute_changes(&root, &baseline).is_empty());
    }

    // ──────────────────────────────────────────
    // Traversal helpers
    // ──────────────────────────────────────────

    #[test]
    fn test_max_label_len_spans_hidden_nodes() {
        let records = vec![
            record("A", "ab", None),
            record("B", "a-much-longer-label", Some("A")),
        ];
        let mut root = build(&records).unwrap();
        root.collapse_recursive();
        assert_eq!(root.max_label_len(), 19);
    }

    #[test]
    fn test_state_tags_are_exhaustive() {
        let mut root = build(&three_records()).unwrap();
        assert!(matches!(root.state, NodeState::Expanded(_)));
        root.collapse_recursive();
        assert!(matches!(root.state, NodeState::Collapsed(_)));
        let leaf = root.children_all().first().unwrap();
        assert!(matches!(leaf.state, NodeState::Leaf));
    }
}
