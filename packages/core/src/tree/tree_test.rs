//! Structural tests for NodeTree
//!
//! Validates attachment, detachment, re-parenting, placeholder replacement,
//! path reconstruction and the acyclic single-parent invariant.

#[cfg(test)]
mod tree_tests {
    use crate::models::{JsonValueType, Node, NodeId, NodeKind, OrbitData, OrbitalData};
    use crate::tree::{NodeTree, TreeError, PATH_SEPARATOR};

    fn object(name: &str) -> Node {
        Node::new(NodeKind::JsonObject, name)
    }

    /// root -> [a -> [a1, a2], b]
    fn build() -> (NodeTree, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = NodeTree::new();
        let root = tree.add_node(Node::new(NodeKind::Root, "root"));
        let a = tree.add_child(root, object("a")).unwrap();
        let b = tree.add_child(root, object("b")).unwrap();
        let a1 = tree.add_child(a, object("a1")).unwrap();
        let a2 = tree.add_child(a, object("a2")).unwrap();
        (tree, root, a, b, a1, a2)
    }

    fn assert_acyclic(tree: &NodeTree, root: NodeId) {
        let limit = tree.descendant_count(root);
        for id in tree.descendants_list(root) {
            let mut steps = 0;
            let mut current = *id;
            while let Some(parent) = tree.parent(current) {
                assert_ne!(parent, *id, "node {} revisited itself", id);
                steps += 1;
                assert!(steps <= limit, "parent chain of {} too long", id);
                current = parent;
            }
            assert_eq!(current, root);
        }
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let (mut tree, root, a, b, _, _) = build();
        let c = tree.add_node(object("c"));
        tree.insert_child(root, 1, c).unwrap();

        assert_eq!(tree.children(root), &[a, c, b]);
        assert_eq!(tree.parent(c), Some(root));
    }

    #[test]
    fn test_attach_rejects_second_parent() {
        let (mut tree, _, a, b, a1, _) = build();
        let err = tree.append_child(b, a1).unwrap_err();
        assert_eq!(err, TreeError::already_attached(a1, a));
        assert_eq!(tree.children(b), &[] as &[NodeId]);
    }

    #[test]
    fn test_detach_reports_former_position() {
        let (mut tree, _, a, _, a1, a2) = build();

        assert_eq!(tree.detach(a1).unwrap(), Some((a, 0)));
        assert_eq!(tree.children(a), &[a2]);
        assert_eq!(tree.parent(a1), None);
        assert_eq!(tree.detach(a1).unwrap(), None);
    }

    #[test]
    fn test_reparent_moves_subtree() {
        let (mut tree, root, a, b, a1, a2) = build();
        assert_eq!(tree.descendant_count(a), 3);

        let old = tree.reparent(a, b).unwrap();
        assert_eq!(old, Some(root));
        assert_eq!(tree.children(b), &[a]);
        assert_eq!(tree.descendants_list(b), &[b, a, a1, a2]);
        assert_eq!(tree.descendant_count(root), 5);
        assert_acyclic(&tree, root);
    }

    #[test]
    fn test_reparent_rejects_cycles() {
        let (mut tree, root, a, _, a1, _) = build();

        let err = tree.reparent(a, a1).unwrap_err();
        assert_eq!(err, TreeError::would_create_cycle(a, a1));
        assert_eq!(tree.parent(a), Some(root));

        let err = tree.reparent(a, a).unwrap_err();
        assert!(matches!(err, TreeError::WouldCreateCycle { .. }));
        assert_acyclic(&tree, root);
    }

    #[test]
    fn test_replace_child_preserves_sibling_order() {
        let (mut tree, root, a, b, _, _) = build();
        let x = tree.add_node(object("x"));
        let y = tree.add_node(object("y"));

        tree.replace_child(a, &[x, y]).unwrap();

        assert_eq!(tree.children(root), &[x, y, b]);
        assert_eq!(tree.parent(a), None);
        assert_eq!(tree.descendant_count(root), 4);
    }

    #[test]
    fn test_released_nodes_keep_their_slots() {
        let (mut tree, root, a, b, _, _) = build();
        let before = tree.len();
        let x = tree.add_node(object("x"));

        tree.replace_child(a, &[x]).unwrap();
        tree.detach(b).unwrap();

        assert_eq!(tree.len(), before + 1);
        assert_eq!(tree.descendant_count(root), 2);
        assert_eq!(tree.parent(a), None);
        assert!(tree.get(a).is_some());
        assert_eq!(tree.descendant_count(a), 3);
    }

    #[test]
    fn test_replace_detached_node_fails() {
        let mut tree = NodeTree::new();
        let lonely = tree.add_node(object("lonely"));
        assert_eq!(
            tree.replace_child(lonely, &[]).unwrap_err(),
            TreeError::detached(lonely)
        );
    }

    #[test]
    fn test_unknown_ids_are_rejected() {
        let (mut tree, root, _, _, _, _) = build();
        let foreign = NodeId(999);
        assert_eq!(
            tree.append_child(root, foreign).unwrap_err(),
            TreeError::node_not_found(foreign)
        );
        assert!(tree.get(foreign).is_none());
    }

    #[test]
    fn test_path_and_depth() {
        let (tree, root, a, _, _, a2) = build();
        assert_eq!(tree.path(a2), format!("root{0}a{0}a2", PATH_SEPARATOR));
        assert_eq!(tree.depth(a2), 2);
        assert_eq!(tree.depth(root), 0);
        assert_eq!(tree.root_of(a2), root);
        assert!(tree.is_ancestor_of(a, a2));
        assert!(!tree.is_ancestor_of(a2, a));
    }

    #[test]
    fn test_find_orbital_by_guid() {
        let mut tree = NodeTree::new();
        let root = tree.add_node(Node::new(NodeKind::Root, "Solar System"));
        let ship = |guid| NodeKind::Ship(OrbitalData::new(guid, 2, OrbitData::default()));
        let first = tree.add_child(root, Node::new(ship(10), "A")).unwrap();
        tree.add_child(root, Node::new(ship(11), "B")).unwrap();
        let dup = tree.add_child(first, Node::new(ship(10), "A'")).unwrap();
        tree.add_child(
            root,
            Node::new(NodeKind::JsonValue(JsonValueType::Integer), "10"),
        )
        .unwrap();

        assert_eq!(tree.find_orbital_by_guid(root, 10), vec![first, dup]);
        assert!(tree.find_orbital_by_guid(root, 12).is_empty());
    }

    #[test]
    fn test_snapshot_ignores_arena_ids() {
        let (tree_one, root_one, ..) = build();

        let mut tree_two = NodeTree::new();
        tree_two.add_node(object("padding"));
        let root_two = tree_two.add_node(Node::new(NodeKind::Root, "root"));
        let a = tree_two.add_child(root_two, object("a")).unwrap();
        tree_two.add_child(root_two, object("b")).unwrap();
        tree_two.add_child(a, object("a1")).unwrap();
        tree_two.add_child(a, object("a2")).unwrap();

        assert_eq!(tree_one.snapshot(root_one), tree_two.snapshot(root_two));

        let shallow = tree_one.snapshot_to_depth(root_one, 1);
        assert_eq!(shallow.children.len(), 2);
        assert!(shallow.children[0].children.is_empty());
        assert_eq!(shallow.children[0].child_count, 2);
        assert!(shallow.to_outline().starts_with("root (2 children, 5 total)"));
    }
}
