//! Integration tests for JsonTreeMaterializer
//!
//! Tests cover:
//! - Expansion round-trip at every depth budget
//! - Cache consistency after expansion
//! - Error sentinels for unavailable sources

mod common;

use anyhow::Result;
use common::{assert_acyclic, assert_counts_consistent};
use hellion_core::{JsonTreeMaterializer, NodeKind, NodeTree, SourceRef};
use std::sync::Arc;

#[test]
fn test_expansion_round_trip_at_every_depth() -> Result<()> {
    let doc = Arc::new(common::save());
    let source = SourceRef::root(Arc::clone(&doc));

    let mut eager = NodeTree::new();
    let eager_root = JsonTreeMaterializer::build(&mut eager, &source, usize::MAX, 0, "save", false)
        .expect("save document is not null");
    let expected = eager.snapshot(eager_root);

    for max_depth in 0..6 {
        for budget in 1..3 {
            let mut lazy = NodeTree::new();
            let root = JsonTreeMaterializer::build(&mut lazy, &source, max_depth, 0, "save", false)
                .expect("save document is not null");
            JsonTreeMaterializer::expand_all(&mut lazy, root, budget)?;

            assert_eq!(
                lazy.snapshot(root),
                expected,
                "max_depth {} budget {}",
                max_depth,
                budget
            );
            assert_acyclic(&lazy, root);
        }
    }
    Ok(())
}

#[test]
fn test_counts_stay_consistent_across_expansions() -> Result<()> {
    let doc = Arc::new(common::save());
    let source = SourceRef::root(doc);
    let mut tree = NodeTree::new();
    let root = JsonTreeMaterializer::build(&mut tree, &source, 1, 0, "save", false)
        .expect("save document is not null");

    // Warm every cache, then expand one placeholder at a time.
    tree.recompute_all(root);
    loop {
        let next = tree
            .descendants_list(root)
            .iter()
            .copied()
            .find(|id| tree.node(*id).kind().is_expansion_pending());
        let Some(placeholder) = next else {
            break;
        };
        let parent = tree.parent(placeholder).expect("placeholders are attached");
        let before = tree.descendant_count(root);

        let added = JsonTreeMaterializer::expand(&mut tree, placeholder, 1)?;

        let added_size: usize = added.iter().map(|id| tree.descendant_count(*id)).sum();
        assert_eq!(tree.descendant_count(root), before - 1 + added_size);
        assert_eq!(tree.child_count(parent), tree.children(parent).len());
        assert_counts_consistent(&mut tree, root);
    }
    Ok(())
}

#[test]
fn test_error_node_for_failed_source() {
    let mut tree = NodeTree::new();
    let id = JsonTreeMaterializer::error_node(&mut tree, "Asteroids.json", "permission denied");

    assert_eq!(tree.node(id).kind().tag(), "LoadError");
    assert!(matches!(tree.node(id).kind(), NodeKind::LoadError(message) if message == "permission denied"));
    assert_eq!(tree.node(id).display_text(), "Asteroids.json [loading error]");
}
