//! Shared fixtures for integration tests
//!
//! A miniature save: one star with two planets, three ships (one docked to
//! another), an asteroid, two players and two dynamic objects.

#![allow(dead_code)]

use hellion_core::{
    NodeId, NodeTree, RecordSet, SessionSources, SourceCategory, SourceDocument, SourceRef,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub const CELESTIAL_FILE: &str = "CelestialBodies.json";
pub const SAVE_FILE: &str = "save.json";

pub fn celestial_bodies() -> Value {
    json!([
        {"GUID": 1, "ParentGUID": -1, "Name": "HELLION Star"},
        {"GUID": 2, "ParentGUID": 1, "Name": "PlanetA", "SemiMajorAxis": 100.0},
        {"GUID": 3, "ParentGUID": 1, "Name": "PlanetB", "SemiMajorAxis": 50.0}
    ])
}

pub fn save() -> Value {
    json!({
        "Version": 3,
        "Ships": [
            {
                "GUID": 10, "Registration": "AM-10", "Name": "ShipA",
                "OrbitData": {"ParentGUID": 2, "SemiMajorAxis": 20.0}
            },
            {
                "GUID": 11, "Registration": "AM-11", "Name": "ShipB",
                "OrbitData": {"ParentGUID": 3, "SemiMajorAxis": 10.0},
                "DockedToShipGUID": 10, "DockedPortID": 1, "DockedToPortID": 2
            },
            {
                "GUID": 12, "Registration": "OUT-12", "Name": "Outpost",
                "OrbitData": {"ParentGUID": 3, "SemiMajorAxis": 5.0}
            }
        ],
        "Asteroids": [
            {"GUID": 20, "Name": "Rock", "OrbitData": {"ParentGUID": 1, "SemiMajorAxis": 300.0}}
        ],
        "Players": [
            {"GUID": 31, "ParentGUID": 11, "Name": "Bravo"},
            {"GUID": 30, "ParentGUID": 10, "Name": "Alpha"}
        ],
        "DynamicObjects": [
            {"GUID": 40, "ParentGUID": 11, "ItemID": 7, "PrefabPath": "Items/Crate"},
            {"GUID": 41, "ParentGUID": 31}
        ]
    })
}

/// Record sets of the fixture, in builder argument order.
pub fn record_sets(save: Value) -> (RecordSet, RecordSet, RecordSet, RecordSet, RecordSet) {
    let save = Arc::new(save);
    let set = |name: &str| RecordSet::new(name, SourceRef::new(Arc::clone(&save), format!("/{}", name)));
    (
        RecordSet::from_value("CelestialBodies", celestial_bodies()),
        set("Ships"),
        set("Asteroids"),
        set("Players"),
        set("DynamicObjects"),
    )
}

pub fn sources(save: Value) -> SessionSources {
    SessionSources::new(SourceDocument::loaded(SAVE_FILE, SourceCategory::Save, save))
        .with_static(SourceDocument::loaded(
            CELESTIAL_FILE,
            SourceCategory::StaticData,
            celestial_bodies(),
        ))
}

/// The unique node named `name` under `root`.
pub fn find_named(tree: &NodeTree, root: NodeId, name: &str) -> NodeId {
    let matches: Vec<NodeId> = tree
        .descendants_list(root)
        .iter()
        .copied()
        .filter(|id| tree.node(*id).name() == name)
        .collect();
    assert_eq!(matches.len(), 1, "expected exactly one node named {:?}", name);
    matches[0]
}

pub fn child_names(tree: &NodeTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .map(|child| tree.node(*child).name().to_string())
        .collect()
}

/// Every parent chain under `root` ends at `root` within
/// `descendant_count(root)` steps without revisiting its start.
pub fn assert_acyclic(tree: &NodeTree, root: NodeId) {
    let limit = tree.descendant_count(root);
    for id in tree.descendants_list(root) {
        let mut current = *id;
        let mut steps = 0;
        while let Some(parent) = tree.parent(current) {
            assert_ne!(parent, *id, "parent chain of {} loops", id);
            steps += 1;
            assert!(steps <= limit, "parent chain of {} is too long", id);
            current = parent;
        }
        assert_eq!(current, root);
    }
}

/// Every node's descendant count, recomputed from scratch, is one plus the
/// sum of its children's.
pub fn assert_counts_consistent(tree: &mut NodeTree, root: NodeId) {
    let ids = tree.descendants_list(root).to_vec();
    for id in &ids {
        tree.invalidate(*id);
    }
    for id in ids {
        let expected = 1 + tree
            .children(id)
            .iter()
            .map(|child| tree.descendant_count(*child))
            .sum::<usize>();
        assert_eq!(tree.descendant_count(id), expected, "count of {}", id);
        assert_eq!(tree.child_count(id), tree.children(id).len());
    }
}
