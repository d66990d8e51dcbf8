//! Orbital Graph Builder
//!
//! Joins the flat celestial-body, ship, asteroid and player record arrays of
//! a save into one solar-system tree:
//!
//! ```text
//! Solar System (Root)
//! └── Star
//!     ├── Planet (ascending semi-major axis)
//!     │   ├── Moon
//!     │   └── Ship
//!     │       └── Player
//!     └── Asteroid
//! ```
//!
//! Placement follows each record's *orbital* parent. Docking is applied
//! afterwards by the [docking resolver](crate::services::docking_resolver)
//! because docking targets are often defined after the ships docked to them.
//!
//! Records that cannot be reached (orphans, cyclic parent chains, vessels
//! around unknown bodies) are collected in [`BuildReport`] instead of being
//! dropped silently.

use crate::models::{
    CelestialBodyRecord, CelestialClass, DynamicObjectRecord, Node, NodeId, NodeKind, OrbitData,
    OrbitalData, PlayerRecord, SourceRef, VesselRecord, ROOT_PARENT_GUID,
};
use crate::services::error::HierarchyError;
use crate::tree::NodeTree;
use crate::utils::{generate_display_name, FALLBACK_DISPLAY_NAME};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Default guard on celestial-body nesting (star = level 0).
pub const DEFAULT_MAX_CELESTIAL_DEPTH: usize = 10;

/// Name of the solar-system root node.
pub const SOLAR_SYSTEM_ROOT_NAME: &str = "Solar System";

/// A named JSON array of records inside a loaded document.
#[derive(Debug, Clone)]
pub struct RecordSet {
    name: String,
    source: SourceRef,
}

impl RecordSet {
    pub fn new(name: impl Into<String>, source: SourceRef) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }

    /// Record set made from a standalone value (a whole file that is one
    /// array).
    pub fn from_value(name: impl Into<String>, value: Value) -> Self {
        Self::new(name, SourceRef::root(Arc::new(value)))
    }

    /// A set with no records.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::from_value(name, Value::Array(Vec::new()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    /// Deserialize every element, keeping each element's source reference.
    ///
    /// A pointer that does not resolve, or resolves to `null`, is an empty
    /// set; anything else that is not an array is an error.
    fn records<T>(&self) -> Result<Vec<(T, SourceRef)>, HierarchyError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let items = match self.source.resolve() {
            None | Some(Value::Null) => {
                tracing::debug!(
                    "Record set '{}' not present at '{}', treating as empty",
                    self.name,
                    self.source.pointer()
                );
                return Ok(Vec::new());
            }
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(HierarchyError::not_an_array(
                    &self.name,
                    self.source.pointer(),
                ))
            }
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                T::deserialize(item)
                    .map(|record| (record, self.source.child_index(index)))
                    .map_err(|e| HierarchyError::invalid_record(&self.name, index, e))
            })
            .collect()
    }
}

/// A record that could not be attached anywhere in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnplacedRecord {
    pub set: String,
    pub guid: i64,
    pub parent_guid: i64,
}

/// Outcome details of a build that do not abort it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub unplaced: Vec<UnplacedRecord>,
}

impl BuildReport {
    /// True when every record found a place in the tree.
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    fn unplaced(&mut self, set: &str, guid: i64, parent_guid: i64) {
        tracing::warn!(
            "Record {} in '{}' has no reachable parent {}; not placed",
            guid,
            set,
            parent_guid
        );
        self.unplaced.push(UnplacedRecord {
            set: set.to_string(),
            guid,
            parent_guid,
        });
    }
}

/// A built solar-system view.
#[derive(Debug)]
pub struct SolarSystem {
    pub tree: NodeTree,
    pub root: NodeId,
    pub report: BuildReport,
}

/// Builds the orbital hierarchy from record sets
#[derive(Debug, Clone, Copy)]
pub struct OrbitalGraphBuilder {
    max_celestial_depth: usize,
}

impl Default for OrbitalGraphBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CELESTIAL_DEPTH)
    }
}

impl OrbitalGraphBuilder {
    pub fn new(max_celestial_depth: usize) -> Self {
        Self {
            max_celestial_depth,
        }
    }

    pub fn max_celestial_depth(&self) -> usize {
        self.max_celestial_depth
    }

    /// Build the solar-system tree.
    ///
    /// # Errors
    ///
    /// - `NotAnArray` / `InvalidRecord` for malformed input
    /// - `DuplicateGuid` when two celestial bodies, ships or asteroids share
    ///   a GUID
    /// - `DepthLimitExceeded` when the celestial hierarchy nests deeper than
    ///   the configured guard
    pub fn build_solar_system(
        &self,
        celestial_bodies: &RecordSet,
        ships: &RecordSet,
        asteroids: &RecordSet,
        players: &RecordSet,
    ) -> Result<SolarSystem, HierarchyError> {
        let mut tree = NodeTree::new();
        let root = tree.add_node(Node::new(NodeKind::Root, SOLAR_SYSTEM_ROOT_NAME));
        let mut report = BuildReport::default();
        let mut guids = HashSet::new();

        let bodies =
            self.attach_celestial_bodies(&mut tree, root, celestial_bodies, &mut guids, &mut report)?;
        let ship_count =
            attach_vessels(&mut tree, root, ships, NodeKind::Ship, &mut guids, &mut report)?;
        let asteroid_count =
            attach_vessels(&mut tree, root, asteroids, NodeKind::Asteroid, &mut guids, &mut report)?;
        let player_count = attach_players(&mut tree, root, players, &mut report)?;

        tracing::info!(
            "Built solar system: {} celestial bodies, {} ships, {} asteroids, {} players ({} unplaced)",
            bodies,
            ship_count,
            asteroid_count,
            player_count,
            report.unplaced.len()
        );

        Ok(SolarSystem { tree, root, report })
    }

    /// Attach dynamic objects (items, modules) under the ship or asteroid
    /// whose GUID equals each object's `ParentGUID`.
    ///
    /// Objects held by anything else (players, other objects) are reported
    /// as unplaced. Returns the number of objects attached.
    pub fn attach_dynamic_objects(
        &self,
        system: &mut SolarSystem,
        objects: &RecordSet,
    ) -> Result<usize, HierarchyError> {
        let records: Vec<(DynamicObjectRecord, SourceRef)> = objects.records()?;
        let vessels = index_by_guid(&system.tree, system.root, |kind| {
            matches!(kind, NodeKind::Ship(_) | NodeKind::Asteroid(_))
        });

        let mut attached = 0;
        for (record, source) in records {
            let Some(parent) = vessels.get(&record.parent_guid).copied() else {
                system
                    .report
                    .unplaced(objects.name(), record.guid, record.parent_guid);
                continue;
            };

            let data = OrbitalData::new(record.guid, record.parent_guid, OrbitData::default());
            let node = Node::new(NodeKind::DynamicObject(data.clone()), object_name(&source))
                .with_tooltip(data.tooltip())
                .with_source(source);
            system.tree.push_new_child(parent, node);
            attached += 1;
        }

        tracing::debug!("Attached {} dynamic object(s)", attached);
        Ok(attached)
    }

    /// Recursive join from the sentinel parent. Returns the number of bodies
    /// placed.
    fn attach_celestial_bodies(
        &self,
        tree: &mut NodeTree,
        root: NodeId,
        set: &RecordSet,
        guids: &mut HashSet<i64>,
        report: &mut BuildReport,
    ) -> Result<usize, HierarchyError> {
        let records: Vec<(CelestialBodyRecord, SourceRef)> = set.records()?;
        claim_guids(guids, set, records.iter().map(|(record, _)| record.guid))?;

        let mut by_parent: HashMap<i64, Vec<usize>> = HashMap::new();
        for (index, (record, _)) in records.iter().enumerate() {
            by_parent.entry(record.parent_guid).or_default().push(index);
        }
        for siblings in by_parent.values_mut() {
            // Stable: equal axes keep input order.
            siblings.sort_by(|a, b| {
                records[*a]
                    .0
                    .semi_major_axis
                    .total_cmp(&records[*b].0.semi_major_axis)
            });
        }

        let mut placed = HashSet::with_capacity(records.len());
        let mut pending = vec![(root, ROOT_PARENT_GUID, 0usize)];
        while let Some((parent_node, parent_guid, level)) = pending.pop() {
            let Some(children) = by_parent.get(&parent_guid) else {
                continue;
            };
            if level >= self.max_celestial_depth {
                return Err(HierarchyError::DepthLimitExceeded {
                    guid: records[children[0]].0.guid,
                    limit: self.max_celestial_depth,
                });
            }

            let class = match level {
                0 => CelestialClass::Star,
                1 => CelestialClass::Planet,
                _ => CelestialClass::Moon,
            };
            let mut created = Vec::with_capacity(children.len());
            for index in children {
                let (record, source) = &records[*index];
                let data = record.orbital_data();
                let name = record
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("Body {}", record.guid));
                let node = Node::new(NodeKind::CelestialBody(class, data.clone()), name)
                    .with_tooltip(data.tooltip())
                    .with_source(source.clone());
                created.push((tree.push_new_child(parent_node, node), record.guid));
                placed.insert(record.guid);
            }
            // Children are pushed reversed so they are expanded in order.
            for (node, guid) in created.into_iter().rev() {
                pending.push((node, guid, level + 1));
            }
        }

        for (record, _) in &records {
            if !placed.contains(&record.guid) {
                report.unplaced(set.name(), record.guid, record.parent_guid);
            }
        }

        tracing::debug!(
            "Placed {} of {} celestial bodies from '{}'",
            placed.len(),
            records.len(),
            set.name()
        );
        Ok(placed.len())
    }
}

/// Record every GUID of `set` in `guids`, failing on the first one already
/// claimed by this set or an earlier one.
fn claim_guids(
    guids: &mut HashSet<i64>,
    set: &RecordSet,
    records: impl Iterator<Item = i64>,
) -> Result<(), HierarchyError> {
    for guid in records {
        if !guids.insert(guid) {
            return Err(HierarchyError::duplicate_guid(set.name(), guid));
        }
    }
    Ok(())
}

/// Attach ships or asteroids under the celestial body they orbit.
fn attach_vessels(
    tree: &mut NodeTree,
    root: NodeId,
    set: &RecordSet,
    kind: fn(OrbitalData) -> NodeKind,
    guids: &mut HashSet<i64>,
    report: &mut BuildReport,
) -> Result<usize, HierarchyError> {
    let mut records: Vec<(VesselRecord, SourceRef)> = set.records()?;
    claim_guids(guids, set, records.iter().map(|(record, _)| record.guid))?;
    records.sort_by(|(a, _), (b, _)| {
        a.orbit_data
            .parent_guid
            .cmp(&b.orbit_data.parent_guid)
            .then(a.orbit_data.semi_major_axis.total_cmp(&b.orbit_data.semi_major_axis))
    });

    let bodies = index_by_guid(tree, root, NodeKind::is_celestial_body);

    let mut attached = 0;
    for (record, source) in records {
        let data = record.orbital_data();
        let Some(parent) = bodies.get(&data.parent_guid).copied() else {
            report.unplaced(set.name(), data.guid, data.parent_guid);
            continue;
        };

        let node = Node::new(kind(data.clone()), object_name(&source))
            .with_tooltip(data.tooltip())
            .with_source(source);
        tree.push_new_child(parent, node);
        attached += 1;
    }
    Ok(attached)
}

/// Attach players, in GUID order, under the ship they are aboard.
fn attach_players(
    tree: &mut NodeTree,
    root: NodeId,
    set: &RecordSet,
    report: &mut BuildReport,
) -> Result<usize, HierarchyError> {
    let mut records: Vec<(PlayerRecord, SourceRef)> = set.records()?;
    records.sort_by_key(|(record, _)| record.guid);

    let ships = index_by_guid(tree, root, NodeKind::is_ship);

    let mut attached = 0;
    for (record, source) in records {
        let Some(ship) = ships.get(&record.parent_guid).copied() else {
            report.unplaced(set.name(), record.guid, record.parent_guid);
            continue;
        };

        let data = OrbitalData::new(record.guid, record.parent_guid, OrbitData::default());
        let name = record
            .name
            .clone()
            .unwrap_or_else(|| format!("Player {}", record.guid));
        let node = Node::new(NodeKind::Player(data.clone()), name)
            .with_tooltip(data.tooltip())
            .with_source(source);
        tree.push_new_child(ship, node);
        attached += 1;
    }
    Ok(attached)
}

/// GUID → node for orbital nodes matching `filter`.
///
/// Vessel and celestial GUIDs are unique once the build has claimed them.
fn index_by_guid(
    tree: &NodeTree,
    root: NodeId,
    filter: impl Fn(&NodeKind) -> bool,
) -> HashMap<i64, NodeId> {
    let mut index = HashMap::new();
    for id in tree.descendants_list(root) {
        let kind = tree.node(*id).kind();
        if !filter(kind) {
            continue;
        }
        if let Some(data) = kind.orbital() {
            index.entry(data.guid).or_insert(*id);
        }
    }
    index
}

/// Display name of a record object.
fn object_name(source: &SourceRef) -> String {
    source
        .resolve()
        .and_then(Value::as_object)
        .map(generate_display_name)
        .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string())
}

/// Parse a record set eagerly, for callers that only need the typed records.
pub fn parse_records<T>(set: &RecordSet) -> Result<Vec<T>, HierarchyError>
where
    T: for<'de> Deserialize<'de>,
{
    Ok(set.records::<T>()?.into_iter().map(|(record, _)| record).collect())
}
