//! Docking Resolver
//!
//! Second pass over a built solar system: every ship whose record names a
//! docking target is moved from its orbital position to sit under the node
//! it is docked to.
//!
//! The whole plan is validated before the first move, so a document with a
//! broken docking reference fails without being left half-rehydrated:
//!
//! - the target GUID must match exactly one orbital node
//! - the resulting parent chain must not loop back to the docked ship
//!
//! Ships already parented to their target are left untouched, which makes
//! running the pass twice a no-op.

use crate::models::NodeId;
use crate::services::error::HierarchyError;
use crate::tree::NodeTree;
use std::collections::HashMap;

/// Summary of a docking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DockingReport {
    /// Ships re-parented by this pass
    pub moved: usize,
    /// Ships that were already under their docking target
    pub already_docked: usize,
}

struct DockingMove {
    ship: NodeId,
    guid: i64,
    target: NodeId,
    target_guid: i64,
}

/// Re-parent every docked ship under `root` to its docking target.
///
/// # Errors
///
/// - `DanglingDockingReference` when no node has the target GUID
/// - `AmbiguousDockingReference` when several nodes have it
/// - `CyclicDocking` when the move would make a ship its own ancestor
///
/// The tree is unchanged when an error is returned.
pub fn rehydrate_docked_ships(
    tree: &mut NodeTree,
    root: NodeId,
) -> Result<DockingReport, HierarchyError> {
    let plan = plan_moves(tree, root)?;
    check_for_cycles(tree, &plan)?;

    let mut report = DockingReport::default();
    let mut pending = Vec::with_capacity(plan.len());
    for step in plan {
        if tree.parent(step.ship) == Some(step.target) {
            report.already_docked += 1;
        } else {
            pending.push(step);
        }
    }

    // Detaching every mover first keeps each intermediate forest a subset
    // of the validated final one.
    for step in &pending {
        tree.detach(step.ship)?;
    }
    for step in &pending {
        tree.append_child(step.target, step.ship)?;
        tracing::debug!("Docked ship {} under {}", step.guid, step.target_guid);
    }
    report.moved = pending.len();

    tracing::info!(
        "Docking pass: {} ship(s) moved, {} already docked",
        report.moved,
        report.already_docked
    );
    Ok(report)
}

/// Resolve every docking reference to exactly one node.
fn plan_moves(tree: &NodeTree, root: NodeId) -> Result<Vec<DockingMove>, HierarchyError> {
    let docked: Vec<(NodeId, i64, i64)> = tree
        .descendants_list(root)
        .iter()
        .filter_map(|id| {
            let kind = tree.node(*id).kind();
            if !kind.is_ship() {
                return None;
            }
            let data = kind.orbital()?;
            data.docking_target().map(|target| (*id, data.guid, target))
        })
        .collect();

    docked
        .into_iter()
        .map(|(ship, guid, target_guid)| {
            let matches = tree.find_orbital_by_guid(root, target_guid);
            match matches.as_slice() {
                [] => Err(HierarchyError::DanglingDockingReference {
                    guid,
                    target: target_guid,
                }),
                [target] => Ok(DockingMove {
                    ship,
                    guid,
                    target: *target,
                    target_guid,
                }),
                _ => Err(HierarchyError::AmbiguousDockingReference {
                    guid,
                    target: target_guid,
                    matches: matches.len(),
                }),
            }
        })
        .collect()
}

/// Walk the parent chain each ship would have after all moves and reject
/// any that leads back to the ship itself.
fn check_for_cycles(tree: &NodeTree, plan: &[DockingMove]) -> Result<(), HierarchyError> {
    let planned: HashMap<NodeId, NodeId> = plan.iter().map(|m| (m.ship, m.target)).collect();
    let final_parent = |id: NodeId| planned.get(&id).copied().or_else(|| tree.parent(id));

    for step in plan {
        let mut current = Some(step.target);
        let mut steps = 0;
        while let Some(id) = current {
            if id == step.ship || steps > tree.len() {
                return Err(HierarchyError::CyclicDocking {
                    guid: step.guid,
                    target: step.target_guid,
                });
            }
            current = final_parent(id);
            steps += 1;
        }
    }
    Ok(())
}
