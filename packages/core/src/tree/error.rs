//! Tree Structure Error Types

use crate::models::NodeId;
use thiserror::Error;

/// Errors from structural tree edits
///
/// All of these indicate a caller bug (an id from another tree, or an edit
/// that would break the single-parent/acyclic invariant). The tree is left
/// unchanged when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Id does not belong to this tree
    #[error("Node not found: {id}")]
    NodeNotFound { id: NodeId },

    /// Child already has a parent and must be detached first
    #[error("Node {child} is already attached to {parent}")]
    AlreadyAttached { child: NodeId, parent: NodeId },

    /// Edit would make a node its own ancestor
    #[error("Moving {node} under {new_parent} would create a cycle")]
    WouldCreateCycle { node: NodeId, new_parent: NodeId },

    /// Operation needs a parent but the node is a root
    #[error("Node {id} is not attached to a parent")]
    Detached { id: NodeId },
}

impl TreeError {
    pub fn node_not_found(id: NodeId) -> Self {
        Self::NodeNotFound { id }
    }

    pub fn already_attached(child: NodeId, parent: NodeId) -> Self {
        Self::AlreadyAttached { child, parent }
    }

    pub fn would_create_cycle(node: NodeId, new_parent: NodeId) -> Self {
        Self::WouldCreateCycle { node, new_parent }
    }

    pub fn detached(id: NodeId) -> Self {
        Self::Detached { id }
    }
}
