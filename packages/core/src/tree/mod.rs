//! Arena Node Tree
//!
//! [`NodeTree`] owns every node of one view. Nodes address each other by
//! [`NodeId`]; a node's `children` is an ordered id list and its `parent` a
//! plain id, so re-parenting is two list edits and cycles are checked by
//! walking ancestors.
//!
//! # Invariants
//!
//! - Every node has at most one parent; a node listed in `children` of `P`
//!   has `parent == Some(P)`
//! - No node is its own ancestor
//! - Structural edits keep aggregate caches consistent by invalidating the
//!   edited node and all of its ancestors (see [`cache`])
//!
//! A tree may hold several roots: the main view root, detached nodes created
//! but not yet attached, and placeholders released by expansion.
//!
//! Slots are never reclaimed. Detaching a node keeps it (and its subtree) in
//! the arena, so [`NodeTree::len`] only grows over the life of a view; every
//! expansion leaves its placeholder behind, and each Game Data file leaves
//! the emptied top-level value it replaced. Use
//! [`descendant_count`](NodeTree::descendant_count) on the view root for the
//! number of reachable nodes.

pub mod cache;
mod error;
mod snapshot;

#[cfg(test)]
mod tree_test;

pub use cache::CacheState;
pub use error::TreeError;
pub use snapshot::NodeSnapshot;

use crate::models::{Node, NodeId};

/// Separator used when rendering a root-to-node path.
pub const PATH_SEPARATOR: &str = " > ";

/// Arena of nodes making up one view.
#[derive(Debug, Default)]
pub struct NodeTree {
    nodes: Vec<Node>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever added, including detached roots. Never shrinks.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a detached node and return its id.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Add a node and append it to `parent`'s children.
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> Result<NodeId, TreeError> {
        self.ensure(parent)?;
        let id = self.add_node(node);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Add a freshly created node as the last child of `parent`.
    ///
    /// Builders use this for nodes they just constructed: a new node has no
    /// parent and no descendants, so none of the attach checks can fail.
    pub(crate) fn push_new_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.add_node(node);
        self.attach_fresh(parent, id);
        id
    }

    /// Append a detached root that was built after `parent` was allocated.
    ///
    /// Such a node cannot be an ancestor of `parent`, so only the parent
    /// link needs setting.
    pub(crate) fn attach_fresh(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.nodes[child.index()].parent.is_none());
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
        self.invalidate_upwards(parent);
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Mutable access to a node's content. Structure stays tree-managed.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    /// Append `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child)
    }

    /// Insert `child` at `index` in `parent`'s children (clamped to the end).
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), TreeError> {
        self.check_attachable(parent, child)?;

        let siblings = &mut self.nodes[parent.index()].children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.nodes[child.index()].parent = Some(parent);
        self.invalidate_upwards(parent);
        Ok(())
    }

    /// Remove `child` from its parent's child list.
    ///
    /// Returns the former parent and position, or `None` if the node was
    /// already a root.
    pub fn detach(&mut self, child: NodeId) -> Result<Option<(NodeId, usize)>, TreeError> {
        self.ensure(child)?;
        let Some(parent) = self.nodes[child.index()].parent else {
            return Ok(None);
        };

        let siblings = &mut self.nodes[parent.index()].children;
        let position = siblings
            .iter()
            .position(|id| *id == child)
            .ok_or_else(|| TreeError::detached(child))?;
        siblings.remove(position);
        self.nodes[child.index()].parent = None;
        self.invalidate_upwards(parent);
        Ok(Some((parent, position)))
    }

    /// Move `child` (with its subtree) to the end of `new_parent`'s children.
    ///
    /// Returns the former parent. Rejects moves that would create a cycle
    /// before touching anything.
    pub fn reparent(
        &mut self,
        child: NodeId,
        new_parent: NodeId,
    ) -> Result<Option<NodeId>, TreeError> {
        self.ensure(child)?;
        self.ensure(new_parent)?;
        if child == new_parent || self.is_ancestor_of(child, new_parent) {
            return Err(TreeError::would_create_cycle(child, new_parent));
        }

        let old_parent = self.detach(child)?.map(|(parent, _)| parent);
        self.append_child(new_parent, child)?;
        Ok(old_parent)
    }

    /// Replace the attached node `old` with `replacements`, in place.
    ///
    /// Sibling order around `old` is preserved; `old` becomes a detached root.
    pub fn replace_child(&mut self, old: NodeId, replacements: &[NodeId]) -> Result<(), TreeError> {
        let parent = self.parent(old).ok_or_else(|| TreeError::detached(old))?;
        for replacement in replacements {
            self.check_attachable(parent, *replacement)?;
        }

        let Some((parent, position)) = self.detach(old)? else {
            return Err(TreeError::detached(old));
        };
        for (offset, replacement) in replacements.iter().enumerate() {
            self.insert_child(parent, position + offset, *replacement)?;
        }
        Ok(())
    }

    /// Ancestors of `id`, nearest first. Does not include `id`.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Number of edges between `id` and its root.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// True if `ancestor` lies strictly above `node`.
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|id| id == ancestor)
    }

    /// Root-to-node names joined with [`PATH_SEPARATOR`].
    pub fn path(&self, id: NodeId) -> String {
        let mut names: Vec<&str> = self
            .ancestors(id)
            .map(|ancestor| self.node(ancestor).name())
            .collect();
        names.reverse();
        names.push(self.node(id).name());
        names.join(PATH_SEPARATOR)
    }

    /// Every orbital node under `root` (inclusive) with the given GUID, in
    /// depth-first order.
    pub fn find_orbital_by_guid(&self, root: NodeId, guid: i64) -> Vec<NodeId> {
        self.descendants_list(root)
            .iter()
            .copied()
            .filter(|id| {
                self.node(*id)
                    .kind()
                    .orbital()
                    .is_some_and(|data| data.guid == guid)
            })
            .collect()
    }

    fn ensure(&self, id: NodeId) -> Result<(), TreeError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(TreeError::node_not_found(id))
        }
    }

    fn check_attachable(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.ensure(parent)?;
        self.ensure(child)?;
        if let Some(current) = self.nodes[child.index()].parent {
            return Err(TreeError::already_attached(child, current));
        }
        if child == parent || self.is_ancestor_of(child, parent) {
            return Err(TreeError::would_create_cycle(child, parent));
        }
        Ok(())
    }
}

impl std::ops::Index<NodeId> for NodeTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.node(id)
    }
}

/// Iterator over a node's ancestors, nearest first.
pub struct Ancestors<'a> {
    tree: &'a NodeTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
