//! Per-Node Aggregate Cache
//!
//! Each node memoises four derived values: direct-child count, total
//! descendant count, a copy of its child list, and its flattened descendant
//! list (self-inclusive, depth-first pre-order).
//!
//! # Cache Invalidation
//!
//! - **Lazy**: an empty cell means "stale"; the value is computed on the next
//!   read and memoised until invalidated again
//! - **Explicit**: [`NodeTree::invalidate`] clears a single node only and does
//!   not cascade
//! - **Structural**: every structural edit on [`NodeTree`] calls
//!   [`NodeTree::invalidate_upwards`] for the node whose children changed, so
//!   ancestors never report stale counts
//!
//! A stale cell is never read: all accessors go through `get_or_init`.

use crate::models::NodeId;
use crate::tree::NodeTree;
use std::cell::OnceCell;

/// Memoised aggregate values of one node.
#[derive(Debug, Default)]
pub struct AggregateCache {
    child_count: OnceCell<usize>,
    descendant_count: OnceCell<usize>,
    children: OnceCell<Vec<NodeId>>,
    descendants: OnceCell<Vec<NodeId>>,
}

impl AggregateCache {
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    fn state(&self) -> CacheState {
        CacheState {
            child_count: self.child_count.get().is_some(),
            descendant_count: self.descendant_count.get().is_some(),
            children_list: self.children.get().is_some(),
            descendants_list: self.descendants.get().is_some(),
        }
    }
}

/// Which aggregate values of a node are currently memoised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheState {
    pub child_count: bool,
    pub descendant_count: bool,
    pub children_list: bool,
    pub descendants_list: bool,
}

impl CacheState {
    /// True when nothing is memoised.
    pub fn is_stale(&self) -> bool {
        !(self.child_count || self.descendant_count || self.children_list || self.descendants_list)
    }
}

impl NodeTree {
    /// Number of direct children.
    pub fn child_count(&self, id: NodeId) -> usize {
        let node = self.node(id);
        *node.cache.child_count.get_or_init(|| node.children.len())
    }

    /// Size of the subtree rooted at `id`, counting `id` itself.
    ///
    /// A leaf has a descendant count of 1.
    pub fn descendant_count(&self, id: NodeId) -> usize {
        let node = self.node(id);
        *node.cache.descendant_count.get_or_init(|| {
            1 + node
                .children
                .iter()
                .map(|child| self.descendant_count(*child))
                .sum::<usize>()
        })
    }

    /// Direct children, memoised.
    pub fn children_list(&self, id: NodeId) -> &[NodeId] {
        let node = self.node(id);
        node.cache.children.get_or_init(|| node.children.clone())
    }

    /// Every node of the subtree rooted at `id`, `id` first, in depth-first
    /// pre-order.
    pub fn descendants_list(&self, id: NodeId) -> &[NodeId] {
        let node = self.node(id);
        node.cache.descendants.get_or_init(|| {
            let mut flattened = Vec::with_capacity(self.descendant_count(id));
            flattened.push(id);
            for child in self.children_list(id) {
                flattened.extend_from_slice(self.descendants_list(*child));
            }
            flattened
        })
    }

    /// Mark one node's cached values stale. Does not touch ancestors.
    pub fn invalidate(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.cache.clear();
        }
    }

    /// Mark `id` and every ancestor of `id` stale.
    ///
    /// Called by every structural edit for the node whose child set changed.
    pub fn invalidate_upwards(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            self.invalidate(node_id);
            current = self.parent(node_id);
        }
    }

    /// Discard every cached value in the subtree and recompute bottom-up.
    pub fn recompute_all(&mut self, root: NodeId) {
        let order = self.post_order(root);
        for id in &order {
            self.invalidate(*id);
        }
        for id in &order {
            self.child_count(*id);
            self.descendant_count(*id);
            self.children_list(*id);
            self.descendants_list(*id);
        }
        tracing::debug!("Recomputed aggregates for {} node(s) under {}", order.len(), root);
    }

    pub fn cache_state(&self, id: NodeId) -> CacheState {
        self.node(id).cache.state()
    }

    /// Subtree in post-order, walked from the live child lists.
    fn post_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((id, visited)) = stack.pop() {
            if visited {
                order.push(id);
                continue;
            }
            stack.push((id, true));
            for child in self.children(id).iter().rev() {
                stack.push((*child, false));
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{Node, NodeKind};
    use crate::tree::NodeTree;

    fn sample_tree() -> (NodeTree, Vec<crate::models::NodeId>) {
        let mut tree = NodeTree::new();
        let root = tree.add_node(Node::new(NodeKind::Root, "root"));
        let a = tree.add_child(root, Node::new(NodeKind::JsonObject, "a")).unwrap();
        let b = tree.add_child(root, Node::new(NodeKind::JsonObject, "b")).unwrap();
        let a1 = tree.add_child(a, Node::new(NodeKind::JsonObject, "a1")).unwrap();
        let a2 = tree.add_child(a, Node::new(NodeKind::JsonObject, "a2")).unwrap();
        (tree, vec![root, a, b, a1, a2])
    }

    #[test]
    fn test_leaf_descendant_count_is_one() {
        let (tree, ids) = sample_tree();
        assert_eq!(tree.descendant_count(ids[2]), 1);
        assert_eq!(tree.child_count(ids[2]), 0);
        assert_eq!(tree.descendants_list(ids[2]), &[ids[2]]);
    }

    #[test]
    fn test_descendants_are_pre_order_and_self_inclusive() {
        let (tree, ids) = sample_tree();
        let (root, a, b, a1, a2) = (ids[0], ids[1], ids[2], ids[3], ids[4]);

        assert_eq!(tree.descendants_list(root), &[root, a, a1, a2, b]);
        assert_eq!(tree.descendant_count(root), 5);
        assert_eq!(tree.children_list(root), &[a, b]);
    }

    #[test]
    fn test_values_are_memoised_until_invalidated() {
        let (mut tree, ids) = sample_tree();
        let root = ids[0];

        assert!(tree.cache_state(root).is_stale());
        tree.descendant_count(root);
        let state = tree.cache_state(root);
        assert!(state.descendant_count);
        assert!(!state.descendants_list);

        tree.invalidate(root);
        assert!(tree.cache_state(root).is_stale());
        // Children keep their own values: invalidate does not cascade.
        assert!(tree.cache_state(ids[1]).descendant_count);
    }

    #[test]
    fn test_structural_edit_invalidates_ancestors() {
        let (mut tree, ids) = sample_tree();
        let (root, a, a1) = (ids[0], ids[1], ids[3]);

        assert_eq!(tree.descendant_count(root), 5);
        tree.add_child(a1, Node::new(NodeKind::JsonValue(crate::models::JsonValueType::Integer), "1"))
            .unwrap();

        assert!(tree.cache_state(root).is_stale());
        assert!(tree.cache_state(a).is_stale());
        assert_eq!(tree.descendant_count(root), 6);
        assert_eq!(tree.descendant_count(a), 4);
    }

    #[test]
    fn test_recompute_all_matches_sum_of_children() {
        let (mut tree, ids) = sample_tree();
        tree.recompute_all(ids[0]);

        for id in &ids {
            let state = tree.cache_state(*id);
            assert!(state.child_count && state.descendant_count);
            assert!(state.children_list && state.descendants_list);

            let expected = 1 + tree
                .children(*id)
                .iter()
                .map(|c| tree.descendant_count(*c))
                .sum::<usize>();
            assert_eq!(tree.descendant_count(*id), expected);
        }
    }
}
