//! JSON Tree Materializer
//!
//! Converts an arbitrary parsed JSON document into explorer nodes.
//!
//! # Depth Budget
//!
//! Large save files are materialised only down to a configured depth. A
//! container whose children would lie deeper than `max_depth` gets a single
//! `ExpansionPending` child carrying the true child count instead of being
//! recursed into. [`JsonTreeMaterializer::expand`] later replaces that
//! placeholder, in place, with the real children built under a fresh budget.
//!
//! # Naming
//!
//! - Members whose value is an object or array become that container, named
//!   by the member key
//! - Scalar members become `JsonProperty` leaves displayed as `key: value`
//! - Scalar array elements become `JsonValue` leaves
//! - Objects without a key are named by [`generate_display_name`]
//! - Arrays display their length: `Ships [12]`
//!
//! Children always keep the order of the source document.

use crate::models::{JsonValueType, Node, NodeId, NodeKind, SourceRef};
use crate::services::error::ExpansionError;
use crate::tree::{NodeTree, TreeError};
use crate::utils::{generate_display_name, scalar_text};
use serde_json::Value;

/// Name given to arrays that are not members of an object.
const UNNAMED_ARRAY: &str = "Array";

/// Name of expansion placeholders.
const PLACEHOLDER_NAME: &str = "...";

/// Builds explorer nodes from JSON values
pub struct JsonTreeMaterializer;

impl JsonTreeMaterializer {
    /// Materialise the value referenced by `source` as a detached subtree.
    ///
    /// # Arguments
    ///
    /// * `max_depth` - Deepest level (relative to the value at depth 0) whose
    ///   nodes are built eagerly; use `usize::MAX` for no limit
    /// * `current_depth` - Depth of the value itself
    /// * `name_hint` - Name for the node (e.g. file or member name); empty to
    ///   derive one from the value
    /// * `collapse_arrays` - Collapse single-container arrays into their
    ///   element
    ///
    /// # Returns
    ///
    /// `None` when the source does not resolve or is `null`. Callers must
    /// substitute an [`error_node`](Self::error_node) rather than drop the
    /// subtree.
    pub fn build(
        tree: &mut NodeTree,
        source: &SourceRef,
        max_depth: usize,
        current_depth: usize,
        name_hint: &str,
        collapse_arrays: bool,
    ) -> Option<NodeId> {
        let value = source.resolve()?;
        if value.is_null() {
            return None;
        }

        let builder = Builder {
            max_depth,
            collapse_arrays,
        };
        Some(builder.build_value(tree, source.clone(), value, current_depth, name_hint))
    }

    /// Sentinel node for a source that could not be loaded.
    pub fn error_node(tree: &mut NodeTree, name: &str, message: &str) -> NodeId {
        let node = Node::new(NodeKind::LoadError(message.to_string()), name)
            .with_display_text(format!("{} [loading error]", name))
            .with_tooltip(message);
        tree.add_node(node)
    }

    /// Replace an `ExpansionPending` placeholder with the real children of
    /// its container, built with a fresh depth budget of `budget` levels.
    ///
    /// Siblings of the placeholder keep their positions. Returns the ids of
    /// the new children in order.
    pub fn expand(
        tree: &mut NodeTree,
        placeholder: NodeId,
        budget: usize,
    ) -> Result<Vec<NodeId>, ExpansionError> {
        let node = tree
            .get(placeholder)
            .ok_or_else(|| TreeError::node_not_found(placeholder))?;
        let NodeKind::ExpansionPending {
            collapse_arrays, ..
        } = *node.kind()
        else {
            return Err(ExpansionError::not_a_placeholder(placeholder));
        };
        if node.parent().is_none() {
            return Err(TreeError::detached(placeholder).into());
        }

        let source = node
            .source()
            .cloned()
            .ok_or_else(|| ExpansionError::source_unavailable(placeholder))?;
        let value = source
            .resolve()
            .ok_or_else(|| ExpansionError::source_unavailable(placeholder))?;

        let builder = Builder {
            max_depth: budget.max(1),
            collapse_arrays,
        };
        let children = builder.build_children(tree, &source, value, 0);
        tree.replace_child(placeholder, &children)?;

        tracing::debug!(
            "Expanded placeholder {} at '{}' into {} node(s)",
            placeholder,
            source.pointer(),
            children.len()
        );
        Ok(children)
    }

    /// Expand every placeholder under `root` until none remain.
    ///
    /// Returns the number of placeholders expanded.
    pub fn expand_all(
        tree: &mut NodeTree,
        root: NodeId,
        budget: usize,
    ) -> Result<usize, ExpansionError> {
        let mut expanded = 0;
        loop {
            let pending: Vec<NodeId> = tree
                .descendants_list(root)
                .iter()
                .copied()
                .filter(|id| tree.node(*id).kind().is_expansion_pending())
                .collect();
            if pending.is_empty() {
                return Ok(expanded);
            }
            for placeholder in pending {
                Self::expand(tree, placeholder, budget)?;
                expanded += 1;
            }
        }
    }
}

/// Per-call materialisation settings.
struct Builder {
    max_depth: usize,
    collapse_arrays: bool,
}

impl Builder {
    fn build_value(
        &self,
        tree: &mut NodeTree,
        source: SourceRef,
        value: &Value,
        depth: usize,
        name_hint: &str,
    ) -> NodeId {
        match value {
            Value::Object(map) => {
                let name = if name_hint.is_empty() {
                    generate_display_name(map)
                } else {
                    name_hint.to_string()
                };
                let node = Node::new(NodeKind::JsonObject, name)
                    .with_tooltip(pointer_label(&source))
                    .with_source(source.clone());
                let id = tree.add_node(node);
                self.populate(tree, id, &source, value, depth);
                id
            }
            Value::Array(items) => {
                if self.collapse_arrays && items.len() == 1 && is_container(&items[0]) {
                    let element = source.child_index(0);
                    return self.build_value(tree, element, &items[0], depth, name_hint);
                }

                let name = if name_hint.is_empty() {
                    UNNAMED_ARRAY
                } else {
                    name_hint
                };
                let node = Node::new(NodeKind::JsonArray, name)
                    .with_display_text(format!("{} [{}]", name, items.len()))
                    .with_tooltip(pointer_label(&source))
                    .with_source(source.clone());
                let id = tree.add_node(node);
                self.populate(tree, id, &source, value, depth);
                id
            }
            scalar => {
                let value_type = JsonValueType::of(scalar).unwrap_or(JsonValueType::Null);
                let text = scalar_text(scalar);
                let node = if name_hint.is_empty() {
                    Node::new(NodeKind::JsonValue(value_type), text)
                } else {
                    Node::new(NodeKind::JsonProperty(value_type), name_hint)
                        .with_display_text(format!("{}: {}", name_hint, text))
                };
                tree.add_node(node.with_tooltip(value_type.label()).with_source(source))
            }
        }
    }

    /// Attach the children of the container `value` (built at `depth`) to
    /// `parent`.
    fn populate(
        &self,
        tree: &mut NodeTree,
        parent: NodeId,
        source: &SourceRef,
        value: &Value,
        depth: usize,
    ) {
        for child in self.build_children(tree, source, value, depth) {
            tree.attach_fresh(parent, child);
        }
    }

    /// Build the children of the container `value` sitting at `depth`, as
    /// detached nodes in source order.
    ///
    /// When the children would lie beyond `max_depth`, a single placeholder
    /// is returned instead.
    fn build_children(
        &self,
        tree: &mut NodeTree,
        source: &SourceRef,
        value: &Value,
        depth: usize,
    ) -> Vec<NodeId> {
        let count = match value {
            Value::Object(map) => map.len(),
            Value::Array(items) => items.len(),
            _ => 0,
        };
        if count == 0 {
            return Vec::new();
        }

        if depth >= self.max_depth {
            let placeholder = Node::new(
                NodeKind::ExpansionPending {
                    pending: count,
                    collapse_arrays: self.collapse_arrays,
                },
                PLACEHOLDER_NAME,
            )
            .with_display_text(format!("Expand {} more item(s)", count))
            .with_source(source.clone());
            return vec![tree.add_node(placeholder)];
        }

        match value {
            Value::Object(map) => map
                .iter()
                .map(|(key, child)| {
                    self.build_value(tree, source.child_key(key), child, depth + 1, key)
                })
                .collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, child)| {
                    self.build_value(tree, source.child_index(index), child, depth + 1, "")
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

fn pointer_label(source: &SourceRef) -> String {
    if source.pointer().is_empty() {
        "/".to_string()
    } else {
        source.pointer().to_string()
    }
}
