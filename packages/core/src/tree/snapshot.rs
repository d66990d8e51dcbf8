//! Serializable recursive view of a subtree
//!
//! Snapshots compare equal when two subtrees have the same shape, kinds,
//! names, texts and aggregate counts, regardless of arena ids. Used for CLI
//! output and for structural comparisons in tests.

use crate::models::NodeId;
use crate::tree::NodeTree;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub kind: String,
    pub name: String,
    pub display_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    pub child_count: usize,
    pub descendant_count: usize,
    /// Children, or empty when the snapshot was cut off at this depth
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeTree {
    /// Full snapshot of the subtree rooted at `id`.
    pub fn snapshot(&self, id: NodeId) -> NodeSnapshot {
        self.snapshot_to_depth(id, usize::MAX)
    }

    /// Snapshot including at most `max_depth` levels below `id`.
    pub fn snapshot_to_depth(&self, id: NodeId, max_depth: usize) -> NodeSnapshot {
        let node = self.node(id);
        let children = if max_depth == 0 {
            Vec::new()
        } else {
            self.children(id)
                .iter()
                .map(|child| self.snapshot_to_depth(*child, max_depth - 1))
                .collect()
        };

        NodeSnapshot {
            kind: node.kind().tag().to_string(),
            name: node.name().to_string(),
            display_text: node.display_text().to_string(),
            tooltip: node.tooltip().map(str::to_string),
            child_count: self.child_count(id),
            descendant_count: self.descendant_count(id),
            children,
        }
    }
}

impl NodeSnapshot {
    /// Render as an indented text outline.
    pub fn to_outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, 0);
        out
    }

    fn write_outline(&self, out: &mut String, level: usize) {
        out.push_str(&"  ".repeat(level));
        out.push_str(&self.display_text);
        if self.child_count > 0 {
            out.push_str(&format!(
                " ({} children, {} total)",
                self.child_count, self.descendant_count
            ));
        }
        out.push('\n');
        for child in &self.children {
            child.write_outline(out, level + 1);
        }
    }
}
