//! Search Operators
//!
//! A [`SearchOperator`] runs a substring query over every node below (and
//! including) a starting node. Results are a snapshot taken at `execute`
//! time: later edits to the searched tree do not change them until the
//! operator is executed again.
//!
//! Each operator also keeps its own small presentation tree, a
//! `SearchResultSet` root with one `SearchResult` entry per hit, so several
//! operators (the persistent "Find" plus any saved searches) can be shown
//! side by side without touching the searched tree.

use crate::models::{Node, NodeId, NodeKind};
use crate::services::error::SearchError;
use crate::tree::NodeTree;
use serde::{Deserialize, Serialize};

/// Matching options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFlags {
    /// Compare case-sensitively
    pub match_case: bool,
    /// Match against the root-to-node path instead of name, text and type
    pub by_path: bool,
}

/// One query over one subtree
#[derive(Debug)]
pub struct SearchOperator {
    start: NodeId,
    flags: SearchFlags,
    query: Option<String>,
    results: Option<Vec<NodeId>>,
    presentation: NodeTree,
    presentation_root: NodeId,
}

impl SearchOperator {
    pub fn new(start: NodeId, flags: SearchFlags) -> Self {
        let (presentation, presentation_root) = empty_presentation();
        Self {
            start,
            flags,
            query: None,
            results: None,
            presentation,
            presentation_root,
        }
    }

    /// Operator with its query already set.
    pub fn with_query(start: NodeId, flags: SearchFlags, query: impl Into<String>) -> Self {
        let mut operator = Self::new(start, flags);
        operator.set_query(query);
        operator
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn flags(&self) -> SearchFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: SearchFlags) {
        self.flags = flags;
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Set the query text. Takes effect on the next [`execute`](Self::execute).
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = Some(query.into());
    }

    pub fn clear_query(&mut self) {
        self.query = None;
    }

    /// Run the query over the starting node's subtree in `tree`.
    ///
    /// An empty result set is a success. Blank queries count as unset.
    /// A failed execution discards the previous results.
    pub fn execute(&mut self, tree: &NodeTree) -> Result<(), SearchError> {
        let Some(query) = self.query.clone().filter(|query| !query.trim().is_empty()) else {
            self.reset();
            return Err(SearchError::NoQuerySet);
        };
        if !tree.contains(self.start) {
            let id = self.start;
            self.reset();
            return Err(SearchError::StartingNodeNotFound { id });
        }

        let matcher = Matcher::new(&query, self.flags);
        let results: Vec<NodeId> = tree
            .descendants_list(self.start)
            .iter()
            .copied()
            .filter(|id| matcher.matches(tree, *id))
            .collect();

        tracing::debug!(
            "Search '{}' from {} matched {} node(s)",
            query,
            self.start,
            results.len()
        );

        let (presentation, root) = present(tree, &query, &results);
        self.presentation = presentation;
        self.presentation_root = root;
        self.results = Some(results);
        Ok(())
    }

    /// Hits of the last successful execution, in depth-first order.
    pub fn results(&self) -> Result<&[NodeId], SearchError> {
        self.results.as_deref().ok_or(SearchError::NotExecuted)
    }

    pub fn is_executed(&self) -> bool {
        self.results.is_some()
    }

    /// The operator's own result view.
    pub fn presentation(&self) -> &NodeTree {
        &self.presentation
    }

    pub fn presentation_root(&self) -> NodeId {
        self.presentation_root
    }

    fn reset(&mut self) {
        let (presentation, root) = empty_presentation();
        self.results = None;
        self.presentation = presentation;
        self.presentation_root = root;
    }
}

fn empty_presentation() -> (NodeTree, NodeId) {
    let mut presentation = NodeTree::new();
    let root = presentation.add_node(Node::new(NodeKind::SearchResultSet, "Search"));
    (presentation, root)
}

/// Query text normalised for the configured case rule.
struct Matcher {
    needle: String,
    flags: SearchFlags,
}

impl Matcher {
    fn new(query: &str, flags: SearchFlags) -> Self {
        let needle = if flags.match_case {
            query.to_string()
        } else {
            query.to_lowercase()
        };
        Self { needle, flags }
    }

    fn contains(&self, haystack: &str) -> bool {
        if self.flags.match_case {
            haystack.contains(&self.needle)
        } else {
            haystack.to_lowercase().contains(&self.needle)
        }
    }

    fn matches(&self, tree: &NodeTree, id: NodeId) -> bool {
        if self.flags.by_path {
            return self.contains(&tree.path(id));
        }
        let node = tree.node(id);
        self.contains(node.name())
            || self.contains(node.display_text())
            || self.contains(node.kind().tag())
    }
}

/// Build the result view for one execution.
fn present(tree: &NodeTree, query: &str, results: &[NodeId]) -> (NodeTree, NodeId) {
    let mut presentation = NodeTree::new();
    let title = format!("Search: \"{}\"", query);
    let root = presentation.add_node(
        Node::new(NodeKind::SearchResultSet, title.clone())
            .with_display_text(format!("{} ({})", title, results.len())),
    );

    for hit in results {
        let target = tree.node(*hit);
        let mut entry = Node::new(NodeKind::SearchResult(*hit), target.name())
            .with_display_text(target.display_text())
            .with_tooltip(tree.path(*hit));
        if let Some(source) = target.source() {
            entry = entry.with_source(source.clone());
        }
        presentation.push_new_child(root, entry);
    }
    (presentation, root)
}
