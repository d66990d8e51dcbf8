//! Service Layer Error Types
//!
//! This module defines error types for the materializer, the orbital builder
//! and docking resolver, search operators and the document session.

use crate::config::ConfigError;
use crate::models::NodeId;
use crate::tree::TreeError;
use thiserror::Error;

/// Errors from on-demand expansion of placeholder nodes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpansionError {
    /// Node is not an `ExpansionPending` placeholder
    #[error("Node {id} is not an expansion placeholder")]
    NotAPlaceholder { id: NodeId },

    /// Placeholder's source value can no longer be resolved
    #[error("Source value for node {id} is no longer available")]
    SourceUnavailable { id: NodeId },

    #[error("Tree edit failed: {0}")]
    Tree(#[from] TreeError),
}

impl ExpansionError {
    pub fn not_a_placeholder(id: NodeId) -> Self {
        Self::NotAPlaceholder { id }
    }

    pub fn source_unavailable(id: NodeId) -> Self {
        Self::SourceUnavailable { id }
    }
}

/// Errors while building or rehydrating the orbital hierarchy
///
/// Any of these aborts construction of the whole document: a structurally
/// ambiguous tree is never exposed.
#[derive(Error, Debug)]
pub enum HierarchyError {
    /// Record set pointer resolves to something other than an array
    #[error("Record set '{set}' at '{pointer}' is not an array")]
    NotAnArray { set: String, pointer: String },

    /// A record could not be deserialized
    #[error("Invalid record {index} in '{set}': {source}")]
    InvalidRecord {
        set: String,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Two celestial bodies, ships or asteroids share a GUID
    #[error("Duplicate GUID {guid} in '{set}'")]
    DuplicateGuid { set: String, guid: i64 },

    /// Celestial parent chain deeper than the configured guard
    #[error("Celestial body {guid} exceeds the maximum hierarchy depth of {limit}")]
    DepthLimitExceeded { guid: i64, limit: usize },

    /// Docking target GUID matches no node
    #[error("Node {guid} is docked to {target}, which does not exist")]
    DanglingDockingReference { guid: i64, target: i64 },

    /// Docking target GUID matches more than one node
    #[error("Node {guid} is docked to {target}, which matches {matches} nodes")]
    AmbiguousDockingReference {
        guid: i64,
        target: i64,
        matches: usize,
    },

    /// Docking target lies inside the docked node's own subtree
    #[error("Node {guid} is docked to {target}, which is docked to it in turn")]
    CyclicDocking { guid: i64, target: i64 },

    #[error("Tree edit failed: {0}")]
    Tree(#[from] TreeError),
}

impl HierarchyError {
    pub fn not_an_array(set: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self::NotAnArray {
            set: set.into(),
            pointer: pointer.into(),
        }
    }

    pub fn invalid_record(set: impl Into<String>, index: usize, source: serde_json::Error) -> Self {
        Self::InvalidRecord {
            set: set.into(),
            index,
            source,
        }
    }

    pub fn duplicate_guid(set: impl Into<String>, guid: i64) -> Self {
        Self::DuplicateGuid {
            set: set.into(),
            guid,
        }
    }

    /// True for errors raised by the docking pass.
    pub fn is_docking_error(&self) -> bool {
        matches!(
            self,
            Self::DanglingDockingReference { .. }
                | Self::AmbiguousDockingReference { .. }
                | Self::CyclicDocking { .. }
        )
    }
}

/// Search misuse. Recoverable; callers check before reading results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("No search query set")]
    NoQuerySet,

    #[error("Search has not been executed")]
    NotExecuted,

    #[error("Search starting node not found: {id}")]
    StartingNodeNotFound { id: NodeId },
}

/// Document session errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Required source document missing: {name}")]
    MissingSource { name: String },

    #[error("Source document '{name}' failed to load: {message}")]
    SourceUnavailable { name: String, message: String },

    #[error("Solar system build failed: {0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("Expansion failed: {0}")]
    Expansion(#[from] ExpansionError),

    #[error("Game Data view build failed: {0}")]
    Tree(#[from] TreeError),

    #[error("Search failed: {0}")]
    Search(#[from] SearchError),

    #[error("No saved search with id {id}")]
    UnknownSearch { id: usize },
}

impl SessionError {
    pub fn missing_source(name: impl Into<String>) -> Self {
        Self::MissingSource { name: name.into() }
    }

    pub fn source_unavailable(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            name: name.into(),
            message: message.into(),
        }
    }
}
