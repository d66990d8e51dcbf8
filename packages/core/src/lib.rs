//! Hellion Explorer Core
//!
//! This crate provides the object model, view construction and search for
//! exploring HELLION save data: a save file plus the game's static data
//! definitions, presented as browsable trees.
//!
//! # Architecture
//!
//! - **Arena tree**: every view is a [`NodeTree`](tree::NodeTree) of uniform
//!   nodes addressed by [`NodeId`](models::NodeId); re-parenting is an index
//!   edit and cycles are rejected up front
//! - **Tagged nodes**: [`NodeKind`](models::NodeKind) carries kind-specific
//!   payload (orbital elements, JSON scalar category, pending counts)
//! - **Lazy aggregates**: child/descendant counts and flattened lists are
//!   memoised per node and invalidated upwards on every structural edit
//! - **Borrowed JSON**: nodes reference the parsed documents through
//!   [`SourceRef`](models::SourceRef) instead of copying them
//!
//! # Modules
//!
//! - [`models`] - Node, node kinds, orbital data and save records
//! - [`tree`] - Arena tree, aggregate cache, snapshots
//! - [`services`] - Materializer, orbital builder, docking, search, session
//! - [`config`] - Explorer configuration
//! - [`utils`] - Display-name helpers

pub mod config;
pub mod models;
pub mod services;
pub mod tree;
pub mod utils;

// Re-export commonly used types
pub use config::{ConfigError, ExplorerConfig, SourceLayout};
pub use models::*;
pub use services::*;
pub use tree::{NodeSnapshot, NodeTree, TreeError, PATH_SEPARATOR};
