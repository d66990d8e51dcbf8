//! Data Models
//!
//! This module contains the core data structures used throughout the explorer:
//!
//! - `Node` - Universal tree node for every view (Game Data, Solar System, Search)
//! - `NodeKind` - Tagged node type with kind-specific payload
//! - `OrbitalData` / `OrbitData` - Solar-system attributes
//! - Record types deserialized from the flat save-data arrays

mod node;
pub mod orbital;
pub mod records;

pub use node::{CelestialClass, JsonValueType, Node, NodeId, NodeKind, SourceRef};
pub use orbital::{OrbitData, OrbitalData, ROOT_PARENT_GUID};
pub use records::{CelestialBodyRecord, DynamicObjectRecord, PlayerRecord, VesselRecord};
