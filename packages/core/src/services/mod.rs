//! Explorer Services
//!
//! This module contains the logic that turns loaded documents into views:
//!
//! - `JsonTreeMaterializer` - JSON value → node subtree, with depth-bounded
//!   placeholders and on-demand expansion
//! - `OrbitalGraphBuilder` - flat record arrays → solar-system hierarchy
//! - `rehydrate_docked_ships` - re-parents docked ships under their targets
//! - `SearchOperator` - substring search with per-operator result views
//! - `GameSession` - one open save owning both views and its searches
//!
//! Services work on a [`NodeTree`](crate::tree::NodeTree) passed in by the
//! caller and never perform I/O themselves.

pub mod docking_resolver;
pub mod error;
pub mod json_materializer;
pub mod orbital_builder;
pub mod search;
pub mod session;


pub use docking_resolver::{rehydrate_docked_ships, DockingReport};
pub use error::{ExpansionError, HierarchyError, SearchError, SessionError};
pub use json_materializer::JsonTreeMaterializer;
pub use orbital_builder::{
    parse_records, BuildReport, OrbitalGraphBuilder, RecordSet, SolarSystem, UnplacedRecord,
    DEFAULT_MAX_CELESTIAL_DEPTH, SOLAR_SYSTEM_ROOT_NAME,
};
pub use search::{SearchFlags, SearchOperator};
pub use session::{
    GameSession, SessionSources, SourceCategory, SourceDocument, View, GAME_DATA_ROOT_NAME,
    SAVE_FOLDER_NAME, STATIC_DATA_FOLDER_NAME,
};
