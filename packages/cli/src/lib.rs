//! Hellion Explorer command-line driver
//!
//! Plays the roles the core leaves to its host: reading files, loading
//! settings and printing views.
//!
//! - [`loader`] - Reads and parses source documents concurrently
//! - [`settings`] - Locates and loads the configuration file
//! - [`commands`] - Renders trees, search results and statistics

pub mod commands;
pub mod loader;
pub mod settings;

pub use loader::{load_sources, LoadError};
pub use settings::{default_config_path, load_config};
