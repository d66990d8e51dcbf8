//! Utility functions for Hellion Explorer Core
//!
//! This module provides common utility functions used across the codebase.

mod display_name;

pub use display_name::{generate_display_name, scalar_text, FALLBACK_DISPLAY_NAME};
