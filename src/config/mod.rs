//! Configuration module for Hearth Budget
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::HearthPaths;
pub use settings::Settings;
