//! # Configuration Crate
//!
//! Reads the database connection parameters from the process environment.
//!
//! Nothing here is global: `main` constructs an [`EnvSettings`] provider once
//! and hands it to the database gateway, which asks it for a fresh
//! [`DbSettings`] every time it needs to open a connection.

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{DbSettings, EnvSettings, SettingsProvider, ENV_PREFIX};
