// ModImporter - profile and directory layout resolution for game script mods
//
// This is the library crate containing the configuration core.
// The binary crate (main.rs) provides the command line entry point.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use config::ConfigStore;
pub use error::ConfigError;
pub use models::{Configuration, Profile};
pub use services::{ProfileRegistry, ProfileResolver};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
