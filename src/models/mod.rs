//! Data models for the mod importer configuration.
//!
//! - [`Configuration`]: The per-run configuration aggregate: flags, file name
//!   conventions, hash algorithms, directory offsets, the active profile and
//!   the memoized directories derived from the anchor path
//! - [`ConfigDocument`]: Allow-list of keys accepted from a JSON config document
//! - [`Profile`]: A folder profile (default targets and directory hints) for one game

pub mod config;
pub mod profile;

pub use config::{ConfigDocument, Configuration, DEFAULT_CONFIG_FILE};
pub use profile::Profile;
