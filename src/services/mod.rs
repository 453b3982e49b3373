//! Services module - profile selection and directory derivation.
//!
//! # Components
//!
//! - [`path_resolver`]: Turns the anchor path plus relative offsets into the
//!   scope, cache, deploy, logs and mods directories without touching them
//! - [`ProfileRegistry`]: Built-in folder profiles keyed by game directory name
//! - [`ProfileResolver`]: Picks the active profile from a special profile, the
//!   detected game, or a name typed at the console
//!
//! Nothing here reads or writes files; persistence lives in
//! [`ConfigStore`](crate::config::ConfigStore).

pub mod path_resolver;
pub mod profile_registry;
pub mod profile_resolver;

pub use profile_registry::{DEFAULT_PROFILES, ProfileRegistry};
pub use profile_resolver::{ProfilePrompt, ProfileResolver, ProfileSource, StdinPrompt};
