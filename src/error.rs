//! Error types for configuration loading, profile resolution and path derivation.

use camino::Utf8PathBuf;
use std::io;
use thiserror::Error;

/// Errors raised by the configuration core.
///
/// Everything except [`ConfigError::MissingProfile`] is returned to the caller.
/// A missing profile is fatal for the binary (see
/// [`logging::exit_fatal`](crate::logging::exit_fatal)).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: Utf8PathBuf },

    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config document '{origin}': {source}")]
    Format {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write config file '{path}': {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Cannot resolve path '{path}': {source}")]
    PathResolution {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Anchor '{anchor}' has no game directory above it")]
    NoGameDirectory { anchor: Utf8PathBuf },

    #[error("Malformed special profile: {0}")]
    SpecialProfile(#[source] serde_json::Error),

    #[error("Hash algorithm list must not be empty")]
    EmptyHashList,

    #[error("Failed to read profile name from console: {0}")]
    Prompt(#[source] io::Error),

    #[error(
        "No folder profile could be resolved. Run from a supported game directory, pass --special-profile, or set `use_special_profile` and `special_profile` in {config_file}"
    )]
    MissingProfile { config_file: String },
}

impl ConfigError {
    /// True for the one error the tool cannot continue past.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ConfigError::MissingProfile { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_profile_names_config_file() {
        let err = ConfigError::MissingProfile {
            config_file: "my_config.json".to_string(),
        };
        assert!(err.to_string().contains("my_config.json"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_other_errors_not_fatal() {
        assert!(!ConfigError::EmptyHashList.is_fatal());
        let err = ConfigError::NotFound {
            path: Utf8PathBuf::from("config.json"),
        };
        assert!(!err.is_fatal());
    }
}
