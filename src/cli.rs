//! Command-line interface definitions.

use clap::{Args, Parser};

/// Resolve the installation profile and directory layout for a mod import.
#[derive(Parser, Debug)]
#[command(name = "modimporter", version, about, long_about = None)]
pub struct Cli {
    /// Location to treat as the running tool (defaults to this executable).
    #[arg(long, hide = true)]
    pub anchor: Option<String>,

    /// Log at debug level.
    #[arg(long, default_value = "false")]
    pub debug: bool,

    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

/// Arguments that overlay the loaded configuration.
///
/// Every field is optional; only the ones given on the command line are
/// applied (see [`Configuration::apply_command_line_arguments`](crate::models::Configuration::apply_command_line_arguments)).
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Config file to load, and the canonical path written by --modify-config.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<String>,

    /// Name of the file describing each mod.
    #[arg(long, value_name = "NAME")]
    pub mod_file: Option<String>,

    /// Hash algorithms for edit detection, space separated (e.g. "sha256 sha1").
    #[arg(long, value_name = "NAMES")]
    pub hashes: Option<String>,

    /// JSON object merged over the detected profile.
    #[arg(long, value_name = "JSON")]
    pub special_profile: Option<String>,

    /// Echo messages to the console.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub echo: Option<bool>,

    /// Write messages to a log file.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub log: Option<bool>,

    /// Allow asking for input at the console.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub input: Option<bool>,

    /// Remove deployed mods instead of installing.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub uninstall: Option<bool>,

    /// Write the configuration and exit.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub modify_config: Option<bool>,

    /// Replace the config file when writing instead of creating a timestamped copy.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub overwrite_config: Option<bool>,
}
