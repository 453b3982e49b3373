//! ModImporter - command line entry point.
//!
//! # Execution Flow
//!
//! 1. Parse the command line
//! 2. Determine the anchor (this executable, or `--anchor`)
//! 3. Load the config file (`config.json` in the working directory unless
//!    `--config` names another); a missing default file means defaults
//! 4. Overlay command line arguments
//! 5. Initialize logging from the `echo`/`log` flags
//! 6. With `--modify-config`, write the configuration and stop
//! 7. Resolve the folder profile; exits with status 1 if none can be found
//! 8. Record the resolved directories in the profile and report them
//!
//! The tool is expected to live two levels below the game directory, e.g.
//! `<game>/Content/modimporter`.

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use modimporter::cli::Cli;
use modimporter::models::DEFAULT_CONFIG_FILE;
use modimporter::services::StdinPrompt;
use modimporter::{APP_NAME, ConfigStore, ProfileResolver, VERSION};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let anchor = match &cli.anchor {
        Some(anchor) => Utf8PathBuf::from(anchor),
        None => {
            let exe = std::env::current_exe().context("Failed to locate the running executable")?;
            Utf8PathBuf::try_from(exe).context("Executable path is not valid UTF-8")?
        }
    };

    let store = ConfigStore::in_current_dir()?;
    let mut config = match cli.overrides.config_file.as_deref() {
        Some(file_name) => store.load_from_file(file_name, &anchor)?,
        None => store.load_or_default(DEFAULT_CONFIG_FILE, &anchor)?,
    };
    config
        .apply_command_line_arguments(&cli.overrides)
        .context("Invalid command line arguments")?;

    let guard = modimporter::logging::setup_logging(&config, cli.debug)?;
    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    if config.modify_config {
        let path = store.dump_to_file(&config)?;
        tracing::info!("Configuration written to {}", path);
        return Ok(());
    }

    let source = match ProfileResolver::default().resolve(&mut config, &mut StdinPrompt) {
        Err(err) if err.is_fatal() => modimporter::logging::exit_fatal(&err, config.echo, guard),
        other => other?,
    };
    tracing::info!(
        "Profile {} selected ({:?})",
        config.chosen_profile.as_deref().unwrap_or("<unnamed>"),
        source
    );

    config.record_directories()?;

    tracing::info!("Scope: {}", config.scope_dir()?);
    tracing::info!("Mods: {}", config.mods_dir()?);
    tracing::info!("Deploy: {}", config.deploy_dir()?);
    tracing::info!("Base cache: {}", config.base_cache_dir()?);
    tracing::info!("Edit cache: {}", config.edit_cache_dir()?);
    tracing::info!(
        "Hash algorithms: {}, edited suffix: {}",
        config.hash_algorithms.join(" "),
        config.edited_suffix
    );
    if config.uninstall {
        tracing::info!("Uninstall requested");
    }

    drop(guard);
    Ok(())
}
