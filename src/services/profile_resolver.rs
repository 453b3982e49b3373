//! Selection of the active folder profile.
//!
//! Precedence, first match wins:
//! 1. A special profile (`use_special_profile` set and a fragment supplied)
//!    merged over the registry entry for the detected game.
//! 2. The registry entry for the detected game name.
//! 3. A profile name typed at the console, looked up in the registry, with
//!    any supplied special profile merged over it.
//!
//! If all three fail the tool has no directory layout to work with; that is
//! [`ConfigError::MissingProfile`], which the binary ends the run on through
//! [`logging::exit_fatal`](crate::logging::exit_fatal).

use crate::error::ConfigError;
use crate::models::{Configuration, Profile};
use crate::services::profile_registry::{DEFAULT_PROFILES, ProfileRegistry};
use std::io::{self, BufRead, Write};

pub const PROFILE_PROMPT: &str = "Type the name of a profile, or leave empty to cancel:\n\t> ";

/// Blocking console question. An empty answer means cancel.
#[cfg_attr(test, mockall::automock)]
pub trait ProfilePrompt {
    fn ask(&mut self, message: &str) -> io::Result<String>;
}

/// Asks on stdout and reads one line from stdin. End of input reads as empty.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl ProfilePrompt for StdinPrompt {
    fn ask(&mut self, message: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(message.as_bytes())?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer)
    }
}

/// Which rule produced the active profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    Special,
    Detected,
    Interactive,
}

#[derive(Debug, Clone, Copy)]
pub struct ProfileResolver<'a> {
    registry: &'a ProfileRegistry,
}

impl Default for ProfileResolver<'static> {
    fn default() -> Self {
        Self::new(&DEFAULT_PROFILES)
    }
}

impl<'a> ProfileResolver<'a> {
    pub fn new(registry: &'a ProfileRegistry) -> Self {
        Self { registry }
    }

    /// Set `chosen_profile` and `active_profile` on `config`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingProfile`] when no rule yields a known profile
    /// - [`ConfigError::Prompt`] when the console cannot be read
    pub fn resolve(
        &self,
        config: &mut Configuration,
        prompt: &mut dyn ProfilePrompt,
    ) -> Result<ProfileSource, ConfigError> {
        let game_name = config.game_name().map(str::to_owned);

        if config.use_special_profile {
            if let Some(special) = &config.special_profile {
                let base = game_name
                    .as_deref()
                    .and_then(|name| self.registry.lookup(name))
                    .cloned()
                    .unwrap_or_default();
                config.active_profile = base.merged_with(special);
                config.chosen_profile = game_name;
                tracing::info!(
                    "Using special profile over {}",
                    config.chosen_profile.as_deref().unwrap_or("no detected game")
                );
                return Ok(ProfileSource::Special);
            }
            tracing::debug!("use_special_profile is set but no special profile was supplied");
        }

        if let Some(name) = game_name {
            if let Some(profile) = self.registry.lookup(&name) {
                tracing::info!("Detected game profile: {}", name);
                config.active_profile = profile.clone();
                config.chosen_profile = Some(name);
                return Ok(ProfileSource::Detected);
            }
            tracing::debug!("Game directory {} has no built-in profile", name);
        }

        self.resolve_interactively(config, prompt)
    }

    fn resolve_interactively(
        &self,
        config: &mut Configuration,
        prompt: &mut dyn ProfilePrompt,
    ) -> Result<ProfileSource, ConfigError> {
        let missing = || ConfigError::MissingProfile {
            config_file: config.config_file_name.clone(),
        };

        if !config.input {
            tracing::debug!("Console input disabled, not asking for a profile");
            return Err(missing());
        }

        let known: Vec<_> = self.registry.names().collect();
        tracing::info!("Known profiles: {}", known.join(", "));

        let answer = prompt.ask(PROFILE_PROMPT).map_err(ConfigError::Prompt)?;
        let name = answer.trim();
        if name.is_empty() {
            tracing::debug!("Profile selection cancelled");
            return Err(missing());
        }

        let Some(profile) = self.registry.lookup(name) else {
            tracing::warn!("Unknown profile: {}", name);
            return Err(missing());
        };

        config.active_profile = merge_fragment(profile, config.special_profile.as_ref());
        config.chosen_profile = Some(name.to_string());
        tracing::info!("Using profile chosen at the console: {}", name);
        Ok(ProfileSource::Interactive)
    }
}

/// Registry entry merged with an optional caller fragment.
pub fn merge_fragment(base: &Profile, special: Option<&Profile>) -> Profile {
    match special {
        Some(special) => base.merged_with(special),
        None => base.clone(),
    }
}
