use crate::cli::ConfigOverrides;
use crate::error::ConfigError;
use crate::models::{ConfigDocument, Configuration, Profile};
use crate::services::path_resolver;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};

/// Loads and saves the JSON configuration document.
///
/// Relative config file names are taken relative to `config_dir` (the
/// working directory for the binary). Saving never replaces an existing
/// file unless the configuration has `overwrite_config` set.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_dir: Utf8PathBuf,
}

impl ConfigStore {
    /// Create a store rooted at `config_dir`. Nothing is created on disk.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Self {
        Self {
            config_dir: config_dir.as_ref().to_path_buf(),
        }
    }

    /// Store rooted at the current working directory
    pub fn in_current_dir() -> Result<Self, ConfigError> {
        Ok(Self::new(path_resolver::current_dir()?))
    }

    /// Where `file_name` lives for this store
    pub fn path_for(&self, file_name: &str) -> Utf8PathBuf {
        self.config_dir.join(file_name)
    }

    /// The canonical config file of `config`
    pub fn canonical_path(&self, config: &Configuration) -> Utf8PathBuf {
        self.path_for(&config.config_file_name)
    }

    /// Load a configuration document for the tool at `anchor`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NotFound`] if the file does not exist
    /// - [`ConfigError::Format`] if it is not a JSON object of the expected shape
    pub fn load_from_file<P: AsRef<Utf8Path>>(
        &self,
        file_name: &str,
        anchor: P,
    ) -> Result<Configuration, ConfigError> {
        let path = self.path_for(file_name);

        let contents = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound { path: path.clone() }
            } else {
                ConfigError::Read {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let value: serde_json::Value =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Format {
                origin: path.to_string(),
                source,
            })?;
        let serde_json::Value::Object(overrides) = value else {
            return Err(ConfigError::Format {
                origin: path.to_string(),
                source: serde::de::Error::custom("top level must be a JSON object"),
            });
        };

        let document: ConfigDocument = serde_json::from_value(serde_json::Value::Object(overrides))
            .map_err(|source| ConfigError::Format {
                origin: path.to_string(),
                source,
            })?;
        let config = Configuration::from_document(anchor, document)?;

        tracing::info!("Loaded config from {}", path);
        Ok(config)
    }

    /// Load `file_name` if it exists, otherwise start from defaults.
    pub fn load_or_default<P: AsRef<Utf8Path>>(
        &self,
        file_name: &str,
        anchor: P,
    ) -> Result<Configuration, ConfigError> {
        match self.load_from_file(file_name, anchor.as_ref()) {
            Err(ConfigError::NotFound { path }) => {
                tracing::warn!("Config file not found at {}, using defaults", path);
                let mut config = Configuration::new(anchor)?;
                config.config_file_name = file_name.to_string();
                Ok(config)
            }
            other => other,
        }
    }

    /// Write `config` as 2-space indented JSON and return the path written.
    ///
    /// With `overwrite_config` the canonical config file is replaced.
    /// Otherwise a new `<config_file><timestamp>` file is created next to it;
    /// an existing file is never touched.
    pub fn dump_to_file(&self, config: &Configuration) -> Result<Utf8PathBuf, ConfigError> {
        let mut contents = serde_json::to_string_pretty(config).map_err(ConfigError::Serialize)?;
        contents.push('\n');

        if config.overwrite_config {
            let path = self.canonical_path(config);
            fs::write(&path, &contents).map_err(|source| ConfigError::Write {
                path: path.clone(),
                source,
            })?;
            tracing::info!("Saved config to {}", path);
            return Ok(path);
        }

        let stem = format!("{}{}", config.config_file_name, timestamp());
        let mut attempt = 0u32;
        loop {
            let path = if attempt == 0 {
                self.path_for(&stem)
            } else {
                self.path_for(&format!("{stem}-{attempt}"))
            };

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(contents.as_bytes())
                        .map_err(|source| ConfigError::Write {
                            path: path.clone(),
                            source,
                        })?;
                    tracing::info!("Saved config copy to {}", path);
                    return Ok(path);
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::debug!("{} already exists, trying next name", path);
                    attempt += 1;
                }
                Err(source) => return Err(ConfigError::Write { path, source }),
            }
        }
    }
}

/// Local time down to microseconds, safe for file names
fn timestamp() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S%.6f").to_string()
}

impl Configuration {
    /// Overlay the arguments given on the command line.
    ///
    /// A non-empty `special_profile` is parsed as a JSON object and turns on
    /// `use_special_profile`. `hashes` is split on whitespace and replaces the
    /// algorithm list; it must name at least one algorithm.
    pub fn apply_command_line_arguments(
        &mut self,
        args: &ConfigOverrides,
    ) -> Result<(), ConfigError> {
        if let Some(raw) = args.special_profile.as_deref().filter(|raw| !raw.trim().is_empty()) {
            let fragment: Profile =
                serde_json::from_str(raw).map_err(ConfigError::SpecialProfile)?;
            self.special_profile = Some(fragment);
            self.use_special_profile = true;
            tracing::debug!("Special profile supplied on the command line");
        }

        if let Some(raw) = args.hashes.as_deref() {
            let hashes: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
            if hashes.is_empty() {
                return Err(ConfigError::EmptyHashList);
            }
            self.hash_algorithms = hashes;
        }

        if let Some(config_file) = &args.config_file {
            self.config_file_name = config_file.clone();
        }
        if let Some(mod_file) = &args.mod_file {
            self.mod_file_name = mod_file.clone();
        }

        let flags = [
            (&mut self.echo, args.echo),
            (&mut self.log, args.log),
            (&mut self.input, args.input),
            (&mut self.uninstall, args.uninstall),
            (&mut self.modify_config, args.modify_config),
            (&mut self.overwrite_config, args.overwrite_config),
        ];
        for (field, value) in flags {
            if let Some(value) = value {
                *field = value;
            }
        }

        Ok(())
    }
}
