use crate::error::ConfigError;
use crate::models::Profile;
use crate::services::path_resolver::{self, DirectoryCache, memoized};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// The configuration for one run of the importer.
///
/// Built once at startup from defaults, then optionally overlaid by a config
/// file and by command line arguments, then given a profile. Serializes to
/// the JSON config document; the memoized directories are not part of it.
#[derive(Debug, Clone, Serialize)]
pub struct Configuration {
    #[serde(rename = "this_file")]
    anchor_path: Utf8PathBuf,

    #[serde(rename = "config_file")]
    pub config_file_name: String,
    #[serde(rename = "mod_file")]
    pub mod_file_name: String,
    pub edited_suffix: String,

    #[serde(rename = "hashes")]
    pub hash_algorithms: Vec<String>,

    pub echo: bool,
    pub log: bool,
    pub input: bool,

    pub uninstall: bool,
    pub modify_config: bool,
    pub overwrite_config: bool,

    pub logs_prefix: String,
    pub logs_suffix: String,

    pub scope_rel_path: String,

    pub base_cache_rel_dir: String,
    /// Must stay inside the game's scope for deployed files to load
    pub deploy_rel_dir: String,
    pub edit_cache_rel_dir: String,
    pub logs_rel_dir: String,
    pub mods_rel_dir: String,

    pub chosen_profile: Option<String>,

    #[serde(rename = "profile")]
    pub active_profile: Profile,

    pub use_special_profile: bool,
    pub special_profile: Option<Profile>,

    #[serde(skip)]
    directories: DirectoryCache,
}

/// Allow-list of keys accepted from a config document.
///
/// Every field is optional; keys not listed here are dropped during
/// deserialization. `this_file` is deliberately absent: the anchor always
/// comes from the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigDocument {
    pub config_file: Option<String>,
    pub mod_file: Option<String>,
    pub edited_suffix: Option<String>,
    pub hashes: Option<Vec<String>>,
    pub echo: Option<bool>,
    pub log: Option<bool>,
    pub input: Option<bool>,
    pub uninstall: Option<bool>,
    pub modify_config: Option<bool>,
    pub overwrite_config: Option<bool>,
    pub logs_prefix: Option<String>,
    pub logs_suffix: Option<String>,
    pub scope_rel_path: Option<String>,
    pub base_cache_rel_dir: Option<String>,
    pub deploy_rel_dir: Option<String>,
    pub edit_cache_rel_dir: Option<String>,
    pub logs_rel_dir: Option<String>,
    pub mods_rel_dir: Option<String>,
    pub chosen_profile: Option<String>,
    pub profile: Option<Profile>,
    pub use_special_profile: Option<bool>,
    #[serde(deserialize_with = "fragment_or_false")]
    pub special_profile: Option<Profile>,
}

/// Older documents store an unset special profile as `false`.
fn fragment_or_false<'de, D>(deserializer: D) -> Result<Option<Profile>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Fragment {
        Flag(bool),
        Profile(Profile),
    }

    match Option::<Fragment>::deserialize(deserializer)? {
        None | Some(Fragment::Flag(false)) => Ok(None),
        Some(Fragment::Flag(true)) => Err(serde::de::Error::custom(
            "special_profile must be an object or false",
        )),
        Some(Fragment::Profile(profile)) => Ok(Some(profile)),
    }
}

impl Configuration {
    /// Configuration with built-in defaults for the tool located at `anchor`.
    ///
    /// The anchor is made absolute and canonicalized here, before any
    /// directory can be derived from it.
    pub fn new<P: AsRef<Utf8Path>>(anchor: P) -> Result<Self, ConfigError> {
        let anchor_path = path_resolver::canonicalize_lenient(anchor.as_ref())?;

        Ok(Self {
            anchor_path,
            config_file_name: DEFAULT_CONFIG_FILE.to_string(),
            mod_file_name: "modfile.txt".to_string(),
            edited_suffix: ".hash".to_string(),
            hash_algorithms: vec!["md5".to_string()],
            echo: true,
            log: true,
            input: true,
            uninstall: false,
            modify_config: false,
            overwrite_config: false,
            logs_prefix: "modimporter_".to_string(),
            logs_suffix: ".log".to_string(),
            scope_rel_path: "Content".to_string(),
            base_cache_rel_dir: "Base Cache".to_string(),
            deploy_rel_dir: "Deploy".to_string(),
            edit_cache_rel_dir: "Edit Cache".to_string(),
            logs_rel_dir: "Logs".to_string(),
            mods_rel_dir: "Mods".to_string(),
            chosen_profile: None,
            active_profile: Profile::default(),
            use_special_profile: false,
            special_profile: None,
            directories: DirectoryCache::default(),
        })
    }

    /// Defaults overlaid with the recognized keys of a JSON object.
    ///
    /// Unknown keys are ignored. A recognized key holding a value of the
    /// wrong type is a [`ConfigError::Format`].
    pub fn construct<P: AsRef<Utf8Path>>(
        anchor: P,
        overrides: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, ConfigError> {
        let document: ConfigDocument =
            serde_json::from_value(serde_json::Value::Object(overrides.clone())).map_err(
                |source| ConfigError::Format {
                    origin: "overrides".to_string(),
                    source,
                },
            )?;
        Self::from_document(anchor, document)
    }

    /// Defaults overlaid with an already parsed document.
    pub fn from_document<P: AsRef<Utf8Path>>(
        anchor: P,
        document: ConfigDocument,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::new(anchor)?;
        config.apply_document(document)?;
        Ok(config)
    }

    fn apply_document(&mut self, document: ConfigDocument) -> Result<(), ConfigError> {
        fn set<T>(field: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *field = value;
            }
        }

        set(&mut self.config_file_name, document.config_file);
        set(&mut self.mod_file_name, document.mod_file);
        set(&mut self.edited_suffix, document.edited_suffix);
        set(&mut self.hash_algorithms, document.hashes);
        set(&mut self.echo, document.echo);
        set(&mut self.log, document.log);
        set(&mut self.input, document.input);
        set(&mut self.uninstall, document.uninstall);
        set(&mut self.modify_config, document.modify_config);
        set(&mut self.overwrite_config, document.overwrite_config);
        set(&mut self.logs_prefix, document.logs_prefix);
        set(&mut self.logs_suffix, document.logs_suffix);
        set(&mut self.scope_rel_path, document.scope_rel_path);
        set(&mut self.base_cache_rel_dir, document.base_cache_rel_dir);
        set(&mut self.deploy_rel_dir, document.deploy_rel_dir);
        set(&mut self.edit_cache_rel_dir, document.edit_cache_rel_dir);
        set(&mut self.logs_rel_dir, document.logs_rel_dir);
        set(&mut self.mods_rel_dir, document.mods_rel_dir);
        set(&mut self.active_profile, document.profile);
        set(&mut self.use_special_profile, document.use_special_profile);
        if document.chosen_profile.is_some() {
            self.chosen_profile = document.chosen_profile;
        }
        if document.special_profile.is_some() {
            self.special_profile = document.special_profile;
        }

        if self.hash_algorithms.is_empty() {
            return Err(ConfigError::EmptyHashList);
        }
        Ok(())
    }

    /// Absolute, canonical location of the running tool
    pub fn anchor_path(&self) -> &Utf8Path {
        &self.anchor_path
    }

    /// The directory two levels above the anchor
    pub fn game_dir(&self) -> Result<&Utf8Path, ConfigError> {
        path_resolver::game_dir(&self.anchor_path)
    }

    /// Leaf name of the game directory, used to detect the profile
    pub fn game_name(&self) -> Option<&str> {
        self.game_dir().ok().and_then(Utf8Path::file_name)
    }

    pub fn scope_dir(&self) -> Result<&Utf8Path, ConfigError> {
        memoized(&self.directories.scope, || {
            path_resolver::resolve(self.game_dir()?, &self.scope_rel_path)
        })
    }

    pub fn base_cache_dir(&self) -> Result<&Utf8Path, ConfigError> {
        memoized(&self.directories.base_cache, || {
            path_resolver::resolve(self.scope_dir()?, &self.base_cache_rel_dir)
        })
    }

    pub fn deploy_dir(&self) -> Result<&Utf8Path, ConfigError> {
        memoized(&self.directories.deploy, || {
            path_resolver::resolve(self.scope_dir()?, &self.deploy_rel_dir)
        })
    }

    pub fn edit_cache_dir(&self) -> Result<&Utf8Path, ConfigError> {
        memoized(&self.directories.edit_cache, || {
            path_resolver::resolve(self.scope_dir()?, &self.edit_cache_rel_dir)
        })
    }

    pub fn logs_dir(&self) -> Result<&Utf8Path, ConfigError> {
        memoized(&self.directories.logs, || {
            path_resolver::resolve(self.scope_dir()?, &self.logs_rel_dir)
        })
    }

    pub fn mods_dir(&self) -> Result<&Utf8Path, ConfigError> {
        memoized(&self.directories.mods, || {
            path_resolver::resolve(self.scope_dir()?, &self.mods_rel_dir)
        })
    }

    /// Memoized directory slots, for inspecting what has been resolved so far
    pub fn directory_cache(&self) -> &DirectoryCache {
        &self.directories
    }

    /// Fill the directory entries of the active profile that are still unset
    /// with the resolved directories.
    pub fn record_directories(&mut self) -> Result<(), ConfigError> {
        let game_dir = self.game_dir()?.to_path_buf();
        let deployed = self.deploy_dir()?.to_path_buf();
        let mods = self.mods_dir()?.to_path_buf();
        let base_cache = self.base_cache_dir()?.to_path_buf();
        let edit_cache = self.edit_cache_dir()?.to_path_buf();

        let profile = &mut self.active_profile;
        profile.game_dir_path.get_or_insert(game_dir);
        profile.folder_deployed.get_or_insert(deployed);
        profile.folder_mods.get_or_insert(mods);
        profile.folder_basecache.get_or_insert(base_cache);
        profile.folder_editcache.get_or_insert(edit_cache);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ANCHOR: &str = "/nonexistent-games/Hades/Content/modimporter";

    #[test]
    fn test_defaults() {
        let config = Configuration::new(ANCHOR).unwrap();

        assert_eq!(config.config_file_name, "config.json");
        assert_eq!(config.mod_file_name, "modfile.txt");
        assert_eq!(config.edited_suffix, ".hash");
        assert_eq!(config.hash_algorithms, vec!["md5".to_string()]);
        assert!(config.echo && config.log && config.input);
        assert!(!config.uninstall && !config.modify_config && !config.overwrite_config);
        assert_eq!(config.scope_rel_path, "Content");
        assert_eq!(config.deploy_rel_dir, "Deploy");
        assert!(config.chosen_profile.is_none());
        assert!(config.active_profile.is_empty());
        assert!(!config.use_special_profile);
        assert!(config.special_profile.is_none());
    }

    #[test]
    fn test_construct_overrides_known_keys() {
        let overrides = json!({"echo": false, "hashes": ["sha1"], "mods_rel_dir": "MyMods"});
        let config = Configuration::construct(ANCHOR, overrides.as_object().unwrap()).unwrap();

        assert!(!config.echo);
        assert_eq!(config.hash_algorithms, vec!["sha1".to_string()]);
        assert_eq!(config.mods_rel_dir, "MyMods");
        assert!(config.log);
    }

    #[test]
    fn test_construct_rejects_wrong_type() {
        let overrides = json!({"echo": "yes"});
        let result = Configuration::construct(ANCHOR, overrides.as_object().unwrap());
        assert!(matches!(result, Err(ConfigError::Format { .. })));
    }

    #[test]
    fn test_construct_rejects_empty_hash_list() {
        let overrides = json!({"hashes": []});
        let result = Configuration::construct(ANCHOR, overrides.as_object().unwrap());
        assert!(matches!(result, Err(ConfigError::EmptyHashList)));
    }

    #[test]
    fn test_anchor_in_document_is_ignored() {
        let overrides = json!({"this_file": "/elsewhere/x/y"});
        let config = Configuration::construct(ANCHOR, overrides.as_object().unwrap()).unwrap();
        assert_eq!(config.game_name(), Some("Hades"));
    }

    #[test]
    fn test_special_profile_false_is_unset() {
        let overrides = json!({"special_profile": false});
        let config = Configuration::construct(ANCHOR, overrides.as_object().unwrap()).unwrap();
        assert!(config.special_profile.is_none());

        let overrides = json!({"special_profile": {"default_target": ["X.lua"]}});
        let config = Configuration::construct(ANCHOR, overrides.as_object().unwrap()).unwrap();
        assert_eq!(
            config.special_profile.unwrap().default_target,
            Some(vec!["X.lua".to_string()])
        );
    }

    #[test]
    fn test_derived_directories() {
        let config = Configuration::new(ANCHOR).unwrap();
        let scope = Utf8Path::new("/nonexistent-games/Hades/Content");

        assert_eq!(config.game_dir().unwrap(), Utf8Path::new("/nonexistent-games/Hades"));
        assert_eq!(config.scope_dir().unwrap(), scope);
        assert_eq!(config.deploy_dir().unwrap(), scope.join("Deploy"));
        assert_eq!(config.base_cache_dir().unwrap(), scope.join("Base Cache"));
        assert_eq!(config.edit_cache_dir().unwrap(), scope.join("Edit Cache"));
        assert_eq!(config.logs_dir().unwrap(), scope.join("Logs"));
        assert_eq!(config.mods_dir().unwrap(), scope.join("Mods"));
    }

    #[test]
    fn test_directories_not_recomputed_after_offset_change() {
        let mut config = Configuration::new(ANCHOR).unwrap();
        let before = config.mods_dir().unwrap().to_path_buf();

        config.mods_rel_dir = "Other".to_string();

        assert_eq!(config.mods_dir().unwrap(), before);
    }

    #[test]
    fn test_record_directories_keeps_set_entries() {
        let mut config = Configuration::new(ANCHOR).unwrap();
        config.active_profile.folder_mods = Some(Utf8PathBuf::from("/custom/mods"));

        config.record_directories().unwrap();

        let profile = &config.active_profile;
        assert_eq!(profile.folder_mods, Some(Utf8PathBuf::from("/custom/mods")));
        assert_eq!(
            profile.game_dir_path,
            Some(Utf8PathBuf::from("/nonexistent-games/Hades"))
        );
        assert_eq!(
            profile.folder_deployed,
            Some(Utf8PathBuf::from("/nonexistent-games/Hades/Content/Deploy"))
        );
    }

    #[test]
    fn test_directories_not_serialized() {
        let config = Configuration::new(ANCHOR).unwrap();
        config.deploy_dir().unwrap();

        let value = serde_json::to_value(&config).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("this_file"));
        assert!(object.contains_key("hashes"));
        assert!(!object.contains_key("directories"));
        assert!(!object.contains_key("deploy_dir"));
    }
}
