use camino::Utf8PathBuf;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Folder profile for one game installation.
///
/// The six named entries are the documented shape of a profile. Fragments
/// may carry further keys (from a config file or `--special-profile`); those
/// are kept in `extra` so they survive merging and serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Scripts a mod targets when its modfile names none
    pub default_target: Option<Vec<String>>,
    pub game_dir_path: Option<Utf8PathBuf>,
    pub folder_deployed: Option<Utf8PathBuf>,
    pub folder_mods: Option<Utf8PathBuf>,
    pub folder_basecache: Option<Utf8PathBuf>,
    pub folder_editcache: Option<Utf8PathBuf>,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl Profile {
    /// Profile with only a default target list set
    pub fn with_targets<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default_target: Some(targets.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Shallow merge of `overlay` on top of `self`.
    ///
    /// Keys set in `overlay` win; keys it leaves unset fall through to `self`.
    /// Keys unset in both stay unset. A JSON `null` counts as unset.
    pub fn merged_with(&self, overlay: &Profile) -> Profile {
        let mut extra = self.extra.clone();
        for (key, value) in &overlay.extra {
            extra.insert(key.clone(), value.clone());
        }

        Profile {
            default_target: overlay
                .default_target
                .clone()
                .or_else(|| self.default_target.clone()),
            game_dir_path: overlay
                .game_dir_path
                .clone()
                .or_else(|| self.game_dir_path.clone()),
            folder_deployed: overlay
                .folder_deployed
                .clone()
                .or_else(|| self.folder_deployed.clone()),
            folder_mods: overlay
                .folder_mods
                .clone()
                .or_else(|| self.folder_mods.clone()),
            folder_basecache: overlay
                .folder_basecache
                .clone()
                .or_else(|| self.folder_basecache.clone()),
            folder_editcache: overlay
                .folder_editcache
                .clone()
                .or_else(|| self.folder_editcache.clone()),
            extra,
        }
    }

    /// True when no entry at all is set
    pub fn is_empty(&self) -> bool {
        self.default_target.is_none()
            && self.game_dir_path.is_none()
            && self.folder_deployed.is_none()
            && self.folder_mods.is_none()
            && self.folder_basecache.is_none()
            && self.folder_editcache.is_none()
            && self.extra.is_empty()
    }
}
