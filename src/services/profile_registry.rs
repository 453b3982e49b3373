//! Built-in folder profiles, keyed by the exact name of the game directory.

use crate::models::Profile;
use indexmap::IndexMap;
use std::sync::LazyLock;

/// The built-in registry. Read-only; extended by adding entries to
/// [`ProfileRegistry::builtin`].
pub static DEFAULT_PROFILES: LazyLock<ProfileRegistry> = LazyLock::new(ProfileRegistry::builtin);

/// Static mapping from game directory name to default profile fragment
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: IndexMap<&'static str, Profile>,
}

impl ProfileRegistry {
    /// Profiles for the supported games.
    pub fn builtin() -> Self {
        let mut profiles = IndexMap::new();
        profiles.insert("Hades", Profile::with_targets(["Scripts/RoomManager.lua"]));
        profiles.insert(
            "Pyre",
            Profile::with_targets(["Scripts/Campaign.lua", "Scripts/MPScripts.lua"]),
        );
        profiles.insert(
            "Transistor",
            Profile::with_targets(["Scripts/AllCampaignScripts.txt"]),
        );
        // No script is a useful default target for Bastion
        profiles.insert("Bastion", Profile::default());

        Self { profiles }
    }

    /// Look up a game by directory name. Case-sensitive.
    pub fn lookup(&self, game_name: &str) -> Option<&Profile> {
        self.profiles.get(game_name)
    }

    /// Known game names in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.profiles.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Look up a game in the built-in registry.
pub fn lookup(game_name: &str) -> Option<&'static Profile> {
    DEFAULT_PROFILES.lookup(game_name)
}
