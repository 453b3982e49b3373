//! Directory derivation from the anchor path.
//!
//! Every operational directory is a function of the anchor (the location of
//! the running tool) and one relative offset:
//!
//! ```text
//! <anchor>/../..                  game directory
//! <game dir>/<scope_rel_path>     scope
//! <scope>/<base_cache_rel_dir>    base cache
//! <scope>/<deploy_rel_dir>        deploy
//! <scope>/<edit_cache_rel_dir>    edit cache
//! <scope>/<logs_rel_dir>          logs
//! <scope>/<mods_rel_dir>          mods
//! ```
//!
//! Resolution never touches the directories themselves. Components are
//! resolved left to right: while the path exists each prefix is
//! canonicalized through the filesystem, so symlinks are followed before a
//! later `..` is applied; components below the first missing one are kept
//! as written. The result is the same whether or not the target exists yet.

use crate::error::ConfigError;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use std::cell::OnceCell;
use std::io;

/// Memoized directory slots for one [`Configuration`](crate::models::Configuration).
///
/// Each slot is filled on first access and never recomputed. Changing an
/// offset field after its directory was read has no effect on the cached
/// value.
#[derive(Debug, Clone, Default)]
pub struct DirectoryCache {
    pub(crate) scope: OnceCell<Utf8PathBuf>,
    pub(crate) base_cache: OnceCell<Utf8PathBuf>,
    pub(crate) deploy: OnceCell<Utf8PathBuf>,
    pub(crate) edit_cache: OnceCell<Utf8PathBuf>,
    pub(crate) logs: OnceCell<Utf8PathBuf>,
    pub(crate) mods: OnceCell<Utf8PathBuf>,
}

impl DirectoryCache {
    /// Number of slots already computed
    pub fn filled(&self) -> usize {
        [
            &self.scope,
            &self.base_cache,
            &self.deploy,
            &self.edit_cache,
            &self.logs,
            &self.mods,
        ]
        .iter()
        .filter(|slot| slot.get().is_some())
        .count()
    }
}

/// Return the cached path in `slot`, computing and storing it on first use.
pub(crate) fn memoized<F>(slot: &OnceCell<Utf8PathBuf>, compute: F) -> Result<&Utf8Path, ConfigError>
where
    F: FnOnce() -> Result<Utf8PathBuf, ConfigError>,
{
    if let Some(path) = slot.get() {
        return Ok(path.as_path());
    }
    let path = compute()?;
    Ok(slot.get_or_init(|| path).as_path())
}

/// The game directory: the anchor's grandparent.
pub fn game_dir(anchor: &Utf8Path) -> Result<&Utf8Path, ConfigError> {
    anchor
        .parent()
        .and_then(Utf8Path::parent)
        .filter(|dir| !dir.as_str().is_empty())
        .ok_or_else(|| ConfigError::NoGameDirectory {
            anchor: anchor.to_path_buf(),
        })
}

/// Join `offset` onto `base` and canonicalize the result.
pub fn resolve(base: &Utf8Path, offset: &str) -> Result<Utf8PathBuf, ConfigError> {
    canonicalize_lenient(&base.join(offset))
}

/// Canonicalize a path that may not exist yet.
///
/// Relative paths are made absolute against the working directory first.
/// A `..` steps out of the already canonical prefix, so it lands in the
/// parent of a symlink's target rather than the symlink's own parent.
pub fn canonicalize_lenient(path: &Utf8Path) -> Result<Utf8PathBuf, ConfigError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        current_dir()?.join(path)
    };

    let mut resolved = Utf8PathBuf::new();
    for component in absolute.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                resolved.pop();
            }
            Utf8Component::Normal(name) => {
                resolved.push(name);
                match resolved.canonicalize_utf8() {
                    Ok(canonical) => resolved = canonical,
                    // Missing from here on; keep the name as written
                    Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                    Err(source) => {
                        return Err(ConfigError::PathResolution {
                            path: path.to_path_buf(),
                            source,
                        });
                    }
                }
            }
            other => resolved.push(other.as_str()),
        }
    }
    Ok(resolved)
}

/// The working directory as a UTF-8 path
pub(crate) fn current_dir() -> Result<Utf8PathBuf, ConfigError> {
    let cwd = std::env::current_dir().map_err(|source| ConfigError::PathResolution {
        path: Utf8PathBuf::from("."),
        source,
    })?;
    Utf8PathBuf::try_from(cwd).map_err(|err| ConfigError::PathResolution {
        path: Utf8PathBuf::from("."),
        source: err.into_io_error(),
    })
}
