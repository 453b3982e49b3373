//! Integration tests for directory derivation
//!
//! These tests verify:
//! - Directory layout below the scope
//! - Idempotence of path resolution (property based)
//! - Memoized directories ignore later offset changes
//! - Resolution never creates directories

use camino::{Utf8Path, Utf8PathBuf};
use modimporter::Configuration;
use modimporter::services::path_resolver::{canonicalize_lenient, resolve};
use proptest::prelude::*;
use tempfile::TempDir;

fn canonical_temp_root() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf())
        .unwrap()
        .canonicalize_utf8()
        .unwrap();
    (temp_dir, root)
}

fn anchor_for(root: &Utf8Path) -> Utf8PathBuf {
    root.join("Hades").join("Content").join("modimporter")
}

#[test]
fn test_layout_below_scope() {
    let (_temp_dir, root) = canonical_temp_root();
    let config = Configuration::new(anchor_for(&root)).unwrap();
    let scope = root.join("Hades").join("Content");

    assert_eq!(config.scope_dir().unwrap(), scope);
    assert_eq!(config.base_cache_dir().unwrap(), scope.join("Base Cache"));
    assert_eq!(config.deploy_dir().unwrap(), scope.join("Deploy"));
    assert_eq!(config.edit_cache_dir().unwrap(), scope.join("Edit Cache"));
    assert_eq!(config.logs_dir().unwrap(), scope.join("Logs"));
    assert_eq!(config.mods_dir().unwrap(), scope.join("Mods"));
}

#[test]
fn test_same_result_whether_or_not_directories_exist() {
    let (_temp_dir, root) = canonical_temp_root();
    let before = Configuration::new(anchor_for(&root)).unwrap();
    let deploy_before = before.deploy_dir().unwrap().to_path_buf();

    std::fs::create_dir_all(root.join("Hades").join("Content").join("Deploy")).unwrap();
    let after = Configuration::new(anchor_for(&root)).unwrap();

    assert_eq!(after.deploy_dir().unwrap(), deploy_before);
}

#[test]
fn test_resolution_creates_nothing() {
    let (_temp_dir, root) = canonical_temp_root();
    let config = Configuration::new(anchor_for(&root)).unwrap();

    config.scope_dir().unwrap();
    config.base_cache_dir().unwrap();
    config.deploy_dir().unwrap();
    config.edit_cache_dir().unwrap();
    config.logs_dir().unwrap();
    config.mods_dir().unwrap();

    assert_eq!(std::fs::read_dir(&root).unwrap().count(), 0);
    assert_eq!(config.directory_cache().filled(), 6);
}

#[test]
fn test_offsets_relative_to_scope() {
    let (_temp_dir, root) = canonical_temp_root();
    let mut config = Configuration::new(anchor_for(&root)).unwrap();
    config.scope_rel_path = ".".to_string();
    config.deploy_rel_dir = "../Deploy".to_string();

    assert_eq!(config.scope_dir().unwrap(), root.join("Hades"));
    assert_eq!(config.deploy_dir().unwrap(), root.join("Deploy"));
}

#[test]
fn test_cached_directory_survives_offset_change() {
    let (_temp_dir, root) = canonical_temp_root();
    let mut config = Configuration::new(anchor_for(&root)).unwrap();

    let deploy = config.deploy_dir().unwrap().to_path_buf();
    config.deploy_rel_dir = "Elsewhere".to_string();
    config.scope_rel_path = "Other".to_string();

    assert_eq!(config.deploy_dir().unwrap(), deploy);
    assert_eq!(
        config.scope_dir().unwrap(),
        root.join("Hades").join("Content")
    );
    // Never read before, but derived from the cached scope
    assert_eq!(
        config.mods_dir().unwrap(),
        root.join("Hades").join("Content").join("Mods")
    );
}

#[test]
fn test_uncached_directory_sees_offset_change() {
    let (_temp_dir, root) = canonical_temp_root();
    let mut config = Configuration::new(anchor_for(&root)).unwrap();

    config.logs_rel_dir = "Journal".to_string();

    assert_eq!(
        config.logs_dir().unwrap(),
        root.join("Hades").join("Content").join("Journal")
    );
}

proptest! {
    #[test]
    fn prop_resolve_is_idempotent(
        offset in "[A-Za-z0-9_]{1,8}( [A-Za-z0-9_]{1,8})?(/[A-Za-z0-9_]{1,8}){0,2}"
    ) {
        let (_temp_dir, root) = canonical_temp_root();

        let first = resolve(&root, &offset).unwrap();
        let second = resolve(&root, &offset).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert!(first.is_absolute());
        prop_assert!(first.starts_with(&root));
        prop_assert_eq!(canonicalize_lenient(&first).unwrap(), first);
    }

    #[test]
    fn prop_configuration_directories_are_stable(
        mods in "[A-Za-z0-9_]{1,10}",
        deploy in "[A-Za-z0-9_]{1,10}",
    ) {
        let (_temp_dir, root) = canonical_temp_root();
        let mut first = Configuration::new(anchor_for(&root)).unwrap();
        first.mods_rel_dir = mods.clone();
        first.deploy_rel_dir = deploy.clone();
        let mut second = Configuration::new(anchor_for(&root)).unwrap();
        second.mods_rel_dir = mods;
        second.deploy_rel_dir = deploy;

        prop_assert_eq!(first.mods_dir().unwrap(), second.mods_dir().unwrap());
        prop_assert_eq!(first.deploy_dir().unwrap(), second.deploy_dir().unwrap());
        prop_assert_eq!(first.mods_dir().unwrap(), first.mods_dir().unwrap());
    }
}
