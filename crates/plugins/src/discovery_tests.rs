use std::sync::Arc;

use clerk_store::CentralStore;
use tempfile::tempdir;

use super::*;

fn new_registry() -> (PluginRegistry, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let store = Arc::new(CentralStore::open(dir.path().join("wal.log"), dir.path()).unwrap());
    (PluginRegistry::new(store), dir)
}

#[test]
fn missing_manifest_is_not_an_error() {
    let (mut registry, dir) = new_registry();
    load_plugins_dir(dir.path(), &mut registry).unwrap();
    assert_eq!(registry_plugin_count(&registry), 3);
}

#[test]
fn known_builtin_is_registered() {
    let (mut registry, dir) = new_registry();
    std::fs::write(dir.path().join("plugins.toml"), "[[plugin]]\nlabel = \"audit\"\nkind = \"observer\"\nbuiltin_name = \"audit_log\"\n").unwrap();

    load_plugins_dir(dir.path(), &mut registry).unwrap();

    assert_eq!(registry_plugin_count(&registry), 4);
}

#[test]
fn unknown_builtin_name_is_a_fatal_error() {
    let (mut registry, dir) = new_registry();
    std::fs::write(dir.path().join("plugins.toml"), "[[plugin]]\nlabel = \"mystery\"\nkind = \"observer\"\nbuiltin_name = \"does_not_exist\"\n").unwrap();

    let err = load_plugins_dir(dir.path(), &mut registry).unwrap_err();
    assert!(matches!(err, PluginError::UnknownBuiltin { .. }));
}

#[test]
fn malformed_manifest_is_a_fatal_error() {
    let (mut registry, dir) = new_registry();
    std::fs::write(dir.path().join("plugins.toml"), "not valid toml {{{").unwrap();

    let err = load_plugins_dir(dir.path(), &mut registry).unwrap_err();
    assert!(matches!(err, PluginError::MalformedManifest { .. }));
}

fn registry_plugin_count(registry: &PluginRegistry) -> usize {
    registry.plugin_count()
}
