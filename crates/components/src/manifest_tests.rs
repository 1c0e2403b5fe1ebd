use super::*;
use std::fs;
use tempfile::tempdir;

fn write_manifest(dir: &std::path::Path, text: &str) {
    fs::write(dir.join("component.yaml"), text).expect("write manifest");
}

#[test]
fn loads_a_minimal_yaml_manifest() {
    let dir = tempdir().expect("tempdir");
    write_manifest(
        dir.path(),
        "name: example\ndisplay_name: Example\ndescription: does things\nversion: \"1.0.0\"\nauthor: alice\n",
    );
    let info = load_manifest(dir.path()).expect("manifest loads");
    assert_eq!(info.name, "example");
    assert_eq!(info.category, "general");
    assert_eq!(info.aetherius_version, ">=1.0.0");
    assert!(info.dependencies.is_empty());
}

#[test]
fn rejects_a_manifest_missing_a_required_field() {
    let dir = tempdir().expect("tempdir");
    write_manifest(dir.path(), "name: example\ndisplay_name: Example\n");
    let err = load_manifest(dir.path()).expect_err("missing fields");
    assert!(matches!(err, ComponentError::InvalidManifest { .. }));
}

#[test]
fn coerces_legacy_dependency_map_into_hard_deps_and_engine_version() {
    let dir = tempdir().expect("tempdir");
    write_manifest(
        dir.path(),
        "name: example\ndisplay_name: Example\ndescription: d\nversion: \"1.0.0\"\nauthor: alice\ndependencies:\n  core_version: \">=2.0.0\"\n  database: \">=1.0\"\n",
    );
    let info = load_manifest(dir.path()).expect("manifest loads");
    assert_eq!(info.aetherius_version, ">=2.0.0");
    assert_eq!(info.dependencies, vec!["database".to_string()]);
}

#[test]
fn accepts_a_plain_dependency_list() {
    let dir = tempdir().expect("tempdir");
    write_manifest(
        dir.path(),
        "name: example\ndisplay_name: Example\ndescription: d\nversion: \"1.0.0\"\nauthor: alice\ndependencies:\n  - database\n  - cache\n",
    );
    let info = load_manifest(dir.path()).expect("manifest loads");
    assert_eq!(info.dependencies, vec!["database".to_string(), "cache".to_string()]);
}

#[test]
fn prefers_yaml_manifest_over_json_when_both_exist() {
    let dir = tempdir().expect("tempdir");
    write_manifest(
        dir.path(),
        "name: yaml-one\ndisplay_name: Yaml\ndescription: d\nversion: \"1.0.0\"\nauthor: alice\n",
    );
    fs::write(
        dir.path().join("component.json"),
        r#"{"name":"json-one","display_name":"Json","description":"d","version":"1.0.0","author":"bob"}"#,
    )
    .expect("write json manifest");
    let info = load_manifest(dir.path()).expect("manifest loads");
    assert_eq!(info.name, "yaml-one");
}
