use super::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use tempfile::tempdir;

fn write_component(components_dir: &std::path::Path, name: &str, deps: &[&str]) {
    let dir = components_dir.join(name);
    fs::create_dir_all(&dir).expect("mkdir");
    let deps_yaml = deps
        .iter()
        .map(|d| format!("  - {d}"))
        .collect::<Vec<_>>()
        .join("\n");
    let manifest = format!(
        "name: {name}\ndisplay_name: {name}\ndescription: test component\nversion: \"1.0.0\"\nauthor: test\ndependencies:\n{deps_yaml}\n"
    );
    fs::write(dir.join("component.yaml"), manifest).expect("write manifest");
}

fn write_start_script(components_dir: &std::path::Path, name: &str, body: &str) {
    let path = components_dir.join(name).join("start_component");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
}

fn manager(dir: &std::path::Path) -> (ComponentManager, mpsc::UnboundedReceiver<Envelope>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ComponentManager::new(dir.to_path_buf(), Duration::from_millis(500), tx), rx)
}

#[tokio::test]
async fn scan_discovers_components_with_valid_manifests() {
    let dir = tempdir().expect("tempdir");
    write_component(dir.path(), "database", &[]);
    write_component(dir.path(), "web", &["database"]);
    let (mgr, _rx) = manager(dir.path());
    let mut found = mgr.scan().await.expect("scan succeeds");
    found.sort();
    assert_eq!(found, vec!["database".to_string(), "web".to_string()]);
}

#[tokio::test]
async fn load_fails_when_a_hard_dependency_is_not_yet_loaded() {
    let dir = tempdir().expect("tempdir");
    write_component(dir.path(), "web", &["database"]);
    let (mgr, _rx) = manager(dir.path());
    mgr.scan().await.expect("scan");
    let err = mgr.load("web").await.expect_err("database not loaded yet");
    assert!(matches!(err, ComponentError::MissingDependency { .. }));
}

#[tokio::test]
async fn load_then_enable_without_a_start_script_succeeds_immediately() {
    let dir = tempdir().expect("tempdir");
    write_component(dir.path(), "database", &[]);
    let (mgr, mut rx) = manager(dir.path());
    mgr.scan().await.expect("scan");
    mgr.load("database").await.expect("load");
    mgr.enable("database").await.expect("enable");
    let stats = mgr.stats().await;
    assert_eq!(stats.enabled, 1);
    assert!(matches!(rx.try_recv().expect("loaded event").event, Event::ComponentLoaded { .. }));
    assert!(matches!(rx.try_recv().expect("enabled event").event, Event::ComponentEnabled { .. }));
}

#[tokio::test]
async fn enable_waits_for_the_ready_marker_from_a_start_component_script() {
    let dir = tempdir().expect("tempdir");
    write_component(dir.path(), "web", &[]);
    write_start_script(dir.path(), "web", "echo 'AETHERIUS_COMPONENT_STATUS: READY'\nsleep 5");
    let (mgr, _rx) = manager(dir.path());
    mgr.scan().await.expect("scan");
    mgr.load("web").await.expect("load");
    mgr.enable("web").await.expect("enable reaches READY");
    let states = mgr.list().await;
    assert!(states.iter().any(|(name, state)| name == "web" && *state == ComponentState::Enabled));
    mgr.disable("web").await.expect("disable kills the child");
}

#[tokio::test]
async fn enable_fails_when_the_start_script_exits_nonzero_before_ready() {
    let dir = tempdir().expect("tempdir");
    write_component(dir.path(), "web", &[]);
    write_start_script(dir.path(), "web", "echo oops\nexit 1");
    let (mgr, _rx) = manager(dir.path());
    mgr.scan().await.expect("scan");
    mgr.load("web").await.expect("load");
    let err = mgr.enable("web").await.expect_err("script exited before ready");
    assert!(matches!(err, ComponentError::StartupFailed { .. }));
}

#[tokio::test]
async fn load_all_loads_nothing_when_the_dependency_graph_is_cyclic() {
    let dir = tempdir().expect("tempdir");
    write_component(dir.path(), "a", &["b"]);
    write_component(dir.path(), "b", &["a"]);
    let (mgr, _rx) = manager(dir.path());
    let loaded = mgr.load_all().await.expect("cyclic graph is not a hard error");
    assert_eq!(loaded, 0);
}

#[tokio::test]
async fn load_all_loads_and_enables_in_dependency_order() {
    let dir = tempdir().expect("tempdir");
    write_component(dir.path(), "database", &[]);
    write_component(dir.path(), "web", &["database"]);
    let (mgr, _rx) = manager(dir.path());
    let loaded = mgr.load_all().await.expect("acyclic graph loads");
    assert_eq!(loaded, 2);
}
