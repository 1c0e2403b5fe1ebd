use super::*;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let cfg = DaemonConfig::load(&path).unwrap();
    assert_eq!(cfg, DaemonConfig::default());
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aetherius.toml");
    std::fs::write(&path, "jar_path = \"custom.jar\"\n").unwrap();
    let cfg = DaemonConfig::load(&path).unwrap();
    assert_eq!(cfg.jar_path, "custom.jar");
    assert_eq!(cfg.stop_grace_secs, DaemonConfig::default().stop_grace_secs);
}

#[test]
fn round_trips_through_toml() {
    let cfg = DaemonConfig::default();
    let text = cfg.to_toml_string().unwrap();
    let back: DaemonConfig = toml::from_str(&text).unwrap();
    assert_eq!(cfg, back);
}

#[test]
fn jar_full_path_joins_relative_to_server_dir() {
    let mut cfg = DaemonConfig::default();
    cfg.server_dir = "/srv/mc".into();
    cfg.jar_path = "paper.jar".into();
    assert_eq!(cfg.jar_full_path(), std::path::PathBuf::from("/srv/mc/paper.jar"));
}
