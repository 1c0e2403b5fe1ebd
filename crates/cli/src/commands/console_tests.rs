use super::*;

#[tokio::test]
async fn run_cmd_errors_when_daemon_is_not_running() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("aetherius.toml");
    let result = run_cmd(&config_path, "say hi").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn run_console_errors_when_daemon_is_not_running() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("aetherius.toml");
    let result = run_console(&config_path).await;
    assert!(result.is_err());
}
