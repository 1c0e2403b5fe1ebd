use super::*;

#[tokio::test]
async fn run_errors_when_daemon_is_not_running() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("aetherius.toml");
    let result = run(
        ComponentArgs { command: ComponentCommand::Stats },
        &config_path,
    )
    .await;
    assert!(result.is_err());
}
