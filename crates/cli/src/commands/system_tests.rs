use super::*;

#[tokio::test]
async fn health_reports_unreachable_for_a_missing_socket() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("aetherius.toml");
    run(SystemArgs { command: SystemCommand::Health }, &config_path, OutputFormat::Text)
        .await
        .expect("health check succeeds even when unreachable");
}

#[tokio::test]
async fn info_succeeds_with_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("aetherius.toml");
    run(SystemArgs { command: SystemCommand::Info }, &config_path, OutputFormat::Text)
        .await
        .expect("info succeeds");
}

#[tokio::test]
async fn logs_with_no_log_file_reports_empty_without_following() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("aetherius.toml");
    run(
        SystemArgs { command: SystemCommand::Logs { follow: false } },
        &config_path,
        OutputFormat::Text,
    )
    .await
    .expect("logs succeeds on an empty log");
}
