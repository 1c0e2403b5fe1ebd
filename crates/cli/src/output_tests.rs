use super::*;

#[test]
fn format_time_ago_zero_is_a_dash() {
    assert_eq!(format_time_ago(0), "-");
}

#[test]
fn format_time_ago_seconds() {
    let now_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64;
    assert_eq!(format_time_ago(now_ms - 5_000), "5s");
}

#[test]
fn format_time_ago_minutes() {
    let now_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64;
    assert_eq!(format_time_ago(now_ms - 120_000), "2m");
}

#[tokio::test]
async fn display_log_text_with_empty_content_reports_no_entries() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("daemon.log");
    let result = display_log(&log_path, "", false, OutputFormat::Text, "daemon", "aetheriusd").await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn display_log_json_wraps_lines() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("daemon.log");
    let result = display_log(
        &log_path,
        "line one\nline two",
        false,
        OutputFormat::Json,
        "daemon",
        "aetheriusd",
    )
    .await;
    assert!(result.is_ok());
}
