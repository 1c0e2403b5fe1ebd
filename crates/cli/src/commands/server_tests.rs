use super::*;

#[tokio::test]
async fn wait_until_reachable_times_out_for_a_socket_that_never_appears() {
    let dir = tempfile::tempdir().expect("tempdir");
    let client = DaemonClient::new(dir.path().join("never.sock"));
    let result = wait_until_reachable_within(&client, Duration::from_millis(100)).await;
    assert!(result.is_err());
}
