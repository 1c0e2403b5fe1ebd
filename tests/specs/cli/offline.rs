//! Specs for commands that talk to a daemon socket, exercised without ever
//! starting a real daemon. These prove the CLI fails fast and clearly
//! instead of hanging when nothing is listening.

use crate::prelude::*;

#[test]
fn server_status_reports_not_running() {
    let project = Project::empty();
    project
        .aetherius()
        .args(&["server", "status"])
        .passes()
        .stdout_has("not running");
}

#[test]
fn server_stop_is_a_no_op_when_nothing_is_running() {
    let project = Project::empty();
    project
        .aetherius()
        .args(&["server", "stop"])
        .passes()
        .stdout_has("not running");
}

#[test]
fn cmd_fails_when_daemon_is_not_running() {
    let project = Project::empty();
    project
        .aetherius()
        .args(&["cmd", "say", "hello"])
        .fails()
        .stderr_has("not running");
}

#[test]
fn console_fails_when_daemon_is_not_running() {
    let project = Project::empty();
    project
        .aetherius()
        .args(&["console"])
        .fails()
        .stderr_has("not running");
}

#[test]
fn component_list_fails_when_daemon_is_not_running() {
    let project = Project::empty();
    project
        .aetherius()
        .args(&["component", "list"])
        .fails()
        .stderr_has("not running");
}

#[test]
fn system_health_reports_unreachable_without_failing() {
    let project = Project::empty();
    project
        .aetherius()
        .args(&["system", "health"])
        .passes()
        .stdout_has("unreachable");
}

#[test]
fn system_logs_with_no_log_file_reports_empty() {
    let project = Project::empty();
    project
        .aetherius()
        .args(&["system", "logs"])
        .passes();
}
