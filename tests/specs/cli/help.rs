//! Help and version output specs.
//!
//! Verify `aetherius --help`/`--version` work without touching the
//! filesystem or requiring a running daemon.

use crate::prelude::*;
use std::process::Command;

fn aetherius() -> Command {
    Command::new(aetherius_binary())
}

#[test]
fn version_flag_shows_version() {
    let output = aetherius().arg("--version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")) || stdout.to_lowercase().contains("aetherius"),
        "expected version output, got: {stdout}"
    );
}

#[test]
fn short_version_flag_works() {
    let output = aetherius().arg("-v").output().unwrap();
    assert!(output.status.success());
}

#[test]
fn help_flag_shows_sections() {
    let output = aetherius().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Actions:"), "got: {stdout}");
    assert!(stdout.contains("Resources:"), "got: {stdout}");
    assert!(stdout.contains("System:"), "got: {stdout}");
}

#[test]
fn no_subcommand_prints_help_and_succeeds() {
    let output = aetherius().output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "got: {stdout}");
}

#[test]
fn unknown_subcommand_fails() {
    let output = aetherius().arg("not-a-real-command").output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn server_help_mentions_lifecycle_verbs() {
    let output = aetherius().args(["server", "--help"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("start"));
    assert!(stdout.contains("stop"));
    assert!(stdout.contains("status"));
}
