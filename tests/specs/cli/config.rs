//! `aetherius config` specs: init, show, validate.

use crate::prelude::*;

#[test]
fn init_writes_a_config_file() {
    let project = Project::empty();
    project
        .aetherius()
        .args(&["config", "init"])
        .passes()
        .stdout_has("wrote");
    assert!(project.config_path().exists());
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let project = Project::empty();
    project.aetherius().args(&["config", "init"]).passes();
    project
        .aetherius()
        .args(&["config", "init"])
        .fails()
        .stderr_has("--force");
}

#[test]
fn init_with_force_overwrites() {
    let project = Project::empty();
    project.aetherius().args(&["config", "init"]).passes();
    project
        .aetherius()
        .args(&["config", "init", "--force"])
        .passes();
}

#[test]
fn show_prints_toml_even_without_an_init() {
    let project = Project::empty();
    project
        .aetherius()
        .args(&["config", "show"])
        .passes()
        .stdout_has("jar_path");
}

#[test]
fn validate_accepts_defaults() {
    let project = Project::empty();
    project
        .aetherius()
        .args(&["config", "validate"])
        .passes()
        .stdout_has("is valid");
}

#[test]
fn validate_warns_about_a_missing_jar() {
    let project = Project::empty();
    project.aetherius().args(&["config", "init"]).passes();
    project
        .aetherius()
        .args(&["config", "validate"])
        .passes()
        .stderr_has("does not exist");
}
