// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for sectioned help output and colorization.

#![allow(clippy::unwrap_used)]

use super::*;
use crate::Commands;

fn header_start() -> String {
    format!("\x1b[38;5;{}m", crate::color::codes::HEADER)
}

fn literal_start() -> String {
    format!("\x1b[38;5;{}m", crate::color::codes::LITERAL)
}

fn context_start() -> String {
    format!("\x1b[38;5;{}m", crate::color::codes::CONTEXT)
}

const RESET: &str = "\x1b[0m";

// ============================================================================
// Exhaustiveness Tests
// ============================================================================

/// Every subcommand registered in clap must appear in the help sections.
/// If a new subcommand is added to `Commands` but not to `help::commands()`,
/// this test fails with a clear message.
#[test]
fn all_subcommands_in_help() {
    let cmd = crate::cli_command();
    let help_text = commands();
    for sub in cmd.get_subcommands() {
        let name = sub.get_name();
        if name == "help" {
            continue; // clap auto-generated
        }
        let pattern = format!("  {}", name);
        assert!(
            help_text.contains(&pattern),
            "Command '{name}' missing from help sections — add it to help::commands()"
        );
    }
}

/// Compile-time exhaustive match on `Commands` enum.
/// Adding a new variant causes a compile error here, forcing the developer
/// to assign it to a section.
#[test]
fn all_commands_assigned_to_section() {
    fn _section(cmd: &Commands) -> &'static str {
        match cmd {
            Commands::Start => "Actions",
            Commands::Console => "Actions",
            Commands::Cmd { .. } => "Actions",
            Commands::Server(_) => "Resources",
            Commands::Component(_) => "Resources",
            Commands::Config(_) => "Resources",
            Commands::System(_) => "System",
        }
    }
}

// ============================================================================
// Plain Text Tests
// ============================================================================

#[test]
fn commands_returns_plain_text() {
    let result = commands();
    assert!(
        !result.contains("\x1b["),
        "commands() should not contain ANSI codes"
    );
}

#[test]
fn template_returns_plain_text() {
    let result = template();
    assert!(
        !result.contains("\x1b["),
        "template() should not contain ANSI codes"
    );
}

#[test]
fn after_help_returns_plain_text() {
    let result = after_help();
    assert!(
        !result.contains("\x1b["),
        "after_help() should not contain ANSI codes"
    );
}

// ============================================================================
// Section Content Tests
// ============================================================================

#[test]
fn commands_has_actions_section() {
    let result = commands();
    assert!(result.contains("Actions:"), "Should have Actions section");
    assert!(result.contains("  start "), "Actions should contain start");
    assert!(
        result.contains("  console "),
        "Actions should contain console"
    );
    assert!(result.contains("  cmd "), "Actions should contain cmd");
}

#[test]
fn commands_has_resources_section() {
    let result = commands();
    assert!(
        result.contains("Resources:"),
        "Should have Resources section"
    );
    assert!(
        result.contains("  server "),
        "Resources should contain server"
    );
    assert!(
        result.contains("  component "),
        "Resources should contain component"
    );
    assert!(
        result.contains("  config "),
        "Resources should contain config"
    );
}

#[test]
fn commands_has_system_section() {
    let result = commands();
    assert!(result.contains("System:"), "Should have System section");
    assert!(
        result.contains("  system "),
        "System should contain system"
    );
}

// ============================================================================
// Colorization Tests
// ============================================================================

#[test]
fn colorize_help_applies_header_color() {
    let result = colorize_help("Actions:");
    assert!(
        result.contains(&format!("{}Actions:{}", header_start(), RESET)),
        "Section header should be HEADER colored in:\n{}",
        result
    );
}

#[test]
fn colorize_help_applies_usage_color() {
    let result = colorize_help("Usage: aetherius [OPTIONS] [COMMAND]");
    assert!(
        result.contains(&format!("{}Usage:{}", header_start(), RESET)),
        "Usage: should be HEADER colored in:\n{}",
        result
    );
}

#[test]
fn colorize_help_applies_literal_to_commands() {
    let result = colorize_help("  start       Start the daemon and the game server");
    assert!(
        result.contains(&format!("{}start{}", literal_start(), RESET)),
        "Command name should be LITERAL colored in:\n{}",
        result
    );
}

#[test]
fn colorize_help_applies_literal_to_option_flags() {
    let result = colorize_help("  -o, --output <OUTPUT>    Output format [default: text]");
    assert!(
        result.contains(&format!("{}-o{}", literal_start(), RESET)),
        "Short flag should be LITERAL colored in:\n{}",
        result
    );
    assert!(
        result.contains(&format!("{}--output{}", literal_start(), RESET)),
        "Long flag should be LITERAL colored in:\n{}",
        result
    );
}

#[test]
fn colorize_help_applies_context_to_placeholders() {
    let result = colorize_help("  -o, --output <OUTPUT>    Output format");
    assert!(
        result.contains(&format!("{}<OUTPUT>{}", context_start(), RESET)),
        "Placeholder should be CONTEXT colored in:\n{}",
        result
    );
}

#[test]
fn colorize_help_applies_context_to_defaults() {
    let result = colorize_help(
        "  -o, --output <OUTPUT>    Output format [default: text] [possible values: text, json]",
    );
    assert!(
        result.contains(&format!("{}[default: text]{}", context_start(), RESET)),
        "[default: text] should be CONTEXT colored in:\n{}",
        result
    );
    assert!(
        result.contains(&format!(
            "{}[possible values: text, json]{}",
            context_start(),
            RESET
        )),
        "[possible values: ...] should be CONTEXT colored in:\n{}",
        result
    );
}

#[test]
fn colorize_help_skips_existing_ansi() {
    let input = "\x1b[38;5;74mAlready Colored\x1b[0m";
    let result = colorize_help(input);
    assert_eq!(result, input, "Existing ANSI codes should be preserved");
}

#[test]
fn colorize_help_handles_mixed_content() {
    let input = "\
Actions:
  start       Start the daemon and the game server
  console     Open a persistent console session

Options:
  -o, --output <OUTPUT>    Output format [default: text]";

    let result = colorize_help(input);

    assert!(
        result.contains(&format!("{}Actions:{}", header_start(), RESET)),
        "Actions header should be colored"
    );
    assert!(
        result.contains(&format!("{}Options:{}", header_start(), RESET)),
        "Options header should be colored"
    );
    assert!(
        result.contains(&format!("{}start{}", literal_start(), RESET)),
        "start command should be colored"
    );
    assert!(
        result.contains(&format!("{}--output{}", literal_start(), RESET)),
        "--output flag should be colored"
    );
}

// ============================================================================
// Format Help Tests
// ============================================================================

#[test]
fn format_help_produces_output() {
    let help = format_help(crate::cli_command());
    assert!(!help.is_empty(), "format_help should produce output");
    assert!(
        help.contains("Actions:") || help.contains(&format!("{}Actions:{}", header_start(), RESET)),
        "Help should contain Actions section"
    );
}

#[test]
fn format_help_ends_with_newline() {
    let help = format_help(crate::cli_command());
    assert!(help.ends_with('\n'), "Help should end with newline");
}

// ============================================================================
// Subcommand Help Tests
// ============================================================================

/// Subcommand help must go through format_help (which forces Styles::plain()
/// before write_help, then applies colorize_help) rather than using clap's
/// default styled output. This test catches the bug where cloned subcommands
/// lost the parent's Styles::plain() and fell back to clap's default colored
/// styles.
#[test]
fn subcommand_help_uses_plain_base() {
    let cmd = crate::cli_command();
    let server = crate::find_subcommand(cmd, &["server", "start"]);
    let mut plain = server.styles(styles());
    let mut buf = Vec::new();
    plain.write_help(&mut buf).unwrap();
    let raw = String::from_utf8(buf).unwrap();
    assert!(
        !raw.contains("\x1b["),
        "write_help with Styles::plain() should not contain ANSI codes;\n\
         clap's default styles must not leak through.\nGot:\n{raw}"
    );
}

#[test]
fn subcommand_help_contains_expected_content() {
    let cmd = crate::cli_command();
    let server = crate::find_subcommand(cmd, &["server"]);
    let help = format_help(server);
    assert!(
        help.contains("Usage:"),
        "server help should contain Usage line, got:\n{help}"
    );
    assert!(
        help.contains("start"),
        "server help should mention start subcommand, got:\n{help}"
    );
}
