// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line-cleaning and relevance rules for matching server log output back to
//! the command that most likely produced it.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d{2}:\d{2}:\d{2}\]").expect("regex compiles"));
static LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(INFO|WARN|WARNING|ERROR|DEBUG)\]").expect("regex compiles"));
static ANSI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("regex compiles"));
static THREAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[Server thread/[^\]]+\]").expect("regex compiles"));
static PLAYER_LIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]{2,15}(,\s*[a-zA-Z_][a-zA-Z0-9_]{2,15})*$")
        .expect("regex compiles")
});

static GENERIC_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)Unknown command",
        r"(?i)Incorrect argument for command",
        r"(?i)Permission denied",
        r"(?i)Command not found",
        r"(?i)Syntax error",
        r"(?i)Usage:",
    ])
});

/// Base-verb-specific patterns a line must match to be captured as that
/// command's output, compiled once and keyed by the command's first word.
static COMMAND_PATTERNS: LazyLock<HashMap<&'static str, Vec<Regex>>> = LazyLock::new(|| {
    HashMap::from([
        (
            "list",
            compile_all(&[
                r"(?i)There are \d+/\d+ players online",
                r"(?i)There are \d+ of a max of \d+ players online",
                r"(?i)There are \d+ players online",
                r"(?i)There are no players online",
                r"(?i)Players online \(\d+\)",
            ]),
        ),
        ("say", compile_all(&[r"(?i)\[Server\]", r"(?i)Server:"])),
        (
            "give",
            compile_all(&[
                r"(?i)Gave \d+ .+ to .+",
                r"(?i)Could not give .+ to .+",
                r"(?i)Unknown item",
                r"(?i)Player .+ not found",
            ]),
        ),
        (
            "tp",
            compile_all(&[
                r"(?i)Teleported .+ to",
                r"(?i)Could not teleport",
                r"(?i)Player .+ not found",
                r"(?i)Invalid coordinates",
            ]),
        ),
        (
            "gamemode",
            compile_all(&[
                r"(?i)Set .+'s game mode to",
                r"(?i)Player .+ not found",
                r"(?i)Invalid game mode",
            ]),
        ),
        ("time", compile_all(&[r"(?i)Set the time to", r"(?i)Added \d+ to the time"])),
        ("weather", compile_all(&[r"(?i)Set the weather to", r"(?i)Weather set to"])),
        ("difficulty", compile_all(&[r"(?i)Set the difficulty to", r"(?i)Difficulty set to"])),
    ])
});

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).expect("built-in pattern must compile")).collect()
}

/// Strip ANSI colour codes and the timestamp/level/thread prefixes a raw
/// server log line carries, leaving just the message text.
pub fn clean_line(line: &str) -> String {
    let mut s = TIMESTAMP_RE.replace_all(line, "").into_owned();
    s = LEVEL_RE.replace_all(&s, "").into_owned();
    s = ANSI_RE.replace_all(&s, "").into_owned();
    s = THREAD_RE.replace_all(&s, "").into_owned();
    s.trim().to_string()
}

/// Does `clean_line` output look relevant to `base_verb`'s output?
pub fn is_line_relevant(base_verb: &str, clean_line: &str) -> bool {
    if let Some(patterns) = COMMAND_PATTERNS.get(base_verb) {
        if patterns.iter().any(|re| re.is_match(clean_line)) {
            return true;
        }
    }
    if GENERIC_PATTERNS.iter().any(|re| re.is_match(clean_line)) {
        return true;
    }
    base_verb == "list" && PLAYER_LIST_RE.is_match(clean_line)
}

#[cfg(test)]
#[path = "output_capture_tests.rs"]
mod tests;
