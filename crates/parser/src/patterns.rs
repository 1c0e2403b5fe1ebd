// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in [`LogPattern`] table, ported one for one from the reference
//! server-log pattern set (player join/leave/chat/death/advancement, server
//! lifecycle lines, and performance warnings).

use crate::gate::{GateCondition, MatchFields};
use aetherius_core::Event;
use regex::{Captures, Regex};

/// A named regex plus the logic needed to turn a match into a domain event.
///
/// Capture groups are named to match the target event's field names
/// directly, which plays the same role the original's positional
/// `field_mapping` table did without needing a separate table.
pub struct LogPattern {
    pub name: &'static str,
    regex: Regex,
    gate: Option<GateCondition>,
    build: fn(&Captures<'_>) -> Option<Event>,
}

impl LogPattern {
    pub fn new(
        name: &'static str,
        pattern: &str,
        build: fn(&Captures<'_>) -> Option<Event>,
    ) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("built-in pattern must compile"),
            gate: None,
            build,
        }
    }

    pub fn with_gate(mut self, gate: GateCondition) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Try this pattern against `line`. Returns `None` if the regex does not
    /// match, the gate condition rejects the match, or event construction
    /// fails.
    pub fn try_parse(&self, line: &str) -> Option<Event> {
        let caps = self.regex.captures(line)?;
        if let Some(gate) = &self.gate {
            if !gate.eval(&captures_to_fields(&self.regex, &caps)) {
                return None;
            }
        }
        (self.build)(&caps)
    }
}

fn captures_to_fields(regex: &Regex, caps: &Captures<'_>) -> MatchFields {
    regex
        .capture_names()
        .flatten()
        .filter_map(|name| caps.name(name).map(|m| (name.to_string(), m.as_str().to_string())))
        .collect()
}

fn str_field(caps: &Captures<'_>, name: &str) -> Option<String> {
    caps.name(name).map(|m| m.as_str().to_string())
}

/// Derive lag-spike severity from duration in milliseconds, mirroring the
/// original's fixed thresholds.
fn lag_severity(duration_ms: f64) -> &'static str {
    if duration_ms > 5000.0 {
        "severe"
    } else if duration_ms > 1000.0 {
        "major"
    } else {
        "minor"
    }
}

/// The parser's default pattern set, tried in this order, first match wins.
pub fn built_in_patterns() -> Vec<LogPattern> {
    vec![
        LogPattern::new(
            "player_join_vanilla",
            r"(?P<player_name>\w+)\[/(?P<ip_address>[0-9.]+):(?P<port>\d+)\] logged in",
            |caps| {
                Some(Event::PlayerJoin {
                    player_name: str_field(caps, "player_name")?,
                    player_uuid: None,
                    ip_address: str_field(caps, "ip_address"),
                })
            },
        ),
        LogPattern::new("player_join_paper", r"(?P<player_name>\w+) joined the game", |caps| {
            Some(Event::PlayerJoin {
                player_name: str_field(caps, "player_name")?,
                player_uuid: None,
                ip_address: None,
            })
        }),
        LogPattern::new("player_leave", r"(?P<player_name>\w+) left the game", |caps| {
            Some(Event::PlayerLeave {
                player_name: str_field(caps, "player_name")?,
                player_uuid: None,
                leave_reason: None,
            })
        }),
        LogPattern::new("player_chat", r"<(?P<player_name>\w+)> (?P<message>.+)", |caps| {
            Some(Event::PlayerChat {
                player_name: str_field(caps, "player_name")?,
                message: str_field(caps, "message")?,
                channel: "global".to_string(),
            })
        }),
        LogPattern::new(
            "player_death_detailed",
            r"(?P<player_name>\w+) was (?:killed|slain) by (?P<killer>\w+)",
            |caps| {
                let killer = str_field(caps, "killer")?;
                Some(Event::PlayerDeath {
                    player_name: str_field(caps, "player_name")?,
                    death_message: format!("was slain by {killer}"),
                    killer: Some(killer),
                })
            },
        ),
        LogPattern::new(
            "player_death",
            r"(?P<player_name>\w+) (?P<death_message>died|was killed|was slain|drowned|burned|fell|starved|suffocated|was blown up|hit the ground|went up in flames|walked into fire|was struck by lightning)",
            |caps| {
                Some(Event::PlayerDeath {
                    player_name: str_field(caps, "player_name")?,
                    death_message: str_field(caps, "death_message")?,
                    killer: None,
                })
            },
        ),
        LogPattern::new(
            "player_advancement",
            r"(?P<player_name>\w+) has made the advancement \[(?P<advancement_title>[^\]]+)\]",
            |caps| {
                let title = str_field(caps, "advancement_title")?;
                Some(Event::PlayerAdvancement {
                    player_name: str_field(caps, "player_name")?,
                    advancement: title.clone(),
                    advancement_title: title,
                })
            },
        ),
        LogPattern::new(
            "server_started",
            r#"Done \((?P<startup_time>[0-9.]+)s\)! For help, type "help""#,
            |caps| {
                let startup_time: f64 = str_field(caps, "startup_time")?.parse().ok()?;
                Some(Event::ServerStarted { pid: 0, startup_time })
            },
        ),
        LogPattern::new("server_stopping", r"Stopping server", |_caps| {
            Some(Event::ServerStopping { reason: "server log".to_string(), force: false })
        }),
        LogPattern::new(
            "tick_time_warning",
            r"Can't keep up! Is the server overloaded\? Running (?P<duration>\d+)ms or (?P<tick_count>\d+) ticks behind",
            |caps| {
                let duration: f64 = str_field(caps, "duration")?.parse().ok()?;
                Some(Event::LagSpike { duration, severity: lag_severity(duration).to_string() })
            },
        ),
        LogPattern::new(
            "tps_report",
            r"TPS from last 1m, 5m, 15m: (?P<tps>[0-9.]+), (?P<tps_5m>[0-9.]+), (?P<tps_15m>[0-9.]+)",
            |caps| {
                let tps: f64 = str_field(caps, "tps")?.parse().ok()?;
                let tick_time = if tps > 0.0 { 1000.0 / tps } else { 0.0 };
                Some(Event::TickTime { tick_time, tps, warning_threshold: 18.0 })
            },
        ),
    ]
}

#[cfg(test)]
#[path = "patterns_tests.rs"]
mod tests;
