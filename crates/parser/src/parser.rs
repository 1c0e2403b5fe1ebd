// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Converts raw server stdout lines into domain events.

use crate::patterns::{built_in_patterns, LogPattern};
use aetherius_core::{Envelope, Event};
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;

/// Parses Minecraft-server-style log lines into [`Envelope`]s.
///
/// Every call to [`LogParser::parse`] emits a `LogLine` event first, then at
/// most one more event from the first pattern that matches, falling back to
/// `UnknownLog` when nothing did.
pub struct LogParser {
    patterns: Vec<LogPattern>,
    timestamp_re: Regex,
    level_re: Regex,
    thread_re: Regex,
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LogParser {
    pub fn new() -> Self {
        Self {
            patterns: built_in_patterns(),
            timestamp_re: Regex::new(r"\[(\d{2}:\d{2}:\d{2})\]|\[(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\]")
                .expect("timestamp regex compiles"),
            level_re: Regex::new(r"\[(INFO|WARN|ERROR|DEBUG|TRACE)\]").expect("level regex compiles"),
            thread_re: Regex::new(r"\[[^/\]]+/[^\]]+\]").expect("thread regex compiles"),
        }
    }

    /// Registers an additional pattern, tried after all built-ins.
    pub fn add_pattern(&mut self, pattern: LogPattern) {
        self.patterns.push(pattern);
    }

    pub fn parse(&self, line: &str) -> Vec<Envelope> {
        let mut events = Vec::with_capacity(2);

        let log_timestamp = self.extract_timestamp(line);
        let level = self.extract_level(line);
        let message = self.extract_message(line);

        events.push(Envelope::new(Event::LogLine {
            raw: line.to_string(),
            level: level.clone(),
            log_timestamp,
            message,
        }));

        let mut attempted = Vec::with_capacity(self.patterns.len());
        let mut matched = false;
        for pattern in &self.patterns {
            attempted.push(pattern.name.to_string());
            if let Some(event) = pattern.try_parse(line) {
                events.push(Envelope::new(event));
                matched = true;
                break;
            }
        }

        if !matched && !line.trim().is_empty() {
            events.push(Envelope::new(Event::UnknownLog {
                raw_line: line.to_string(),
                attempted_patterns: attempted,
            }));
        }

        events
    }

    fn extract_timestamp(&self, line: &str) -> Option<DateTime<Utc>> {
        let caps = self.timestamp_re.captures(line)?;
        if let Some(full) = caps.get(2) {
            let naive = chrono::NaiveDateTime::parse_from_str(full.as_str(), "%Y-%m-%d %H:%M:%S").ok()?;
            return Some(Utc.from_utc_datetime(&naive));
        }
        let time_only = caps.get(1)?;
        let time = NaiveTime::parse_from_str(time_only.as_str(), "%H:%M:%S").ok()?;
        let today = Utc::now().date_naive();
        Some(Utc.from_utc_datetime(&today.and_time(time)))
    }

    fn extract_level(&self, line: &str) -> String {
        self.level_re
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "INFO".to_string())
    }

    fn extract_message(&self, line: &str) -> String {
        let mut message = self.timestamp_re.replace_all(line, "").trim().to_string();
        message = self.level_re.replace_all(&message, "").trim().to_string();
        message = self.thread_re.replace_all(&message, "").trim().to_string();
        let stripped = message.trim_start_matches(|c: char| c == ':' || c == ' ').to_string();
        if stripped.is_empty() {
            line.to_string()
        } else {
            stripped
        }
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
