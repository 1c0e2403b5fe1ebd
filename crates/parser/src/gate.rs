// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed stand-in for the original parser's `eval()`-based pattern gate.
//!
//! The original let a pattern's YAML definition supply an arbitrary Python
//! expression evaluated against the match's captures. Arbitrary code
//! evaluation has no safe equivalent here, so gates are instead built from
//! this small comparison grammar and evaluated against the named captures a
//! [`crate::LogPattern`] produced.

use std::collections::HashMap;

/// Named regex captures plus any derived fields, keyed by field name.
pub type MatchFields = HashMap<String, String>;

/// A boolean condition over [`MatchFields`], replacing the original's
/// free-form `eval(condition, {match, line, data})`.
#[derive(Debug, Clone)]
pub enum GateCondition {
    Equals(String, String),
    NotEquals(String, String),
    Contains(String, String),
    NumericGreaterThan(String, f64),
    NumericLessThan(String, f64),
    And(Box<GateCondition>, Box<GateCondition>),
    Or(Box<GateCondition>, Box<GateCondition>),
    Not(Box<GateCondition>),
}

impl GateCondition {
    pub fn eval(&self, fields: &MatchFields) -> bool {
        match self {
            GateCondition::Equals(key, want) => {
                fields.get(key).is_some_and(|v| v == want)
            }
            GateCondition::NotEquals(key, want) => {
                fields.get(key).is_none_or(|v| v != want)
            }
            GateCondition::Contains(key, needle) => {
                fields.get(key).is_some_and(|v| v.contains(needle.as_str()))
            }
            GateCondition::NumericGreaterThan(key, threshold) => fields
                .get(key)
                .and_then(|v| v.parse::<f64>().ok())
                .is_some_and(|v| v > *threshold),
            GateCondition::NumericLessThan(key, threshold) => fields
                .get(key)
                .and_then(|v| v.parse::<f64>().ok())
                .is_some_and(|v| v < *threshold),
            GateCondition::And(a, b) => a.eval(fields) && b.eval(fields),
            GateCondition::Or(a, b) => a.eval(fields) || b.eval(fields),
            GateCondition::Not(a) => !a.eval(fields),
        }
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
