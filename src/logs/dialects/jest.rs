//! Jest failure scanner.
//!
//! ```text
//!   ● Button › renders the label
//!
//!     expect(received).toBe(expected)
//!
//!     Expected: "Save"
//!     Received: "Cancel"
//!
//!       at Object.<anonymous> (src/button.test.js:12:23)
//! ```
//!
//! Blank lines right after the bullet are tolerated; the first blank line
//! after some detail has been captured closes the record.

use super::FailureScanner;
use crate::logs::types::{FailureRecord, Framework, Location};
use regex::Regex;
use std::sync::LazyLock;

const BULLET: char = '●';

static FRAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+at\s+.*\((.*):(\d+):\d+\)").unwrap());

static AT_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*at\s+").unwrap());

#[derive(Debug, Clone, Copy, Default)]
pub struct JestScanner;

#[derive(Debug)]
enum State {
    Idle,
    Open(FailureRecord),
}

impl State {
    fn step(self, line: &str, out: &mut Vec<FailureRecord>) -> Self {
        if let Some(title) = line.trim_start().strip_prefix(BULLET) {
            self.flush(out);
            return State::Open(FailureRecord::new(title.trim()));
        }

        let State::Open(mut record) = self else {
            return State::Idle;
        };

        if let Some(caps) = FRAME_REGEX.captures(line) {
            record.locate_once(Location::from_parts(&caps[1], &caps[2]));
        } else if line.trim().is_empty() {
            if !record.detail.is_empty() {
                out.push(record);
                return State::Idle;
            }
        } else if !AT_LINE_REGEX.is_match(line) {
            record.push_detail(line);
        }
        State::Open(record)
    }

    fn flush(self, out: &mut Vec<FailureRecord>) {
        if let State::Open(record) = self {
            out.push(record);
        }
    }
}

impl FailureScanner for JestScanner {
    fn scan(&self, lines: &[&str]) -> Vec<FailureRecord> {
        let mut failures = Vec::new();
        let state = lines
            .iter()
            .fold(State::Idle, |state, line| state.step(line, &mut failures));
        state.flush(&mut failures);
        failures
    }

    fn framework(&self) -> Framework {
        Framework::Jest
    }
}
