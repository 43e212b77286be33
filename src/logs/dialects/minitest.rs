//! Minitest failure scanner.
//!
//! ```text
//!   1) Failure:
//! UserTest#test_email_is_required
//! Expected true to be falsy.
//!     [test/models/user_test.rb:15]
//!
//!   2) Error:
//! ...
//! ```
//!
//! The line right after the marker is the test name. Everything up to the
//! next numbered line is detail, and the last `[path:line]` reference seen
//! becomes the location.

use super::FailureScanner;
use crate::logs::types::{FailureKind, FailureRecord, Framework, Location};
use regex::Regex;
use std::sync::LazyLock;

static MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\)\s+(Failure|Error):").unwrap());

// Any numbered line ends a record, even when it is not a failure marker
static NUMBERED_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+\)").unwrap());

static LOCATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]+):(\d+)\]").unwrap());

#[derive(Debug, Clone, Copy, Default)]
pub struct MinitestScanner;

#[derive(Debug)]
enum State {
    Idle,
    AwaitingName(FailureRecord),
    Collecting(FailureRecord),
}

impl State {
    fn step(self, line: &str, out: &mut Vec<FailureRecord>) -> Self {
        if let Some(caps) = MARKER_REGEX.captures(line) {
            self.flush(out);
            let kind = match &caps[1] {
                "Failure" => FailureKind::Failure,
                _ => FailureKind::Error,
            };
            return State::AwaitingName(FailureRecord::with_kind(kind));
        }

        match self {
            State::Idle => State::Idle,
            State::AwaitingName(mut record) => {
                let name = line.trim();
                record.identifier = (!name.is_empty()).then(|| name.to_string());
                State::Collecting(record)
            }
            State::Collecting(mut record) => {
                if NUMBERED_REGEX.is_match(line) {
                    out.push(record);
                    return State::Idle;
                }
                if let Some(location) = LOCATION_REGEX
                    .captures(line)
                    .and_then(|caps| Location::from_parts(&caps[1], &caps[2]))
                {
                    record.location = Some(location);
                }
                record.push_detail(line);
                State::Collecting(record)
            }
        }
    }

    fn flush(self, out: &mut Vec<FailureRecord>) {
        match self {
            State::Idle => {}
            State::AwaitingName(record) | State::Collecting(record) => out.push(record),
        }
    }
}

impl FailureScanner for MinitestScanner {
    fn scan(&self, lines: &[&str]) -> Vec<FailureRecord> {
        let mut failures = Vec::new();
        let state = lines
            .iter()
            .fold(State::Idle, |state, line| state.step(line, &mut failures));
        state.flush(&mut failures);
        failures
    }

    fn framework(&self) -> Framework {
        Framework::Minitest
    }
}
