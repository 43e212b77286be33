//! RSpec failure scanner.
//!
//! ```text
//!   1) Widget renders the title
//!      Failure/Error: expect(page).to have_content("Title")
//!        expected to find text "Title"
//!      # ./spec/features/widget_spec.rb:42:in `block (2 levels)'
//!
//! Finished in 1.2 seconds
//! ```
//!
//! A backtrace line sets the record's location only while the scanner is not
//! capturing detail. RSpec normally prints the backtrace *after*
//! `Failure/Error:`, in which case it ends up in `detail` and the record has
//! no location. This is a known limitation of the format handling.

use super::FailureScanner;
use crate::logs::types::{FailureRecord, Framework, Location};
use regex::Regex;
use std::sync::LazyLock;

static MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\)\s+(.*)").unwrap());

static BACKTRACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s+\./(.+?):(\d+)").unwrap());

const FAILURE_ERROR_PREFIX: &str = "Failure/Error:";
const FINISHED_PREFIX: &str = "Finished in";

#[derive(Debug, Clone, Copy, Default)]
pub struct RSpecScanner;

#[derive(Debug)]
enum State {
    Idle,
    InRecord(FailureRecord),
    Capturing(FailureRecord),
}

impl State {
    fn step(self, line: &str, out: &mut Vec<FailureRecord>) -> Self {
        if let Some(caps) = MARKER_REGEX.captures(line) {
            self.flush(out);
            return State::InRecord(FailureRecord::new(caps[1].trim()));
        }

        match self {
            State::Idle => State::Idle,
            State::InRecord(mut record) => {
                if line.trim_start().starts_with(FAILURE_ERROR_PREFIX) {
                    return State::Capturing(record);
                }
                if let Some(caps) = BACKTRACE_REGEX.captures(line) {
                    record.locate_once(Location::from_parts(&caps[1], &caps[2]));
                }
                State::InRecord(record)
            }
            State::Capturing(mut record) => {
                if line.starts_with(FINISHED_PREFIX) {
                    // The record stays open so a later backtrace can still locate it
                    return State::InRecord(record);
                }
                record.push_detail(line);
                State::Capturing(record)
            }
        }
    }

    fn flush(self, out: &mut Vec<FailureRecord>) {
        match self {
            State::Idle => {}
            State::InRecord(record) | State::Capturing(record) => out.push(record),
        }
    }
}

impl FailureScanner for RSpecScanner {
    fn scan(&self, lines: &[&str]) -> Vec<FailureRecord> {
        let mut failures = Vec::new();
        let state = lines
            .iter()
            .fold(State::Idle, |state, line| state.step(line, &mut failures));
        state.flush(&mut failures);
        failures
    }

    fn framework(&self) -> Framework {
        Framework::RSpec
    }
}
