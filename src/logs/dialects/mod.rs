//! Line scanners for the supported test-framework dialects.
//!
//! Each dialect is a small state machine over the log's lines. Scanners make
//! a single forward pass, never backtrack, and never fail: text they do not
//! understand is skipped and a record still open at end of input is flushed
//! as-is.

mod jest;
mod minitest;
mod rspec;

pub use jest::JestScanner;
pub use minitest::MinitestScanner;
pub use rspec::RSpecScanner;

use super::types::{FailureRecord, Framework};

/// Extracts failure records from the lines of a CI log.
pub trait FailureScanner: Send + Sync {
    fn scan(&self, lines: &[&str]) -> Vec<FailureRecord>;

    fn framework(&self) -> Framework;
}

impl Framework {
    /// The scanner for this dialect, or `None` for [`Framework::Unknown`].
    pub fn scanner(&self) -> Option<&'static dyn FailureScanner> {
        match self {
            Framework::RSpec => Some(&RSpecScanner),
            Framework::Minitest => Some(&MinitestScanner),
            Framework::Jest => Some(&JestScanner),
            Framework::Unknown => None,
        }
    }
}
