//! Failure record types shared by the classifier, the dialect scanners and
//! the compressor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of characters kept from a log whose framework is unknown.
pub const RAW_FALLBACK_CHARS: usize = 2000;

/// Test framework dialect a CI log was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Framework {
    /// RSpec-style output (`1) description`, `Failure/Error:`, `# ./path:line`).
    RSpec,
    /// Minitest-style output (`1) Failure:` / `1) Error:` followed by the test name).
    Minitest,
    /// Jest-style output (`● test name` followed by a stack trace).
    Jest,
    /// No dialect could be recognized.
    Unknown,
}

impl Framework {
    /// Whether this is one of the three dialects a scanner exists for.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::RSpec => "RSpec",
            Self::Minitest => "Minitest",
            Self::Jest => "Jest",
            Self::Unknown => "Unknown",
        };
        write!(f, "{}", s)
    }
}

/// Distinguishes assertion failures from raised errors (Minitest only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    Failure,
    Error,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failure => write!(f, "Failure"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// A source reference pointing at the failing test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Build a location from regex captures, rejecting non-positive or
    /// overflowing line numbers.
    pub(crate) fn from_parts(file: &str, line: &str) -> Option<Self> {
        let line: u32 = line.parse().ok()?;
        if line == 0 || file.is_empty() {
            return None;
        }
        Some(Self::new(file, line))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One observed test failure.
///
/// `detail` keeps every captured line; truncation happens only when the
/// record is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Test description or name as reported by the dialect
    pub identifier: Option<String>,
    /// Source location of the failure, if one was found
    pub location: Option<Location>,
    /// Trimmed error/backtrace lines in log order
    pub detail: Vec<String>,
    /// Failure vs. error, for dialects that report it
    pub kind: Option<FailureKind>,
}

impl FailureRecord {
    /// Create a record for a freshly seen failure marker.
    pub fn new(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self {
            identifier: (!identifier.is_empty()).then_some(identifier),
            ..Self::default()
        }
    }

    /// Create a record that only knows its kind so far.
    pub fn with_kind(kind: FailureKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the location unless one is already recorded.
    pub(crate) fn locate_once(&mut self, location: Option<Location>) {
        if self.location.is_none() {
            self.location = location;
        }
    }

    /// Append a detail line; blank lines are dropped.
    pub(crate) fn push_detail(&mut self, line: &str) {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            self.detail.push(trimmed.to_string());
        }
    }
}

/// Classification plus extracted failures for one log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub framework: Framework,
    pub failures: Vec<FailureRecord>,
    /// Bounded raw excerpt, set only when the framework is unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_fallback: Option<String>,
}

impl ParseResult {
    /// Result for a recognized dialect.
    pub fn known(framework: Framework, failures: Vec<FailureRecord>) -> Self {
        debug_assert!(framework.is_known());
        Self {
            framework,
            failures,
            raw_fallback: None,
        }
    }

    /// Result for an unrecognized log, keeping the first
    /// [`RAW_FALLBACK_CHARS`] characters of the content.
    pub fn unknown(content: &str) -> Self {
        let end = content
            .char_indices()
            .nth(RAW_FALLBACK_CHARS)
            .map(|(idx, _)| idx)
            .unwrap_or(content.len());
        Self {
            framework: Framework::Unknown,
            failures: Vec::new(),
            raw_fallback: Some(content[..end].to_string()),
        }
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}
