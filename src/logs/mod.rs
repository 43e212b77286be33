//! CI log compression.
//!
//! Turns a raw CI job log into a short failure summary:
//!
//! 1. [`classifier::classify`] picks the test framework from the job name or
//!    the log content.
//! 2. The framework's [`dialects::FailureScanner`] extracts failure records.
//! 3. [`compress::render`] formats the records with bounded output.
//!
//! Every step is a pure function over text. Nothing here can fail: a log in
//! an unrecognized format degrades to a truncated raw excerpt.
//!
//! ## Example
//!
//! ```
//! use prcontext::logs::{compress_job_log, parse_log, Framework};
//!
//! let log = "1) Error:\nFooTest#test_bar\n[test/foo_test.rb:10]: boom";
//! let result = parse_log(log, "ruby-tests");
//! assert_eq!(result.framework, Framework::Minitest);
//! assert_eq!(result.failures.len(), 1);
//!
//! let summary = compress_job_log(log, "ruby-tests");
//! assert!(summary.starts_with("Minitest Failures (1):"));
//! ```

pub mod classifier;
pub mod compress;
pub mod dialects;
pub mod types;

pub use classifier::classify;
pub use compress::render;
pub use dialects::FailureScanner;
pub use types::{FailureKind, FailureRecord, Framework, Location, ParseResult};

/// Classify and scan a log.
pub fn parse_log(content: &str, job_name_hint: &str) -> ParseResult {
    let framework = classify(job_name_hint, content);
    match framework.scanner() {
        Some(scanner) => {
            let lines: Vec<&str> = content.lines().collect();
            ParseResult::known(framework, scanner.scan(&lines))
        }
        None => ParseResult::unknown(content),
    }
}

/// Classify, scan and render a log in one call.
pub fn compress_job_log(content: &str, job_name_hint: &str) -> String {
    render(&parse_log(content, job_name_hint))
}
