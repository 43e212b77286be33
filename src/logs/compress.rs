//! Rendering of parse results into compact, bounded text.

use super::types::{FailureRecord, Framework, ParseResult, RAW_FALLBACK_CHARS};
use std::fmt::Write;

/// Maximum number of detail lines rendered per failure.
pub const MAX_DETAIL_LINES: usize = 3;

/// Prefix of the output for logs whose framework could not be recognized.
pub const UNKNOWN_FRAMEWORK_MARKER: &str = "Unknown test framework; raw log excerpt";

/// Render a parse result for a size-limited consumer.
///
/// Never fails. Each failure renders to at most three lines of text; the
/// unknown-framework path is capped at the raw excerpt length.
pub fn render(result: &ParseResult) -> String {
    if result.framework == Framework::Unknown {
        let raw = result.raw_fallback.as_deref().unwrap_or_default();
        return format!(
            "{} (first {} chars):\n{}",
            UNKNOWN_FRAMEWORK_MARKER, RAW_FALLBACK_CHARS, raw
        );
    }

    if result.failures.is_empty() {
        return format!("No failures found in {} logs", result.framework);
    }

    let mut out = format!(
        "{} Failures ({}):\n\n",
        result.framework,
        result.failures.len()
    );
    for (index, failure) in result.failures.iter().enumerate() {
        render_failure(&mut out, index + 1, failure);
    }
    out
}

fn render_failure(out: &mut String, number: usize, failure: &FailureRecord) {
    // Writing to a String cannot fail
    let _ = writeln!(out, "{}. {}", number, title(failure));
    if let Some(location) = &failure.location {
        let _ = writeln!(out, "   File: {}", location);
    }
    if !failure.detail.is_empty() {
        let shown: Vec<&str> = failure
            .detail
            .iter()
            .take(MAX_DETAIL_LINES)
            .map(String::as_str)
            .collect();
        let _ = writeln!(out, "   Error: {}", shown.join(" "));
    }
    out.push('\n');
}

fn title(failure: &FailureRecord) -> String {
    match (&failure.identifier, failure.kind) {
        (Some(identifier), _) => identifier.clone(),
        (None, Some(kind)) => format!("({}, unnamed test)", kind),
        (None, None) => "(unnamed test)".to_string(),
    }
}
