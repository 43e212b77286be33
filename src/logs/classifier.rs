//! Framework detection from a job-name hint and the log content.

use super::types::Framework;

/// Job-name keywords, checked in order. The first dialect with a matching
/// keyword wins.
const HINT_KEYWORDS: &[(Framework, &[&str])] = &[
    (Framework::RSpec, &["rspec"]),
    (Framework::Minitest, &["ruby", "minitest"]),
    (Framework::Jest, &["js", "jest"]),
];

/// Classify a log by job name first, then by sniffing its content.
///
/// The hint is matched case-insensitively as a plain substring, so a hint
/// like `json-lint` selects Jest. Content sniffing is case-sensitive.
pub fn classify(job_name_hint: &str, content: &str) -> Framework {
    classify_hint(job_name_hint).unwrap_or_else(|| sniff_content(content))
}

/// Framework named by the job name, if any.
pub fn classify_hint(job_name_hint: &str) -> Option<Framework> {
    let hint = job_name_hint.to_lowercase();
    HINT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| hint.contains(kw)))
        .map(|(framework, _)| *framework)
}

/// Framework inferred from marker strings in the log body.
pub fn sniff_content(content: &str) -> Framework {
    if content.contains("RSpec") {
        Framework::RSpec
    } else if content.contains("Minitest") || content.contains("test/") {
        Framework::Minitest
    } else if content.contains("FAIL") && content.contains("jest") {
        Framework::Jest
    } else {
        Framework::Unknown
    }
}
