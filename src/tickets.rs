//! Ticket reference extraction (`CRM-3628`, `GQ-1234`, ...) from PR text.
//!
//! Only IDs are returned; looking tickets up is left to the caller's
//! issue-tracker tooling.

use crate::github::PrDetails;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static TICKET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]{2,10}-\d+)\b").unwrap());

/// Ticket IDs in `text`, de-duplicated in first-seen order.
pub fn extract_tickets(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    TICKET_REGEX
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Ticket IDs mentioned in the PR body, commit messages and comments.
pub fn tickets_from_pr(details: &PrDetails) -> Vec<String> {
    let sources = details
        .pr
        .body
        .iter()
        .map(String::as_str)
        .chain(details.commits.iter().map(|c| c.message.as_str()))
        .chain(details.comments.iter().filter_map(|c| c.body.as_deref()));

    let mut seen = HashSet::new();
    let mut tickets = Vec::new();
    for text in sources {
        for id in extract_tickets(text) {
            if seen.insert(id.clone()) {
                tickets.push(id);
            }
        }
    }
    tickets
}

/// Human-readable list of tickets referenced by the PR.
pub fn ticket_summary(details: &PrDetails) -> String {
    let tickets = tickets_from_pr(details);
    if tickets.is_empty() {
        return "No tickets found in PR".to_string();
    }

    let mut summary = format!("Tickets Found ({}):\n\n", tickets.len());
    for ticket in &tickets {
        summary.push_str("- ");
        summary.push_str(ticket);
        summary.push('\n');
    }
    summary.push_str("\nNote: Use your issue tracker to fetch full ticket details for these IDs.");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{Comment, CommitSummary, PullRequestSummary};
    use chrono::Utc;

    fn details(body: Option<&str>, commits: &[&str], comments: &[&str]) -> PrDetails {
        PrDetails {
            pr: PullRequestSummary {
                number: 1,
                title: "t".into(),
                body: body.map(str::to_string),
                state: "open".into(),
                draft: false,
                head: "feature".into(),
                base: "main".into(),
                user: "octocat".into(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
                mergeable_state: None,
                html_url: "https://github.com/o/r/pull/1".into(),
            },
            comments: comments
                .iter()
                .map(|body| Comment {
                    user: "u".into(),
                    body: Some(body.to_string()),
                    created_at: Utc::now(),
                })
                .collect(),
            review_comments: vec![],
            reviews: vec![],
            commits: commits
                .iter()
                .map(|message| CommitSummary {
                    sha: "abc1234".into(),
                    message: message.to_string(),
                    author: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_extract_tickets_dedupes_in_order() {
        assert_eq!(
            extract_tickets("Fixes CRM-3628 and GQ-1234, see CRM-3628"),
            vec!["CRM-3628", "GQ-1234"]
        );
    }

    #[test]
    fn test_extract_tickets_requires_word_boundary_and_uppercase() {
        assert!(extract_tickets("crm-12 and X-1 and ABCDEFGHIJK-1").is_empty());
        assert!(extract_tickets("").is_empty());
        assert_eq!(extract_tickets("(ENG-9)"), vec!["ENG-9"]);
    }

    #[test]
    fn test_tickets_from_pr_scans_all_sources() {
        let pr = details(Some("Closes ENG-1"), &["ENG-2: wip", "ENG-1 again"], &["see OPS-3"]);
        assert_eq!(tickets_from_pr(&pr), vec!["ENG-1", "ENG-2", "OPS-3"]);
    }

    #[test]
    fn test_summary_without_tickets() {
        let pr = details(None, &["refactor"], &[]);
        assert_eq!(ticket_summary(&pr), "No tickets found in PR");
    }

    #[test]
    fn test_summary_lists_tickets() {
        let pr = details(Some("ENG-1"), &[], &[]);
        let summary = ticket_summary(&pr);
        assert!(summary.starts_with("Tickets Found (1):\n\n- ENG-1\n"));
    }
}
