//! GitHub REST access for PR review context.
//!
//! [`GitHubClient`] fetches PR metadata, workflow runs, failing jobs and raw
//! job logs. Responses are reduced to the summary types in [`types`] before
//! they leave this module.

mod client;
pub mod types;

pub use client::GitHubClient;
pub use types::{
    CiSummary, Comment, CommitSummary, FailedJob, FailedStep, PrDetails, PullRequestSummary,
    Review, ReviewComment, SelectedRun, WorkflowRunSummary, is_failed_conclusion,
};
