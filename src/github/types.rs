//! GitHub REST payloads and the trimmed-down summaries handed to reviewers.
//!
//! `Api*` structs mirror the subset of each REST response we read. The
//! public summary types drop everything a reviewer does not need and flatten
//! nested objects like `user.login`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Length of abbreviated commit SHAs in summaries.
pub const SHORT_SHA_LEN: usize = 7;

// ── REST payloads ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct ApiUser {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    #[serde(default)]
    pub draft: bool,
    pub head: ApiRef,
    pub base: ApiRef,
    pub user: Option<ApiUser>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub mergeable_state: Option<String>,
    pub html_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiIssueComment {
    pub user: Option<ApiUser>,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiReviewComment {
    pub user: Option<ApiUser>,
    pub body: String,
    pub path: String,
    pub line: Option<u64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiReview {
    pub user: Option<ApiUser>,
    pub state: String,
    pub body: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiGitAuthor {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCommitDetail {
    pub message: String,
    pub author: Option<ApiGitAuthor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCommit {
    pub sha: String,
    pub commit: ApiCommitDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiWorkflowRuns {
    pub workflow_runs: Vec<WorkflowRunSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiStep {
    pub name: String,
    pub conclusion: Option<String>,
    pub number: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiJob {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub conclusion: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub html_url: Option<String>,
    #[serde(default)]
    pub steps: Vec<ApiStep>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiJobs {
    pub jobs: Vec<ApiJob>,
}

fn login(user: Option<ApiUser>) -> String {
    user.map(|u| u.login).unwrap_or_else(|| "ghost".to_string())
}

/// Whether a run or job conclusion counts as failed for review purposes.
pub fn is_failed_conclusion(conclusion: Option<&str>) -> bool {
    matches!(conclusion, Some("failure") | Some("cancelled"))
}

// ── Summaries ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestSummary {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    pub draft: bool,
    pub head: String,
    pub base: String,
    pub user: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub mergeable_state: Option<String>,
    pub html_url: String,
}

impl From<ApiPullRequest> for PullRequestSummary {
    fn from(pr: ApiPullRequest) -> Self {
        Self {
            number: pr.number,
            title: pr.title,
            body: pr.body,
            state: pr.state,
            draft: pr.draft,
            head: pr.head.ref_name,
            base: pr.base.ref_name,
            user: login(pr.user),
            created_at: pr.created_at,
            updated_at: pr.updated_at,
            mergeable_state: pr.mergeable_state,
            html_url: pr.html_url,
        }
    }
}

/// A conversation comment on the PR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub user: String,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ApiIssueComment> for Comment {
    fn from(c: ApiIssueComment) -> Self {
        Self {
            user: login(c.user),
            body: c.body,
            created_at: c.created_at,
        }
    }
}

/// An inline comment attached to a line of the diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewComment {
    pub user: String,
    pub body: String,
    pub path: String,
    pub line: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl From<ApiReviewComment> for ReviewComment {
    fn from(c: ApiReviewComment) -> Self {
        Self {
            user: login(c.user),
            body: c.body,
            path: c.path,
            line: c.line,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub user: String,
    pub state: String,
    pub body: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl From<ApiReview> for Review {
    fn from(r: ApiReview) -> Self {
        Self {
            user: login(r.user),
            state: r.state,
            body: r.body,
            submitted_at: r.submitted_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitSummary {
    /// Abbreviated SHA
    pub sha: String,
    pub message: String,
    pub author: Option<String>,
}

impl From<ApiCommit> for CommitSummary {
    fn from(c: ApiCommit) -> Self {
        let sha = c.sha.chars().take(SHORT_SHA_LEN).collect();
        Self {
            sha,
            message: c.commit.message,
            author: c.commit.author.map(|a| a.name),
        }
    }
}

/// Everything a reviewer reads about a PR besides CI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrDetails {
    pub pr: PullRequestSummary,
    pub comments: Vec<Comment>,
    pub review_comments: Vec<ReviewComment>,
    pub reviews: Vec<Review>,
    pub commits: Vec<CommitSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRunSummary {
    pub id: u64,
    pub name: Option<String>,
    pub status: Option<String>,
    pub conclusion: Option<String>,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowRunSummary {
    pub fn is_failed(&self) -> bool {
        is_failed_conclusion(self.conclusion.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedStep {
    pub name: String,
    pub conclusion: Option<String>,
    pub number: u64,
}

/// A job that failed or was cancelled, with only its failed steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedJob {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub conclusion: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub html_url: Option<String>,
    pub steps: Vec<FailedStep>,
}

impl FailedJob {
    /// Keep the job only if it failed, dropping steps that did not fail.
    pub(crate) fn from_api(job: ApiJob) -> Option<Self> {
        if !is_failed_conclusion(job.conclusion.as_deref()) {
            return None;
        }
        let steps = job
            .steps
            .into_iter()
            .filter(|step| step.conclusion.as_deref() == Some("failure"))
            .map(|step| FailedStep {
                name: step.name,
                conclusion: step.conclusion,
                number: step.number,
            })
            .collect();
        Some(Self {
            id: job.id,
            name: job.name,
            status: job.status,
            conclusion: job.conclusion,
            started_at: job.started_at,
            completed_at: job.completed_at,
            html_url: job.html_url,
            steps,
        })
    }
}

/// The run chosen for review plus how many of its jobs failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedRun {
    #[serde(flatten)]
    pub run: WorkflowRunSummary,
    pub failed_job_count: usize,
}

/// CI status for a PR's head commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CiSummary {
    NoRuns {
        message: String,
    },
    Report {
        tests_run: SelectedRun,
        failed_jobs: Vec<FailedJob>,
        all_runs: Vec<WorkflowRunSummary>,
    },
}

impl CiSummary {
    pub fn no_runs() -> Self {
        Self::NoRuns {
            message: "No CI runs found for this PR".to_string(),
        }
    }

    pub fn failed_jobs(&self) -> &[FailedJob] {
        match self {
            Self::NoRuns { .. } => &[],
            Self::Report { failed_jobs, .. } => failed_jobs,
        }
    }
}

/// Pick the run named `preferred` if present, otherwise the first run.
pub fn select_run<'a>(
    runs: &'a [WorkflowRunSummary],
    preferred: &str,
) -> Option<&'a WorkflowRunSummary> {
    runs.iter()
        .find(|run| run.name.as_deref() == Some(preferred))
        .or_else(|| runs.first())
}
