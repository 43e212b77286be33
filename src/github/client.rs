use super::types::{
    ApiCommit, ApiIssueComment, ApiJobs, ApiPullRequest, ApiReview, ApiReviewComment,
    ApiWorkflowRuns, CiSummary, FailedJob, PrDetails, SelectedRun, WorkflowRunSummary, select_run,
};
use crate::config::GithubSettings;
use crate::errors::GitHubError;
use crate::repo::RepoSlug;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

const ACCEPT_JSON: &str = "application/vnd.github+json";
const PAGE_SIZE: &str = "100";

/// Thin async client over the GitHub REST endpoints used for PR review.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>, settings: &GithubSettings) -> Result<Self, GitHubError> {
        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(GitHubError::Client)?;
        Ok(Self {
            http,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn repo_url(&self, slug: &RepoSlug, path: &str) -> String {
        format!("{}/repos/{}/{}/{}", self.api_url, slug.owner, slug.repo, path)
    }

    async fn send(
        &self,
        what: &'static str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, GitHubError> {
        debug!(what, url, "GitHub request");
        let resp = self
            .http
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", ACCEPT_JSON)
            .query(query)
            .send()
            .await
            .map_err(|source| GitHubError::Request { what, source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GitHubError::Status { what, status });
        }
        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        what: &'static str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, GitHubError> {
        self.send(what, url, query)
            .await?
            .json::<T>()
            .await
            .map_err(|source| GitHubError::Decode { what, source })
    }

    async fn pull_request(&self, slug: &RepoSlug, number: u64) -> Result<ApiPullRequest, GitHubError> {
        self.get_json("pull request", &self.repo_url(slug, &format!("pulls/{}", number)), &[])
            .await
    }

    /// Fetch the PR with its comments, inline review comments, reviews and
    /// commits. The five requests run concurrently.
    pub async fn pr_details(&self, slug: &RepoSlug, number: u64) -> Result<PrDetails, GitHubError> {
        let page = [("per_page", PAGE_SIZE)];
        let comments_url = self.repo_url(slug, &format!("issues/{}/comments", number));
        let review_comments_url = self.repo_url(slug, &format!("pulls/{}/comments", number));
        let reviews_url = self.repo_url(slug, &format!("pulls/{}/reviews", number));
        let commits_url = self.repo_url(slug, &format!("pulls/{}/commits", number));

        let (pr, comments, review_comments, reviews, commits) = tokio::try_join!(
            self.pull_request(slug, number),
            self.get_json::<Vec<ApiIssueComment>>("comments", &comments_url, &page),
            self.get_json::<Vec<ApiReviewComment>>("review comments", &review_comments_url, &page),
            self.get_json::<Vec<ApiReview>>("reviews", &reviews_url, &page),
            self.get_json::<Vec<ApiCommit>>("commits", &commits_url, &page),
        )?;

        info!(%slug, number, "Fetched PR details");
        Ok(PrDetails {
            pr: pr.into(),
            comments: comments.into_iter().map(Into::into).collect(),
            review_comments: review_comments.into_iter().map(Into::into).collect(),
            reviews: reviews.into_iter().map(Into::into).collect(),
            commits: commits.into_iter().map(Into::into).collect(),
        })
    }

    /// Workflow runs for the PR's head commit, newest first.
    pub async fn ci_runs(
        &self,
        slug: &RepoSlug,
        number: u64,
        per_page: u32,
    ) -> Result<Vec<WorkflowRunSummary>, GitHubError> {
        let pr = self.pull_request(slug, number).await?;
        let per_page = per_page.to_string();
        let runs: ApiWorkflowRuns = self
            .get_json(
                "workflow runs",
                &self.repo_url(slug, "actions/runs"),
                &[("head_sha", pr.head.sha.as_str()), ("per_page", per_page.as_str())],
            )
            .await?;
        debug!(count = runs.workflow_runs.len(), sha = %pr.head.sha, "Fetched workflow runs");
        Ok(runs.workflow_runs)
    }

    /// Failed or cancelled jobs of a workflow run, each with its failed steps.
    pub async fn failing_jobs(
        &self,
        slug: &RepoSlug,
        run_id: u64,
    ) -> Result<Vec<FailedJob>, GitHubError> {
        let jobs: ApiJobs = self
            .get_json(
                "workflow jobs",
                &self.repo_url(slug, &format!("actions/runs/{}/jobs", run_id)),
                &[("filter", "latest")],
            )
            .await?;
        Ok(jobs.jobs.into_iter().filter_map(FailedJob::from_api).collect())
    }

    /// Raw text log of a single job.
    pub async fn job_logs(&self, slug: &RepoSlug, job_id: u64) -> Result<String, GitHubError> {
        let what = "job logs";
        let resp = self
            .send(what, &self.repo_url(slug, &format!("actions/jobs/{}/logs", job_id)), &[])
            .await?;
        resp.text()
            .await
            .map_err(|source| GitHubError::Decode { what, source })
    }

    /// Summarize CI for a PR: pick the preferred workflow run (or the
    /// latest one) and list its failing jobs if it did not succeed.
    pub async fn ci_summary(
        &self,
        slug: &RepoSlug,
        number: u64,
        preferred_workflow: &str,
        runs_per_page: u32,
    ) -> Result<CiSummary, GitHubError> {
        let runs = self.ci_runs(slug, number, runs_per_page).await?;
        let Some(selected) = select_run(&runs, preferred_workflow).cloned() else {
            return Ok(CiSummary::no_runs());
        };

        let failed_jobs = if selected.is_failed() {
            self.failing_jobs(slug, selected.id).await?
        } else {
            Vec::new()
        };

        Ok(CiSummary::Report {
            tests_run: SelectedRun {
                failed_job_count: failed_jobs.len(),
                run: selected,
            },
            failed_jobs,
            all_runs: runs,
        })
    }
}
