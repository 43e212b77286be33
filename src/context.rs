//! Full review context assembly.
//!
//! Combines PR details, the ticket summary and the CI summary into one
//! document, optionally with compressed logs of the failing jobs. Job logs
//! are fetched concurrently, one future per job; a failed fetch is recorded
//! on that job's entry and never affects the others.

use crate::config::Settings;
use crate::github::{CiSummary, FailedJob, GitHubClient, PrDetails};
use crate::logs::compress_job_log;
use crate::repo::RepoSlug;
use crate::tickets::ticket_summary;
use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Anything that can produce the raw log of a CI job.
#[async_trait]
pub trait JobLogSource: Send + Sync {
    async fn fetch_job_log(&self, slug: &RepoSlug, job_id: u64) -> Result<String>;
}

#[async_trait]
impl JobLogSource for GitHubClient {
    async fn fetch_job_log(&self, slug: &RepoSlug, job_id: u64) -> Result<String> {
        Ok(self.job_logs(slug, job_id).await?)
    }
}

/// Outcome of fetching and compressing one job's log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobLogEntry {
    pub job_name: String,
    pub job_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobLogEntry {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Fetch and compress the logs of up to `limit` jobs concurrently.
///
/// Entries come back in the same order as `jobs`.
pub async fn collect_job_logs<S: JobLogSource + ?Sized>(
    source: &S,
    slug: &RepoSlug,
    jobs: &[FailedJob],
    limit: usize,
) -> Vec<JobLogEntry> {
    let futures = jobs.iter().take(limit).map(|job| async move {
        match source.fetch_job_log(slug, job.id).await {
            Ok(raw) => JobLogEntry {
                job_name: job.name.clone(),
                job_id: job.id,
                logs: Some(compress_job_log(&raw, &job.name)),
                error: None,
            },
            Err(e) => {
                warn!(job_id = job.id, job = %job.name, error = %e, "Failed to fetch job logs");
                JobLogEntry {
                    job_name: job.name.clone(),
                    job_id: job.id,
                    logs: None,
                    error: Some(format!("Failed to fetch job logs: {:#}", e)),
                }
            }
        }
    });
    join_all(futures).await
}

/// Everything an automated reviewer needs for one PR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewContext {
    #[serde(flatten)]
    pub details: PrDetails,
    pub tickets: String,
    pub ci: CiSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failing_job_logs: Option<Vec<JobLogEntry>>,
}

/// Assemble the review context for a PR.
///
/// PR details and the CI summary are fetched in parallel. When
/// `include_logs` is set and CI has failing jobs, their compressed logs are
/// attached.
pub async fn full_review_context(
    client: &GitHubClient,
    slug: &RepoSlug,
    number: u64,
    include_logs: bool,
    settings: &Settings,
) -> Result<ReviewContext> {
    let (details, ci) = tokio::try_join!(
        client.pr_details(slug, number),
        client.ci_summary(
            slug,
            number,
            &settings.ci.preferred_workflow,
            settings.ci.runs_per_page
        ),
    )?;

    let tickets = ticket_summary(&details);

    let failing_job_logs = if include_logs && !ci.failed_jobs().is_empty() {
        let entries =
            collect_job_logs(client, slug, ci.failed_jobs(), settings.logs.max_job_logs).await;
        info!(
            jobs = entries.len(),
            errors = entries.iter().filter(|e| e.is_error()).count(),
            "Collected failing job logs"
        );
        Some(entries)
    } else {
        None
    };

    Ok(ReviewContext {
        details,
        tickets,
        ci,
        failing_job_logs,
    })
}
