//! CI commands: `prcontext ci`, `prcontext jobs`, `prcontext logs`.

use anyhow::{Context, Result};
use prcontext::logs::compress_job_log;
use std::path::Path;

use super::{Session, print_json};
use crate::Cli;

pub async fn cmd_ci(cli: &Cli, project_dir: &Path, number: u64) -> Result<()> {
    let session = Session::open(cli, project_dir).await?;
    let summary = session
        .client
        .ci_summary(
            &session.slug,
            number,
            &session.settings.ci.preferred_workflow,
            session.settings.ci.runs_per_page,
        )
        .await
        .context("Failed to get CI summary")?;
    print_json(&summary)
}

pub async fn cmd_jobs(cli: &Cli, project_dir: &Path, run_id: u64) -> Result<()> {
    let session = Session::open(cli, project_dir).await?;
    let jobs = session
        .client
        .failing_jobs(&session.slug, run_id)
        .await
        .context("Failed to fetch failing jobs")?;
    print_json(&jobs)
}

pub async fn cmd_logs(cli: &Cli, project_dir: &Path, job_id: u64, job_name: &str) -> Result<()> {
    let session = Session::open(cli, project_dir).await?;
    let raw = session
        .client
        .job_logs(&session.slug, job_id)
        .await
        .context("Failed to fetch job logs")?;
    tracing::debug!(job_id, bytes = raw.len(), "Fetched job log");
    println!("{}", compress_job_log(&raw, job_name));
    Ok(())
}
