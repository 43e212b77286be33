//! PR-level commands: `prcontext pr`, `prcontext tickets`, `prcontext context`.

use anyhow::{Context, Result};
use prcontext::context::full_review_context;
use prcontext::tickets::ticket_summary;
use std::path::Path;

use super::{Session, print_json};
use crate::Cli;

pub async fn cmd_pr(cli: &Cli, project_dir: &Path, number: u64) -> Result<()> {
    let session = Session::open(cli, project_dir).await?;
    let details = session
        .client
        .pr_details(&session.slug, number)
        .await
        .context("Failed to fetch PR details")?;
    print_json(&details)
}

pub async fn cmd_tickets(cli: &Cli, project_dir: &Path, number: u64) -> Result<()> {
    let session = Session::open(cli, project_dir).await?;
    let details = session
        .client
        .pr_details(&session.slug, number)
        .await
        .context("Failed to fetch PR details")?;
    println!("{}", ticket_summary(&details));
    Ok(())
}

pub async fn cmd_context(
    cli: &Cli,
    project_dir: &Path,
    number: u64,
    include_logs: bool,
) -> Result<()> {
    let session = Session::open(cli, project_dir).await?;
    let context = full_review_context(
        &session.client,
        &session.slug,
        number,
        include_logs,
        &session.settings,
    )
    .await
    .context("Failed to assemble review context")?;
    print_json(&context)
}
