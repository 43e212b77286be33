//! CLI command implementations.
//!
//! | Module    | Commands handled               |
//! |-----------|--------------------------------|
//! | `pr`      | `Pr`, `Tickets`, `Context`     |
//! | `ci`      | `Ci`, `Jobs`, `Logs`           |
//! | `parse`   | `Parse`                        |
//! | `config`  | `Config`                       |

pub mod ci;
pub mod config;
pub mod parse;
pub mod pr;

pub use ci::{cmd_ci, cmd_jobs, cmd_logs};
pub use config::cmd_config;
pub use parse::cmd_parse;
pub use pr::{cmd_context, cmd_pr, cmd_tickets};

use anyhow::{Context, Result};
use prcontext::config::{Settings, resolve_token};
use prcontext::github::GitHubClient;
use prcontext::repo::{RepoSlug, resolve_repo};
use serde::Serialize;
use std::path::Path;

use crate::Cli;

/// Everything a GitHub-backed command needs.
pub struct Session {
    pub client: GitHubClient,
    pub slug: RepoSlug,
    pub settings: Settings,
}

impl Session {
    pub async fn open(cli: &Cli, project_dir: &Path) -> Result<Self> {
        let settings = Settings::resolve(project_dir)?;
        for warning in settings.validate() {
            tracing::warn!("{}", warning);
        }
        let slug = resolve_repo(cli.owner.as_deref(), cli.repo.as_deref(), project_dir)?;
        let token = resolve_token().await?;
        let client = GitHubClient::new(token, &settings.github)
            .context("Failed to create GitHub client")?;
        tracing::debug!(%slug, api_url = %settings.github.api_url, "Session ready");
        Ok(Self {
            client,
            slug,
            settings,
        })
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}
