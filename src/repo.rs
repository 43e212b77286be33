//! Owner/repository resolution from explicit arguments or the `origin`
//! remote of the working copy.

use crate::errors::RepoError;
use git2::Repository;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// A GitHub `owner/repo` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Parse the owner and repository out of a GitHub remote URL.
///
/// Supported forms:
/// - `git@github.com:owner/repo.git`
/// - `https://github.com/owner/repo.git`
/// - `https://user@github.com/owner/repo` (credentials are ignored)
pub fn parse_git_url(url: &str) -> Result<RepoSlug, RepoError> {
    let trimmed = url.trim();
    let unsupported = || RepoError::UnsupportedUrl(trimmed.to_string());

    let path = if let Some(rest) = trimmed.strip_prefix("git@github.com:") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("https://") {
        // Drop "user[:password]@" when it precedes the host
        let host_and_path = match (rest.find('@'), rest.find('/')) {
            (Some(at), Some(slash)) if at < slash => &rest[at + 1..],
            _ => rest,
        };
        host_and_path
            .strip_prefix("github.com/")
            .ok_or_else(unsupported)?
    } else {
        return Err(unsupported());
    };

    let path = path.strip_suffix(".git").unwrap_or(path);
    match path.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => {
            Ok(RepoSlug::new(owner, repo))
        }
        _ => Err(unsupported()),
    }
}

/// Detect the repository from the `origin` remote of the git working copy
/// containing `dir`.
pub fn detect_repo(dir: &Path) -> Result<RepoSlug, RepoError> {
    let repo = Repository::discover(dir).map_err(|source| RepoError::NotARepository {
        dir: dir.to_path_buf(),
        source,
    })?;
    let remote = repo
        .find_remote("origin")
        .map_err(|e| RepoError::MissingOrigin(e.message().to_string()))?;
    let url = remote
        .url()
        .ok_or_else(|| RepoError::MissingOrigin("remote URL is not valid UTF-8".into()))?;
    debug!(url, "Detected origin remote");
    parse_git_url(url)
}

/// Use the explicit owner and repo when both are given, otherwise detect
/// them from `dir`.
pub fn resolve_repo(
    owner: Option<&str>,
    repo: Option<&str>,
    dir: &Path,
) -> Result<RepoSlug, RepoError> {
    match (owner, repo) {
        (Some(owner), Some(repo)) => Ok(RepoSlug::new(owner, repo)),
        _ => detect_repo(dir),
    }
}
