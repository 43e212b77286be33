//! Typed error hierarchy for prcontext.
//!
//! Three enums cover the fallible subsystems:
//! - `GitHubError` - REST API requests and response decoding
//! - `RepoError` - resolving the owner/repository of the working copy
//! - `ConfigError` - loading `.prcontext/config.toml` and credentials
//!
//! Log compression has no error type; it is total over its input.

use thiserror::Error;

/// Errors from the GitHub REST client.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("Failed to send {what} request to GitHub: {source}")]
    Request {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("GitHub API returned {status} for {what}")]
    Status {
        what: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("Failed to parse {what} response from GitHub: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Errors from owner/repository detection.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(
        "Could not detect Git repository from {dir}. Make sure you are in a Git repository \
         with a remote origin, or pass --owner/--repo explicitly."
    )]
    NotARepository {
        dir: std::path::PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Repository has no usable 'origin' remote: {0}")]
    MissingOrigin(String),

    #[error("Could not parse Git URL: {0}. Only GitHub repositories are supported.")]
    UnsupportedUrl(String),
}

/// Errors from configuration and credential loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(
        "Could not get GitHub token. Either set GITHUB_TOKEN or authenticate with: gh auth login"
    )]
    MissingToken,
}
