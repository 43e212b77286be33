//! Configuration for prcontext.
//!
//! Settings are layered file → environment → CLI. The file lives at
//! `.prcontext/config.toml` in the project directory and every key is
//! optional:
//!
//! ```toml
//! [github]
//! api_url = "https://api.github.com"
//! user_agent = "prcontext"
//! timeout_secs = 30
//!
//! [ci]
//! preferred_workflow = "Tests"
//! runs_per_page = 10
//!
//! [logs]
//! max_job_logs = 5
//! ```
//!
//! `PRCONTEXT_API_URL` overrides `github.api_url`. The token comes from
//! `GITHUB_TOKEN`, falling back to `gh auth token`.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_DIR: &str = ".prcontext";
pub const CONFIG_FILE: &str = "config.toml";

pub const API_URL_ENV: &str = "PRCONTEXT_API_URL";
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// GitHub connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubSettings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    "prcontext".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Which CI run to summarize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CiSettings {
    /// Workflow name preferred when several runs exist for the head commit
    #[serde(default = "default_preferred_workflow")]
    pub preferred_workflow: String,
    #[serde(default = "default_runs_per_page")]
    pub runs_per_page: u32,
}

fn default_preferred_workflow() -> String {
    "Tests".to_string()
}

fn default_runs_per_page() -> u32 {
    10
}

impl Default for CiSettings {
    fn default() -> Self {
        Self {
            preferred_workflow: default_preferred_workflow(),
            runs_per_page: default_runs_per_page(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    /// Maximum number of failing job logs fetched for a full review context
    #[serde(default = "default_max_job_logs")]
    pub max_job_logs: usize,
}

fn default_max_job_logs() -> usize {
    5
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            max_job_logs: default_max_job_logs(),
        }
    }
}

/// The complete config.toml structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub github: GithubSettings,
    #[serde(default)]
    pub ci: CiSettings,
    #[serde(default)]
    pub logs: LogSettings,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse settings from TOML text; `path` is only used in errors.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Path of the config file for a project directory.
    pub fn config_path(project_dir: &Path) -> PathBuf {
        project_dir.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load `.prcontext/config.toml`, or defaults when it does not exist.
    pub fn load_or_default(project_dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::config_path(project_dir);
        if path.exists() {
            debug!(path = %path.display(), "Loading config file");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.github.api_url = url;
        }
        self
    }

    /// Load file settings and apply process environment overrides.
    pub fn resolve(project_dir: &Path) -> Result<Self, ConfigError> {
        Ok(Self::load_or_default(project_dir)?.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Validate settings, returning human-readable warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.github.api_url.starts_with("http://") && !self.github.api_url.starts_with("https://")
        {
            warnings.push(format!(
                "github.api_url '{}' is not an http(s) URL",
                self.github.api_url
            ));
        }
        if self.github.timeout_secs == 0 {
            warnings.push("github.timeout_secs is 0; every request will time out".to_string());
        }
        if self.ci.runs_per_page == 0 || self.ci.runs_per_page > 100 {
            warnings.push(format!(
                "ci.runs_per_page {} is outside GitHub's 1-100 range",
                self.ci.runs_per_page
            ));
        }
        if self.logs.max_job_logs == 0 {
            warnings.push("logs.max_job_logs is 0; no job logs will be fetched".to_string());
        }
        warnings
    }
}

/// Choose a token: a non-empty environment value wins over `gh` output.
pub fn pick_token(env_token: Option<String>, gh_token: Option<String>) -> Option<String> {
    env_token
        .into_iter()
        .chain(gh_token)
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
}

/// Resolve the GitHub token from `GITHUB_TOKEN` or `gh auth token`.
pub async fn resolve_token() -> Result<String, ConfigError> {
    let env_token = std::env::var(TOKEN_ENV).ok();
    if let Some(token) = pick_token(env_token, None) {
        return Ok(token);
    }

    let gh_token = match tokio::process::Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
    {
        Ok(output) if output.status.success() => {
            debug!("Retrieved GitHub token from gh CLI");
            String::from_utf8(output.stdout).ok()
        }
        Ok(output) => {
            debug!(status = %output.status, "gh auth token failed");
            None
        }
        Err(e) => {
            debug!(error = %e, "gh CLI unavailable");
            None
        }
    };

    pick_token(None, gh_token).ok_or(ConfigError::MissingToken)
}
