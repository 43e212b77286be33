//! Offline log compression: `prcontext parse`.

use anyhow::{Context, Result};
use prcontext::logs::{parse_log, render};
use std::io::Read;
use std::path::Path;

use super::print_json;

pub fn cmd_parse(file: Option<&Path>, job_name: &str, json: bool) -> Result<()> {
    let bytes = match file {
        Some(path) if path != Path::new("-") => std::fs::read(path)
            .with_context(|| format!("Failed to read log file: {}", path.display()))?,
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read log from stdin")?;
            buf
        }
    };
    // CI logs are not guaranteed to be valid UTF-8
    let content = String::from_utf8_lossy(&bytes);

    let result = parse_log(&content, job_name);
    tracing::debug!(
        framework = %result.framework,
        failures = result.failure_count(),
        "Parsed log"
    );

    if json {
        print_json(&result)
    } else {
        println!("{}", render(&result));
        Ok(())
    }
}
