//! Tracing subscriber setup.
//!
//! Diagnostics go to stderr so stdout carries only command output. The
//! filter defaults to `prcontext=warn` (`prcontext=debug` with `--verbose`)
//! and `RUST_LOG` takes precedence over both. Set `PRCONTEXT_LOG_FORMAT=json`
//! for JSON lines.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FORMAT_ENV: &str = "PRCONTEXT_LOG_FORMAT";

/// Default filter directive for the given verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "prcontext=debug"
    } else {
        "prcontext=warn"
    }
}

/// Initialise the tracing subscriber. Safe to call more than once; later
/// calls are ignored.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(verbose).into());
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_target(false).with_writer(std::io::stderr)))
        .try_init();
}
