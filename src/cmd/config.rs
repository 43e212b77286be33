//! Configuration view: `prcontext config`.

use anyhow::{Context, Result};
use prcontext::config::Settings;

pub fn cmd_config(project_dir: &std::path::Path) -> Result<()> {
    let config_path = Settings::config_path(project_dir);

    println!();
    println!("prcontext Configuration");
    println!("=======================");
    println!();

    if config_path.exists() {
        println!("Config file: {}", config_path.display());
    } else {
        println!("No config file found at {}", config_path.display());
        println!("Using default configuration.");
    }
    println!();

    let settings = Settings::resolve(project_dir)?;
    let rendered = toml::to_string_pretty(&settings).context("Failed to render configuration")?;
    println!("Effective values (with env overrides):");
    println!("{}", rendered);

    let warnings = settings.validate();
    if warnings.is_empty() {
        println!("Configuration is valid.");
    } else {
        println!("Warnings:");
        for warning in warnings {
            println!("  - {}", warning);
        }
    }
    Ok(())
}
