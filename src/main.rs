use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "prcontext")]
#[command(version, about = "Pull-request review context and CI failure summaries")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Repository owner (auto-detected from the origin remote if omitted)
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// Repository name (auto-detected from the origin remote if omitted)
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// Directory used for config lookup and remote detection
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// PR description, comments, reviews and commits as JSON
    Pr {
        /// Pull request number
        number: u64,
    },
    /// CI status summary including failing jobs
    Ci {
        /// Pull request number
        number: u64,
    },
    /// Failing jobs of a workflow run
    Jobs {
        /// Workflow run ID
        run_id: u64,
    },
    /// Fetch a job's log and print only its test failures
    Logs {
        /// Job ID
        job_id: u64,
        /// Job name, used to pick the test framework
        #[arg(long, default_value = "unknown")]
        job_name: String,
    },
    /// Ticket IDs referenced by the PR body, commits and comments
    Tickets {
        /// Pull request number
        number: u64,
    },
    /// Complete review context: details, tickets and CI in one document
    Context {
        /// Pull request number
        number: u64,
        /// Attach compressed logs of failing jobs
        #[arg(long)]
        include_logs: bool,
    },
    /// Compress a local CI log file (or stdin) without contacting GitHub
    Parse {
        /// Log file; reads stdin when omitted or "-"
        file: Option<PathBuf>,
        /// Job name, used to pick the test framework
        #[arg(long, default_value = "")]
        job_name: String,
        /// Print the extracted failures as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration and any warnings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    prcontext::logging::init_logging(cli.verbose);

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match &cli.command {
        Commands::Pr { number } => cmd::cmd_pr(&cli, &project_dir, *number).await?,
        Commands::Ci { number } => cmd::cmd_ci(&cli, &project_dir, *number).await?,
        Commands::Jobs { run_id } => cmd::cmd_jobs(&cli, &project_dir, *run_id).await?,
        Commands::Logs { job_id, job_name } => {
            cmd::cmd_logs(&cli, &project_dir, *job_id, job_name).await?
        }
        Commands::Tickets { number } => cmd::cmd_tickets(&cli, &project_dir, *number).await?,
        Commands::Context {
            number,
            include_logs,
        } => cmd::cmd_context(&cli, &project_dir, *number, *include_logs).await?,
        Commands::Parse {
            file,
            job_name,
            json,
        } => cmd::cmd_parse(file.as_deref(), job_name, *json)?,
        Commands::Config => cmd::cmd_config(&project_dir)?,
    }

    Ok(())
}
