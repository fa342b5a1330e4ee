//! List issues closed in the last N days, grouped by repository

use anyhow::{Context, Result};
use clap::Parser;
use github_api::GitHubClient;
use std::path::PathBuf;
use std::process::ExitCode;

use gh_tracker::cli::{exit_status, parse_timezone, GitHubArgs, WindowArgs};
use gh_tracker::{flows, init_tracing, TrackerConfig};

#[derive(Parser, Debug)]
#[command(name = "closed-digest")]
#[command(about = "Recently closed issues across a GitHub organization")]
struct Cli {
    #[command(flatten)]
    window: WindowArgs,

    #[command(flatten)]
    github: GitHubArgs,

    /// Timezone from the Olson database, sent as a request hint
    #[arg(short, long)]
    timezone: Option<String>,

    /// Also write the markdown to this file
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    exit_status(run(cli).await)
}

async fn run(cli: Cli) -> Result<()> {
    init_tracing("closed_digest", cli.github.verbose)?;

    if let Some(name) = &cli.timezone {
        parse_timezone(name)?;
    }

    let config = TrackerConfig::load()?;
    let github = GitHubClient::new(
        config.client_config(),
        cli.github.credentials(),
        cli.timezone.clone(),
    )
    .context("Failed to build GitHub client")?;

    let markdown =
        flows::closed_digest(&github, &cli.github.organization, cli.window.days, cli.file.as_deref())
            .await?;
    print!("{}", markdown);

    Ok(())
}
