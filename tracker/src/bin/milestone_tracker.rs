//! Aggregate one milestone across an organization and post the report to a
//! tracking issue

use anyhow::{Context, Result};
use clap::Parser;
use github_api::GitHubClient;
use std::path::PathBuf;
use std::process::ExitCode;

use gh_tracker::cli::{exit_status, parse_timezone, GitHubArgs, IssueRef};
use gh_tracker::{flows, init_tracing, TrackerConfig};

#[derive(Parser, Debug)]
#[command(name = "milestone-tracker")]
#[command(about = "Multiple issue tracker by milestone on GitHub")]
struct Cli {
    /// Tracking issue to update, as {account}/{repository}/issues/{number}
    #[arg(short, long)]
    issue: IssueRef,

    /// Milestone title to filter on in every repository
    #[arg(short, long)]
    milestone: String,

    #[command(flatten)]
    github: GitHubArgs,

    /// Timezone from the Olson database, e.g. America/Los_Angeles
    #[arg(short, long)]
    timezone: String,

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
    init_tracing("milestone_tracker", cli.github.verbose)?;

    let config = TrackerConfig::load()?;
    let timezone = parse_timezone(&cli.timezone)?;
    let github = GitHubClient::new(
        config.client_config(),
        cli.github.credentials(),
        Some(cli.timezone.clone()),
    )
    .context("Failed to build GitHub client")?;

    flows::milestone_report(
        &github,
        &cli.github.organization,
        &cli.milestone,
        &cli.issue,
        &cli.github.username,
        timezone,
        cli.file.as_deref(),
    )
    .await?;

    Ok(())
}
