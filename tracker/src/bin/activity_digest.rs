//! Sync repository events into the local store and print a chronological feed

use anyhow::{Context, Result};
use chrono_tz::Tz;
use clap::Parser;
use github_api::GitHubClient;
use std::path::PathBuf;
use std::process::ExitCode;

use gh_tracker::cli::{exit_status, parse_timezone, GitHubArgs, WindowArgs};
use gh_tracker::store::EventStore;
use gh_tracker::{flows, init_tracing, TrackerConfig};

#[derive(Parser, Debug)]
#[command(name = "activity-digest")]
#[command(about = "Activity feed for a GitHub organization")]
struct Cli {
    #[command(flatten)]
    window: WindowArgs,

    #[command(flatten)]
    github: GitHubArgs,

    /// Timezone from the Olson database for the feed. Default is UTC.
    #[arg(short, long)]
    timezone: Option<String>,

    /// Event store path (default: ~/.gh-tracker/events.db)
    #[arg(long, env = "GH_TRACKER_DATABASE")]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    exit_status(run(cli).await)
}

async fn run(cli: Cli) -> Result<()> {
    init_tracing("activity_digest", cli.github.verbose)?;

    let timezone = match &cli.timezone {
        Some(name) => parse_timezone(name)?,
        None => Tz::UTC,
    };

    let config = TrackerConfig::load()?;
    let path = match cli.database {
        Some(path) => path,
        None => config.database_path()?,
    };
    let store = EventStore::open(path)?;

    let github = GitHubClient::new(
        config.client_config(),
        cli.github.credentials(),
        cli.timezone.clone(),
    )
    .context("Failed to build GitHub client")?;

    let feed = flows::activity_digest(
        &store,
        &github,
        &cli.github.organization,
        cli.window.days,
        timezone,
    )
    .await?;
    print!("{}", feed);

    Ok(())
}
