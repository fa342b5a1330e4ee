//! The three report runs behind the binaries
//!
//! Each flow takes an already built [`GitHubClient`] so tests can run them
//! against a scripted transport.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use github_api::client::window_start;
use github_api::GitHubClient;
use std::path::Path;
use tracing::{debug, info};

use crate::aggregate::Aggregator;
use crate::cli::IssueRef;
use crate::digest::{collect_closed, render_activity_feed, render_closed_digest};
use crate::store::EventStore;

/// Walk every repository of `organization` and aggregate the issues of each
/// open milestone titled `milestone`
pub async fn aggregate_milestone(
    github: &GitHubClient,
    organization: &str,
    milestone: &str,
    timezone: Tz,
) -> Result<Aggregator> {
    let mut aggregator = Aggregator::new(milestone, organization).with_timezone(timezone);

    let org = github
        .get_org(organization)
        .await
        .with_context(|| format!("Failed to look up organization {}", organization))?;
    let mut repos = github
        .get_repos(&org)
        .await
        .with_context(|| format!("Failed to list repositories of {}", organization))?;
    repos.sort_by(|a, b| a.name.cmp(&b.name));

    for repo in &repos {
        let milestones = github
            .get_milestones(organization, &repo.name)
            .await
            .with_context(|| format!("Failed to list milestones of {}/{}", organization, repo.name))?;

        for found in milestones.into_iter().filter(|m| m.title == milestone) {
            let issues = github
                .get_issues(organization, &repo.name, found.number)
                .await
                .with_context(|| {
                    format!(
                        "Failed to list issues of {}/{} milestone {}",
                        organization, repo.name, found.number
                    )
                })?;

            if issues.is_empty() {
                debug!(repo = %repo.name, milestone, "milestone has no issues");
                continue;
            }
            aggregator.add_issues(&repo.name, issues, found);
        }
    }

    Ok(aggregator)
}

/// Build the milestone report and write it to the tracking issue
///
/// Returns the rendered markdown. When `file` is given the markdown is
/// also written there, after the issue update succeeded.
pub async fn milestone_report(
    github: &GitHubClient,
    organization: &str,
    milestone: &str,
    issue: &IssueRef,
    username: &str,
    timezone: Tz,
    file: Option<&Path>,
) -> Result<String> {
    let aggregator = aggregate_milestone(github, organization, milestone, timezone).await?;
    let markdown = aggregator.get_markdown(username);

    github
        .update_issue(&issue.to_string(), &markdown)
        .await
        .with_context(|| format!("Failed to update tracking issue {}", issue))?;
    info!(issue = %issue, bytes = markdown.len(), "tracking issue updated");

    if let Some(path) = file {
        write_report(path, &markdown)?;
    }
    Ok(markdown)
}

/// Closed issues of the last `days` days, optionally written to `file`
pub async fn closed_digest(
    github: &GitHubClient,
    organization: &str,
    days: i64,
    file: Option<&Path>,
) -> Result<String> {
    let sections = collect_closed(github, organization, days).await?;
    let markdown = render_closed_digest(&sections);

    if let Some(path) = file {
        write_report(path, &markdown)?;
    }
    Ok(markdown)
}

/// Sync the store, then render the events of the last `days` days
pub async fn activity_digest(
    store: &EventStore,
    github: &GitHubClient,
    organization: &str,
    days: i64,
    timezone: Tz,
) -> Result<String> {
    let cutoff = activity_cutoff(Utc::now(), days)?;

    store.ensure_schema()?;
    store.sync_with(github, organization).await?;

    let events = store.events_since(cutoff)?;
    debug!(events = events.len(), %cutoff, "rendering activity feed");
    Ok(render_activity_feed(&events, timezone))
}

/// Start of the activity window: midnight UTC of the day `days` days before `now`
pub fn activity_cutoff(now: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>> {
    let start = window_start(now, days)
        .with_context(|| format!("Cannot look back {} days", days))?;
    Ok(start.date_naive().and_time(NaiveTime::MIN).and_utc())
}

/// Replace the contents of `path` with `markdown`
pub fn write_report(path: &Path, markdown: &str) -> Result<()> {
    std::fs::write(path, markdown)
        .with_context(|| format!("Failed to write report to {:?}", path))?;
    info!("Report written to {:?}", path);
    Ok(())
}
