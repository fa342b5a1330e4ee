//! Milestone issue aggregation
//!
//! An [`Aggregator`] lives for one report run. Issues are fed in per
//! repository and milestone with [`Aggregator::add_issues`]; the `get_*`
//! methods then render pieces of the report from the accumulated state.
//!
//! Buckets kept per run:
//! - repository, assignee and label names (case-folded)
//! - the calendar day each issue was opened, and the day it was closed
//!
//! # Example
//!
//! ```rust,ignore
//! let mut aggregator = Aggregator::new("v2.0", "acme");
//! aggregator.add_issues("api", issues, milestone);
//! let markdown = aggregator.get_markdown("octo");
//! ```

pub mod counts;
pub mod detail;

pub use counts::{CountSet, Counts};
pub use detail::{IssueDetail, SortKey};

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use github_api::{Issue, Milestone};
use std::fmt::Display;
use std::hash::Hash;
use tracing::debug;

use crate::report::{self, CountChart, MilestoneTotals};

/// Label bucket used for issues without labels
pub const NO_LABEL: &str = "none";

/// A milestone and the repository it belongs to
#[derive(Debug, Clone)]
pub struct RepoMilestone {
    pub repository: String,
    pub milestone: Milestone,
}

/// Accumulated state of one report run
pub struct Aggregator {
    milestone_filter: String,
    organization: String,
    timezone: Tz,
    repositories: CountSet<String>,
    assignees: CountSet<String>,
    labels: CountSet<String>,
    days_opened: CountSet<NaiveDate>,
    days_closed: CountSet<NaiveDate>,
    details: Vec<IssueDetail>,
    milestones: Vec<RepoMilestone>,
}

impl Aggregator {
    pub fn new(milestone_filter: &str, organization: &str) -> Self {
        Self {
            milestone_filter: milestone_filter.to_string(),
            organization: organization.to_string(),
            timezone: Tz::UTC,
            repositories: CountSet::new(),
            assignees: CountSet::new(),
            labels: CountSet::new(),
            days_opened: CountSet::new(),
            days_closed: CountSet::new(),
            details: Vec::new(),
            milestones: Vec::new(),
        }
    }

    /// Timezone of the "last updated" stamp and of "today" for due dates
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Count every issue of `milestone` in `repository` into the buckets
    pub fn add_issues(&mut self, repository: &str, issues: Vec<Issue>, milestone: Milestone) {
        debug!(
            repository,
            milestone = %milestone.title,
            issues = issues.len(),
            "aggregating issues"
        );

        let repo_key = repository.to_lowercase();
        for issue in issues {
            if issue.labels.is_empty() {
                self.labels.bump(NO_LABEL.to_string(), &issue);
            } else {
                for label in &issue.labels {
                    self.labels.bump(label.name.to_lowercase(), &issue);
                }
            }

            self.assignees
                .bump(issue.assignee_login().to_lowercase(), &issue);
            self.repositories.bump(repo_key.clone(), &issue);

            if let Some(created_at) = issue.created_at {
                self.days_opened.bump(created_at.date_naive(), &issue);
            }
            if let Some(closed_at) = issue.closed_at {
                self.days_closed.bump(closed_at.date_naive(), &issue);
            }

            self.details.push(IssueDetail::new(repository, issue));
        }

        let seen = self
            .milestones
            .iter()
            .any(|m| m.repository == repository && m.milestone.number == milestone.number);
        if !seen {
            self.milestones.push(RepoMilestone {
                repository: repository.to_string(),
                milestone,
            });
        }
    }

    pub fn milestone_filter(&self) -> &str {
        &self.milestone_filter
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn repositories(&self) -> &CountSet<String> {
        &self.repositories
    }

    pub fn assignees(&self) -> &CountSet<String> {
        &self.assignees
    }

    pub fn labels(&self) -> &CountSet<String> {
        &self.labels
    }

    pub fn days_opened(&self) -> &CountSet<NaiveDate> {
        &self.days_opened
    }

    pub fn days_closed(&self) -> &CountSet<NaiveDate> {
        &self.days_closed
    }

    pub fn milestones(&self) -> &[RepoMilestone] {
        &self.milestones
    }

    /// Detail entries in listing order. Equal keys keep insertion order.
    pub fn sorted_details(&self) -> Vec<&IssueDetail> {
        let mut details: Vec<&IssueDetail> = self.details.iter().collect();
        details.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        details
    }

    /// Count table for one dimension. `quoted` wraps bucket names in backticks.
    pub fn get_count_chart<K>(
        counts: &CountSet<K>,
        label: &str,
        quoted: bool,
        row_totals: bool,
        column_totals: bool,
    ) -> String
    where
        K: Eq + Hash + Ord + Display,
    {
        CountChart::new(label, counts)
            .quoted(quoted)
            .row_totals(row_totals)
            .column_totals(column_totals)
            .render()
    }

    /// Most recent opened and closed days side by side, always 7 rows
    pub fn get_day_chart(&self) -> String {
        report::day_chart(&self.days_opened, &self.days_closed)
    }

    pub fn get_issue_detail_listing(&self) -> String {
        report::detail_listing(&self.sorted_details())
    }

    /// Open and closed issue counts summed over every added milestone
    pub fn get_milestone_totals(&self) -> MilestoneTotals {
        MilestoneTotals::sum(&self.milestones)
    }

    pub fn get_milestone_details(&self, today: NaiveDate) -> String {
        report::milestone_details(&self.milestones, today)
    }

    /// Full report, stamped with the current time in the configured timezone
    pub fn get_markdown(&self, username: &str) -> String {
        self.render_markdown(username, Utc::now().with_timezone(&self.timezone))
    }

    /// Full report stamped with `now`
    pub fn render_markdown(&self, username: &str, now: DateTime<Tz>) -> String {
        report::render_markdown(self, username, now)
    }
}
