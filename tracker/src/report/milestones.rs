//! Milestone totals and per-milestone details

use chrono::NaiveDate;
use std::fmt::Write;

use super::percent::percent_complete;
use crate::aggregate::RepoMilestone;

/// Issue counts summed across milestones
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MilestoneTotals {
    pub open: u64,
    pub closed: u64,
}

impl MilestoneTotals {
    pub fn sum(milestones: &[RepoMilestone]) -> Self {
        milestones.iter().fold(Self::default(), |acc, m| Self {
            open: acc.open + m.milestone.open_issues,
            closed: acc.closed + m.milestone.closed_issues,
        })
    }

    pub fn total(&self) -> u64 {
        self.open + self.closed
    }

    pub fn percent_complete(&self) -> u64 {
        percent_complete(self.open, self.closed)
    }

    pub fn render(&self) -> String {
        format!(
            "Open | Closed | Total | Complete\n--: | --: | --: | --:\n{} | {} | {} | **{}%**\n\n",
            self.open,
            self.closed,
            self.total(),
            self.percent_complete()
        )
    }
}

/// `Today`, `N days from now` or `N days ago`
pub fn due_delta(due: NaiveDate, today: NaiveDate) -> String {
    let days = (due - today).num_days();
    match days {
        0 => "Today".to_string(),
        d if d > 0 => format!("{} days from now", d),
        d => format!("{} days ago", -d),
    }
}

/// One table row per milestone, in the order the milestones were added
pub fn milestone_details(milestones: &[RepoMilestone], today: NaiveDate) -> String {
    let mut md = String::from(
        "Repository | Milestone | Due | Open | Closed | Complete\n:-- | :-- | :-- | --: | --: | --:\n",
    );

    for entry in milestones {
        let milestone = &entry.milestone;
        let due = match milestone.due_on {
            Some(due_on) => {
                let due = due_on.date_naive();
                format!("{} ({})", due, due_delta(due, today))
            }
            None => "N/A".to_string(),
        };
        let _ = writeln!(
            md,
            "**{}** | [{}]({}) | {} | {} | {} | **{}%**",
            entry.repository,
            milestone.title,
            milestone.html_url,
            due,
            milestone.open_issues,
            milestone.closed_issues,
            percent_complete(milestone.open_issues, milestone.closed_issues)
        );
    }

    let described: Vec<&RepoMilestone> = milestones
        .iter()
        .filter(|m| {
            m.milestone
                .description
                .as_deref()
                .is_some_and(|d| !d.trim().is_empty())
        })
        .collect();
    if !described.is_empty() {
        md.push('\n');
        for entry in described {
            let _ = writeln!(
                md,
                "- **{}**: {}",
                entry.repository,
                entry.milestone.description.as_deref().unwrap_or_default().trim()
            );
        }
    }

    md.push('\n');
    md
}
