//! Markdown report rendering
//!
//! Pure formatting over [`Aggregator`] state. Nothing here does I/O or fails.

pub mod charts;
pub mod listing;
pub mod milestones;
pub mod percent;

pub use charts::{day_chart, CountChart, DAY_ROWS};
pub use listing::{detail_listing, HIGH_PRIORITY};
pub use milestones::{due_delta, milestone_details, MilestoneTotals};
pub use percent::percent_complete;

use chrono::DateTime;
use chrono_tz::Tz;
use std::fmt::Write;

use crate::aggregate::Aggregator;

/// Assemble the full tracking-issue body
pub fn render_markdown(aggregator: &Aggregator, username: &str, now: DateTime<Tz>) -> String {
    let mut md = String::from("# Overview\n\n");
    let _ = write!(
        md,
        "This issue is updated automatically. It lists every issue and pull request \
         in the `{}` milestone across all `{}` repositories. Closed items are checked \
         off on each update, so there is no need to check them by hand. Comments on \
         this issue are kept between updates.\n\n",
        aggregator.milestone_filter(),
        aggregator.organization()
    );

    md.push_str("# Overall Stats\n\n");
    md.push_str(&aggregator.get_milestone_totals().render());

    md.push_str("# Milestones\n\n");
    md.push_str(&aggregator.get_milestone_details(now.date_naive()));

    md.push_str("# Aggregated Data\n\n");
    md.push_str("## Repositories\n\n");
    md.push_str(&Aggregator::get_count_chart(aggregator.repositories(), "Repository", false, true, true));
    md.push_str("## Assignees\n\n");
    md.push_str(&Aggregator::get_count_chart(aggregator.assignees(), "Assignee", false, true, true));
    md.push_str("## Labels\n\n");
    md.push_str(&Aggregator::get_count_chart(aggregator.labels(), "Label", true, true, true));
    md.push_str("## Days\n\n");
    md.push_str(&aggregator.get_day_chart());

    md.push_str("# Repository Issues\n");
    md.push_str(&aggregator.get_issue_detail_listing());

    let _ = write!(
        md,
        "\n\n:calendar: **Last Updated:** *{}* **by** *{}*",
        now.format("%B %d, %Y  %r"),
        username
    );

    md
}
