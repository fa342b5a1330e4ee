//! Count and day tables

use chrono::NaiveDate;
use std::fmt::{Display, Write};
use std::hash::Hash;

use super::percent::percent_complete;
use crate::aggregate::{CountSet, Counts};

/// Rows shown in the day table
pub const DAY_ROWS: usize = 7;

/// Builder for a count table over one bucket set
///
/// ```rust,ignore
/// let md = CountChart::new("Label", aggregator.labels())
///     .quoted(true)
///     .row_totals(true)
///     .column_totals(true)
///     .render();
/// ```
pub struct CountChart<'a, K> {
    label: &'a str,
    counts: &'a CountSet<K>,
    quoted: bool,
    row_totals: bool,
    column_totals: bool,
}

impl<'a, K> CountChart<'a, K>
where
    K: Eq + Hash + Ord + Display,
{
    pub fn new(label: &'a str, counts: &'a CountSet<K>) -> Self {
        Self {
            label,
            counts,
            quoted: false,
            row_totals: false,
            column_totals: false,
        }
    }

    /// Render bucket names in backticks
    pub fn quoted(mut self, quoted: bool) -> Self {
        self.quoted = quoted;
        self
    }

    /// Add open, closed and grand totals plus percent complete to each row
    pub fn row_totals(mut self, row_totals: bool) -> Self {
        self.row_totals = row_totals;
        self
    }

    /// Append a row summing every bucket
    pub fn column_totals(mut self, column_totals: bool) -> Self {
        self.column_totals = column_totals;
        self
    }

    pub fn render(&self) -> String {
        let mut md = String::new();

        md.push_str(self.label);
        md.push_str(" | Issues Open | Issues Closed | Pulls Open | Pulls Closed");
        if self.row_totals {
            md.push_str(" | Open Totals | Closed Totals | Totals | Complete");
        }
        md.push('\n');
        md.push_str(":--");
        let numeric_columns = if self.row_totals { 8 } else { 4 };
        for _ in 0..numeric_columns {
            md.push_str(" | --:");
        }
        md.push('\n');

        for (name, counts) in self.counts.sorted() {
            let name = if self.quoted {
                format!("`{}`", name)
            } else {
                name.to_string()
            };
            let _ = write!(
                md,
                "**{}** | {} | {} | {} | {}",
                name, counts.issues_open, counts.issues_closed, counts.pulls_open, counts.pulls_closed
            );
            if self.row_totals {
                md.push_str(&self.row_total_cells(counts));
            }
            md.push('\n');
        }

        if self.column_totals {
            let totals = self.counts.totals();
            let _ = write!(
                md,
                "**Totals** | **{}** | **{}** | **{}** | **{}**",
                totals.issues_open, totals.issues_closed, totals.pulls_open, totals.pulls_closed
            );
            if self.row_totals {
                md.push_str(&self.row_total_cells(&totals));
            }
            md.push('\n');
        }

        md.push('\n');
        md
    }

    fn row_total_cells(&self, counts: &Counts) -> String {
        format!(
            " | **{}** | **{}** | **{}** | **{}%**",
            counts.open_total(),
            counts.closed_total(),
            counts.total(),
            percent_complete(counts.open_total(), counts.closed_total())
        )
    }
}

/// Most recent opened days next to most recent closed days
///
/// The two sides are ranked independently and only line up by position,
/// not by date. Missing slots are left empty.
pub fn day_chart(opened: &CountSet<NaiveDate>, closed: &CountSet<NaiveDate>) -> String {
    let opened = opened.most_recent(DAY_ROWS);
    let closed = closed.most_recent(DAY_ROWS);

    let mut md = String::from(
        "Opened On | Total | <---------- Totals From Last 7 Days ----------> | Closed On | Total\n",
    );
    md.push_str(":-- | --: | :--: | :-- | --:\n");

    for rank in 0..DAY_ROWS {
        let (opened_day, opened_total) = match opened.get(rank) {
            Some((day, counts)) => (format!("**{}**", day), counts.open_total().to_string()),
            None => (String::new(), String::new()),
        };
        let (closed_day, closed_total) = match closed.get(rank) {
            Some((day, counts)) => (format!("**{}**", day), counts.closed_total().to_string()),
            None => (String::new(), String::new()),
        };
        let _ = writeln!(
            md,
            "{} | {} | | {} | {}",
            opened_day, opened_total, closed_day, closed_total
        );
    }

    md.push('\n');
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use github_api::Issue;
    use serde_json::json;

    fn issue(state: &str) -> Issue {
        serde_json::from_value(json!({
            "number": 1,
            "title": "t",
            "html_url": "https://github.com/acme/api/issues/1",
            "state": state
        }))
        .unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_count_chart_with_totals() {
        let mut counts = CountSet::new();
        counts.bump("web".to_string(), &issue("open"));
        counts.bump("api".to_string(), &issue("closed"));
        counts.bump("api".to_string(), &issue("open"));

        let md = CountChart::new("Repository", &counts)
            .row_totals(true)
            .column_totals(true)
            .render();
        let lines: Vec<&str> = md.lines().collect();

        assert!(lines[0].starts_with("Repository | Issues Open"));
        assert!(lines[0].ends_with("| Complete"));
        assert_eq!(lines[1], ":-- | --: | --: | --: | --: | --: | --: | --: | --:");
        assert_eq!(lines[2], "**api** | 1 | 1 | 0 | 0 | **1** | **1** | **2** | **50%**");
        assert_eq!(lines[3], "**web** | 1 | 0 | 0 | 0 | **1** | **0** | **1** | **0%**");
        assert_eq!(lines[4], "**Totals** | **2** | **1** | **0** | **0** | **2** | **1** | **3** | **33%**");
    }

    #[test]
    fn test_count_chart_plain_and_quoted() {
        let mut counts = CountSet::new();
        counts.bump("bug".to_string(), &issue("open"));

        let md = CountChart::new("Label", &counts).quoted(true).render();
        let lines: Vec<&str> = md.lines().collect();
        assert_eq!(lines[1], ":-- | --: | --: | --: | --:");
        assert_eq!(lines[2], "**`bug`** | 1 | 0 | 0 | 0");
        assert!(!md.contains("Totals"));
    }

    #[test]
    fn test_day_chart_always_seven_rows() {
        let mut opened = CountSet::new();
        opened.bump(day(2), &issue("open"));
        opened.bump(day(2), &issue("closed"));
        opened.bump(day(4), &issue("open"));
        let mut closed = CountSet::new();
        closed.bump(day(9), &issue("closed"));

        let md = day_chart(&opened, &closed);
        let rows: Vec<&str> = md.lines().skip(2).filter(|l| !l.is_empty()).collect();
        assert_eq!(rows.len(), DAY_ROWS);
        assert_eq!(rows[0], "**2024-05-04** | 1 | | **2024-05-09** | 1");
        // open total counts open items only
        assert_eq!(rows[1], "**2024-05-02** | 1 | |  | ");
        assert_eq!(rows[6], " |  | |  | ");
    }

    #[test]
    fn test_day_chart_empty() {
        let md = day_chart(&CountSet::new(), &CountSet::new());
        assert_eq!(md.lines().skip(2).filter(|l| !l.is_empty()).count(), DAY_ROWS);
    }
}
