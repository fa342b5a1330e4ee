//! Count buckets

use github_api::{Issue, IssueKind, IssueState};
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::AddAssign;

/// Open/closed by issue/pull counters for one bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub issues_open: u64,
    pub issues_closed: u64,
    pub pulls_open: u64,
    pub pulls_closed: u64,
}

impl Counts {
    /// Bump the counter matching `kind` and `state`
    pub fn record(&mut self, kind: IssueKind, state: IssueState) {
        let counter = match (kind, state) {
            (IssueKind::Issue, IssueState::Open) => &mut self.issues_open,
            (IssueKind::Issue, IssueState::Closed) => &mut self.issues_closed,
            (IssueKind::Pull, IssueState::Open) => &mut self.pulls_open,
            (IssueKind::Pull, IssueState::Closed) => &mut self.pulls_closed,
        };
        *counter += 1;
    }

    pub fn open_total(&self) -> u64 {
        self.issues_open + self.pulls_open
    }

    pub fn closed_total(&self) -> u64 {
        self.issues_closed + self.pulls_closed
    }

    pub fn total(&self) -> u64 {
        self.open_total() + self.closed_total()
    }
}

impl AddAssign for Counts {
    fn add_assign(&mut self, other: Self) {
        self.issues_open += other.issues_open;
        self.issues_closed += other.issues_closed;
        self.pulls_open += other.pulls_open;
        self.pulls_closed += other.pulls_closed;
    }
}

/// Buckets keyed by name (or date), at most one per key
#[derive(Debug, Clone)]
pub struct CountSet<K> {
    buckets: HashMap<K, Counts>,
}

impl<K> Default for CountSet<K> {
    fn default() -> Self {
        Self {
            buckets: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Ord> CountSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `issue` into the bucket for `key`
    pub fn bump(&mut self, key: K, issue: &Issue) {
        self.buckets
            .entry(key)
            .or_default()
            .record(issue.kind(), issue.state);
    }

    pub fn get(&self, key: &K) -> Option<&Counts> {
        self.buckets.get(key)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Buckets in ascending key order
    pub fn sorted(&self) -> Vec<(&K, &Counts)> {
        let mut rows: Vec<_> = self.buckets.iter().collect();
        rows.sort_by(|a, b| a.0.cmp(b.0));
        rows
    }

    /// The `n` greatest keys, greatest first
    pub fn most_recent(&self, n: usize) -> Vec<(&K, &Counts)> {
        let mut rows = self.sorted();
        rows.reverse();
        rows.truncate(n);
        rows
    }

    /// Sum across all buckets
    pub fn totals(&self) -> Counts {
        let mut totals = Counts::default();
        for counts in self.buckets.values() {
            totals += *counts;
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn issue(state: &str, pull: bool) -> Issue {
        let mut value = json!({
            "number": 1,
            "title": "t",
            "html_url": "https://github.com/acme/api/issues/1",
            "state": state
        });
        if pull {
            value["pull_request"] = json!({"url": "x"});
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_record_each_counter() {
        let mut counts = Counts::default();
        counts.record(IssueKind::Issue, IssueState::Open);
        counts.record(IssueKind::Issue, IssueState::Open);
        counts.record(IssueKind::Pull, IssueState::Closed);
        assert_eq!(counts.issues_open, 2);
        assert_eq!(counts.pulls_closed, 1);
        assert_eq!(counts.open_total(), 2);
        assert_eq!(counts.closed_total(), 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_bucket_sums_match_inputs() {
        let mut set = CountSet::new();
        set.bump("bug".to_string(), &issue("open", false));
        set.bump("bug".to_string(), &issue("closed", true));
        set.bump("none".to_string(), &issue("open", false));
        set.bump("docs".to_string(), &issue("open", true));

        assert_eq!(set.len(), 3);
        let totals = set.totals();
        assert_eq!(totals.issues_open, 2);
        assert_eq!(totals.issues_closed, 0);
        assert_eq!(totals.pulls_open, 1);
        assert_eq!(totals.pulls_closed, 1);

        let names: Vec<_> = set.sorted().into_iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["bug", "docs", "none"]);
    }

    #[test]
    fn test_most_recent_dates() {
        let mut set = CountSet::new();
        for day in 1..=9 {
            set.bump(NaiveDate::from_ymd_opt(2024, 5, day).unwrap(), &issue("open", false));
        }
        let recent: Vec<_> = set.most_recent(7).into_iter().map(|(d, _)| *d).collect();
        assert_eq!(recent.len(), 7);
        assert_eq!(recent[0], NaiveDate::from_ymd_opt(2024, 5, 9).unwrap());
        assert_eq!(recent[6], NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
    }
}
