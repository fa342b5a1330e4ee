//! Issue and milestone type definitions
//!
//! These mirror the JSON returned by the REST issue and milestone listings.
//! Pull requests come back from the issue listing too; they are told apart
//! by the `pull_request` marker object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::common::{Label, User};

/// Issue state. `Open` orders before `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a record from the issue listing is a plain issue or a pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    Issue,
    Pull,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Issue => f.write_str("Issue"),
            IssueKind::Pull => f.write_str("Pull"),
        }
    }
}

/// Represents a GitHub issue or pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number (unique within repository)
    pub number: u64,

    /// Issue title
    pub title: String,

    /// Issue URL on GitHub
    pub html_url: String,

    pub state: IssueState,

    /// Single assignee, if any
    #[serde(default)]
    pub assignee: Option<User>,

    /// Applied labels, in API order
    #[serde(default)]
    pub labels: Vec<Label>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,

    /// Present only on pull requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    pub fn kind(&self) -> IssueKind {
        if self.pull_request.is_some() {
            IssueKind::Pull
        } else {
            IssueKind::Issue
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state == IssueState::Closed
    }

    /// Assignee login, or `unassigned`
    pub fn assignee_login(&self) -> &str {
        self.assignee
            .as_ref()
            .map(|user| user.login.as_str())
            .unwrap_or("unassigned")
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label.name == name)
    }
}

/// Represents a GitHub milestone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    /// Milestone title
    pub title: String,

    /// Milestone number
    pub number: u64,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub due_on: Option<DateTime<Utc>>,

    #[serde(default)]
    pub open_issues: u64,

    #[serde(default)]
    pub closed_issues: u64,

    #[serde(default)]
    pub html_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pull_marker_sets_kind() {
        let pull: Issue = serde_json::from_value(json!({
            "number": 7,
            "title": "Add widgets",
            "html_url": "https://github.com/acme/api/pull/7",
            "state": "open",
            "assignee": null,
            "labels": [],
            "created_at": "2024-03-01T10:00:00Z",
            "closed_at": null,
            "pull_request": {"url": "https://api.github.com/repos/acme/api/pulls/7"}
        }))
        .unwrap();
        assert_eq!(pull.kind(), IssueKind::Pull);
        assert_eq!(pull.assignee_login(), "unassigned");
        assert!(!pull.is_closed());
    }

    #[test]
    fn test_plain_issue() {
        let issue: Issue = serde_json::from_value(json!({
            "number": 3,
            "title": "Crash on start",
            "html_url": "https://github.com/acme/api/issues/3",
            "state": "closed",
            "assignee": {"login": "Octo"},
            "labels": [{"name": "High Priority"}],
            "created_at": "2024-03-01T10:00:00Z",
            "closed_at": "2024-03-02T11:00:00Z"
        }))
        .unwrap();
        assert_eq!(issue.kind(), IssueKind::Issue);
        assert_eq!(issue.assignee_login(), "Octo");
        assert!(issue.has_label("High Priority"));
        assert!(issue.is_closed());
    }

    #[test]
    fn test_state_order() {
        assert!(IssueState::Open < IssueState::Closed);
    }

    #[test]
    fn test_milestone_without_due_date() {
        let milestone: Milestone = serde_json::from_value(json!({
            "title": "v1.0",
            "number": 2,
            "description": null,
            "due_on": null,
            "open_issues": 4,
            "closed_issues": 6,
            "html_url": "https://github.com/acme/api/milestone/2"
        }))
        .unwrap();
        assert!(milestone.due_on.is_none());
        assert_eq!(milestone.open_issues + milestone.closed_issues, 10);
    }
}
