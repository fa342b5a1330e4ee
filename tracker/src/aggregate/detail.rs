//! Issue detail entries for the grouped listing

use github_api::{Issue, IssueState};

/// Grouping order of the listing: repository, then open before closed, then assignee
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    pub repository: String,
    pub state: IssueState,
    pub assignee: String,
}

/// One issue or pull request plus the repository it came from
#[derive(Debug, Clone)]
pub struct IssueDetail {
    pub repository: String,
    pub issue: Issue,
    /// Backtick-quoted, comma-joined label names in API order
    pub labels: String,
}

impl IssueDetail {
    pub fn new(repository: &str, issue: Issue) -> Self {
        let labels = quoted_labels(&issue);
        Self {
            repository: repository.to_string(),
            issue,
            labels,
        }
    }

    pub fn sort_key(&self) -> SortKey {
        SortKey {
            repository: self.repository.clone(),
            state: self.issue.state,
            assignee: self.issue.assignee_login().to_string(),
        }
    }
}

fn quoted_labels(issue: &Issue) -> String {
    issue
        .labels
        .iter()
        .map(|label| format!("`{}`", label.name))
        .collect::<Vec<_>>()
        .join(", ")
}
