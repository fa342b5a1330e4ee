//! Grouped issue listing

use std::fmt::Write;

use github_api::IssueState;

use crate::aggregate::IssueDetail;

/// Label that flags an entry with `:exclamation:`
pub const HIGH_PRIORITY: &str = "High Priority";

/// Render detail entries already in listing order
///
/// Headings are emitted on change: `##` repository, `###` state, `####`
/// assignee. A state change resets the assignee so the first assignee of
/// each state always gets a heading.
pub fn detail_listing(details: &[&IssueDetail]) -> String {
    let mut md = String::new();
    let mut repository: Option<&str> = None;
    let mut state: Option<IssueState> = None;
    let mut assignee: Option<&str> = None;

    for detail in details {
        let issue = &detail.issue;

        if repository != Some(detail.repository.as_str()) {
            let count = details
                .iter()
                .filter(|d| d.repository == detail.repository)
                .count();
            let _ = write!(md, "\n## {} (Issues/Pulls: {})\n", detail.repository, count);
            repository = Some(detail.repository.as_str());
            state = None;
        }

        if state != Some(issue.state) {
            let heading = match issue.state {
                IssueState::Open => "Open",
                IssueState::Closed => "Closed",
            };
            let _ = write!(md, "\n### {}\n", heading);
            state = Some(issue.state);
            assignee = None;
        }

        if assignee != Some(issue.assignee_login()) {
            let _ = write!(md, "\n#### {}\n\n", issue.assignee_login());
            assignee = Some(issue.assignee_login());
        }

        md.push_str(&entry_line(detail));
        md.push('\n');
    }

    md
}

fn entry_line(detail: &IssueDetail) -> String {
    let issue = &detail.issue;
    let (checkbox, strike) = if issue.is_closed() {
        ("[x]", "~~")
    } else {
        ("[ ]", "")
    };
    let flag = if issue.has_label(HIGH_PRIORITY) {
        ":exclamation: "
    } else {
        ""
    };

    let mut body = issue.title.clone();
    if !detail.labels.is_empty() {
        body.push(' ');
        body.push_str(&detail.labels);
    }
    let _ = write!(body, " **({})**", issue.assignee_login());

    let mut line = format!(
        "  - {} {} [#{}]({}): {}{}{}{}",
        checkbox,
        issue.kind(),
        issue.number,
        issue.html_url,
        flag,
        strike,
        body,
        strike
    );

    // Closed date wins over opened date
    let stamp = match (issue.closed_at, issue.created_at) {
        (Some(closed), _) => Some(("closed", closed)),
        (None, Some(opened)) => Some(("opened", opened)),
        (None, None) => None,
    };
    if let Some((verb, at)) = stamp {
        let _ = write!(line, " *({} {})*", verb, at.format("%Y-%m-%d"));
    }

    line
}
