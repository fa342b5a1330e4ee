//! Recently closed issues per repository

use anyhow::{Context, Result};
use github_api::{GitHubClient, Issue};
use std::fmt::Write;
use tracing::debug;

/// Closed issues of one repository
#[derive(Debug, Clone)]
pub struct ClosedSection {
    pub repository: String,
    pub issues: Vec<Issue>,
}

/// Closed issues of every repository in `organization`, repositories in name order
///
/// Repositories without closed issues in the window are left out.
pub async fn collect_closed(
    github: &GitHubClient,
    organization: &str,
    days: i64,
) -> Result<Vec<ClosedSection>> {
    let org = github
        .get_org(organization)
        .await
        .with_context(|| format!("Failed to look up organization {}", organization))?;
    let mut repos = github
        .get_repos(&org)
        .await
        .with_context(|| format!("Failed to list repositories of {}", organization))?;
    repos.sort_by(|a, b| a.name.cmp(&b.name));

    let mut sections = Vec::new();
    for repo in repos {
        let issues = github
            .get_closed_issues(organization, &repo.name, days)
            .await
            .with_context(|| format!("Failed to list closed issues of {}/{}", organization, repo.name))?;
        debug!(repo = %repo.name, closed = issues.len(), "fetched closed issues");

        if !issues.is_empty() {
            sections.push(ClosedSection {
                repository: repo.name,
                issues,
            });
        }
    }
    Ok(sections)
}

/// `### repo` followed by `- [#N](url) - title closed_at` per issue
pub fn render_closed_digest(sections: &[ClosedSection]) -> String {
    let mut md = String::new();
    for section in sections {
        let _ = write!(md, "\n### {}\n\n", section.repository);
        for issue in &section.issues {
            let closed_at = issue
                .closed_at
                .map(|at| at.format("%Y-%m-%dT%H:%M:%SZ").to_string())
                .unwrap_or_default();
            let _ = writeln!(
                md,
                "- [#{}]({}) - {} {}",
                issue.number, issue.html_url, issue.title, closed_at
            );
        }
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_sections() {
        let issue: Issue = serde_json::from_value(json!({
            "number": 12,
            "title": "Fix login",
            "html_url": "https://github.com/acme/api/issues/12",
            "state": "closed",
            "closed_at": "2024-05-02T08:15:00Z"
        }))
        .unwrap();

        let md = render_closed_digest(&[ClosedSection {
            repository: "api".to_string(),
            issues: vec![issue],
        }]);
        assert_eq!(
            md,
            "\n### api\n\n- [#12](https://github.com/acme/api/issues/12) - Fix login 2024-05-02T08:15:00Z\n"
        );
        assert_eq!(render_closed_digest(&[]), "");
    }
}
