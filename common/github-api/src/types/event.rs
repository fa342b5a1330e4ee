//! Repository activity event definitions
//!
//! Event payloads differ per event type. Every payload field we read is
//! optional here; deciding which one wins is left to the consumer.

use serde::{Deserialize, Serialize};

use super::common::User;

/// One entry from `GET /repos/{owner}/{repo}/events`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoEvent {
    /// GitHub's event id, stable across listings
    pub id: String,

    /// External type tag, e.g. `PullRequestEvent`
    #[serde(rename = "type")]
    pub event_type: String,

    pub actor: User,

    #[serde(default)]
    pub payload: EventPayload,

    /// ISO 8601 timestamp, stored verbatim
    pub created_at: String,
}

/// The subset of event payload fields the tracker understands
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub number: Option<u64>,

    #[serde(default)]
    pub action: Option<String>,

    /// `branch`, `tag` or `repository` on create/delete events
    #[serde(default)]
    pub ref_type: Option<String>,

    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,

    #[serde(default)]
    pub issue: Option<PayloadItem>,

    #[serde(default)]
    pub pull_request: Option<PayloadItem>,

    #[serde(default)]
    pub comment: Option<PayloadComment>,

    #[serde(default)]
    pub commits: Vec<PushCommit>,

    /// Wiki pages touched by a `GollumEvent`
    #[serde(default)]
    pub pages: Vec<WikiPage>,
}

/// Issue or pull request embedded in a payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayloadItem {
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayloadComment {
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushCommit {
    pub sha: String,
    #[serde(default)]
    pub message: String,
    /// API URL of the commit (`https://api.github.com/repos/...`)
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiPage {
    pub sha: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_push_event_decodes() {
        let event: RepoEvent = serde_json::from_value(json!({
            "id": "123",
            "type": "PushEvent",
            "actor": {"login": "octo", "id": 1},
            "repo": {"name": "acme/api"},
            "payload": {
                "ref": "refs/heads/main",
                "commits": [{
                    "sha": "abc123",
                    "message": "Fix things\n\nLonger text",
                    "url": "https://api.github.com/repos/acme/api/commits/abc123"
                }]
            },
            "created_at": "2024-05-01T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(event.event_type, "PushEvent");
        assert_eq!(event.payload.git_ref.as_deref(), Some("refs/heads/main"));
        assert_eq!(event.payload.commits.len(), 1);
        assert!(event.payload.issue.is_none());
    }

    #[test]
    fn test_missing_payload_defaults() {
        let event: RepoEvent = serde_json::from_value(json!({
            "id": "9",
            "type": "WatchEvent",
            "actor": {"login": "octo"},
            "created_at": "2024-05-01T12:00:00Z"
        }))
        .unwrap();
        assert!(event.payload.action.is_none());
        assert!(event.payload.pages.is_empty());
    }
}
