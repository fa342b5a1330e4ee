//! Event classification and field derivation
//!
//! Raw events carry loosely shaped payloads. Everything the store keeps is
//! derived here, once per event, from a fixed priority order per field.

use github_api::{EventPayload, RepoEvent};

/// Classified event type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Push,
    Create,
    Delete,
    /// `GollumEvent`
    Wiki,
    /// Any other type, already spaced (`Pull Request`, `Issue Comment`)
    Other(String),
}

impl EventKind {
    /// Strip the `Event` suffix and space out interior capitals
    pub fn classify(event_type: &str) -> Self {
        let base = event_type.strip_suffix("Event").unwrap_or(event_type);

        let mut spaced = String::with_capacity(base.len() + 4);
        for (i, ch) in base.chars().enumerate() {
            if i > 0 && ch.is_ascii_uppercase() {
                spaced.push(' ');
            }
            spaced.push(ch);
        }

        match spaced.as_str() {
            "Push" => EventKind::Push,
            "Create" => EventKind::Create,
            "Delete" => EventKind::Delete,
            "Gollum" => EventKind::Wiki,
            _ => EventKind::Other(spaced),
        }
    }

    /// Value stored in the `event` column
    pub fn label(&self) -> &str {
        match self {
            EventKind::Push => "Push",
            EventKind::Create => "Create",
            EventKind::Delete => "Delete",
            EventKind::Wiki => "Wiki",
            EventKind::Other(label) => label,
        }
    }
}

/// Upper-case the first letter of every word and lower-case the rest.
/// Any non-letter starts a new word, so `ready_for_review` becomes
/// `Ready_For_Review`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if in_word {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        in_word = ch.is_alphabetic();
    }
    out
}

/// Fields derived from one raw event
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedEvent {
    pub kind: EventKind,
    pub payload_id: Option<String>,
    pub action: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
}

/// Derive the stored fields of `event`
pub fn derive(event: &RepoEvent) -> DerivedEvent {
    let kind = EventKind::classify(&event.event_type);
    let payload = &event.payload;

    DerivedEvent {
        payload_id: payload_id(&kind, payload),
        action: action(&kind, payload),
        url: url(&kind, payload),
        title: title(&kind, payload),
        kind,
    }
}

// Linked objects are read most specific first: comment, then pull request, then issue.
fn payload_id(kind: &EventKind, payload: &EventPayload) -> Option<String> {
    let number = payload
        .pull_request
        .as_ref()
        .and_then(|pr| pr.number)
        .or_else(|| payload.issue.as_ref().and_then(|issue| issue.number))
        .or(payload.number)
        .map(|n| n.to_string());

    match kind {
        EventKind::Push => payload
            .commits
            .first()
            .map(|commit| commit.sha.clone())
            .or(number),
        EventKind::Wiki => payload
            .pages
            .first()
            .map(|page| page.sha.clone())
            .or(number),
        _ => number,
    }
}

fn action(kind: &EventKind, payload: &EventPayload) -> Option<String> {
    let own = payload.action.as_deref().map(title_case);
    let ref_type = payload.ref_type.as_deref().map(title_case);

    match kind {
        EventKind::Create => ref_type.map(|r| format!("Created {}", r)).or(own),
        EventKind::Delete => ref_type.map(|r| format!("Deleted {}", r)).or(own),
        EventKind::Wiki => payload
            .pages
            .first()
            .and_then(|page| page.action.as_deref())
            .map(title_case)
            .or(own),
        _ => own,
    }
}

fn url(kind: &EventKind, payload: &EventPayload) -> Option<String> {
    let linked = payload
        .comment
        .as_ref()
        .and_then(|comment| comment.html_url.clone())
        .or_else(|| payload.pull_request.as_ref().and_then(|pr| pr.html_url.clone()))
        .or_else(|| payload.issue.as_ref().and_then(|issue| issue.html_url.clone()));

    match kind {
        EventKind::Push => payload
            .commits
            .first()
            .map(|commit| commit_web_url(&commit.url))
            .or(linked),
        EventKind::Wiki => payload
            .pages
            .first()
            .and_then(|page| page.html_url.clone())
            .or(linked),
        _ => linked,
    }
}

fn title(kind: &EventKind, payload: &EventPayload) -> Option<String> {
    let linked = payload
        .pull_request
        .as_ref()
        .and_then(|pr| pr.title.clone())
        .or_else(|| payload.issue.as_ref().and_then(|issue| issue.title.clone()));

    match kind {
        EventKind::Push => payload
            .commits
            .first()
            .map(|commit| {
                let git_ref = payload.git_ref.as_deref().unwrap_or_default();
                let summary = commit.message.lines().next().unwrap_or_default();
                format!("{}: {}", git_ref, summary)
            })
            .or(linked),
        EventKind::Create | EventKind::Delete => payload.git_ref.clone().or(linked),
        EventKind::Wiki => payload
            .pages
            .first()
            .and_then(|page| page.title.clone())
            .or(linked),
        _ => linked,
    }
}

/// `https://api.github.com/repos/o/r/commits/sha` -> `https://github.com/o/r/commits/sha`
fn commit_web_url(api_url: &str) -> String {
    api_url.replacen("api.", "", 1).replacen("repos/", "", 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn event(event_type: &str, payload: Value) -> RepoEvent {
        serde_json::from_value(json!({
            "id": "1",
            "type": event_type,
            "actor": {"login": "octo"},
            "payload": payload,
            "created_at": "2024-05-01T12:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_classify() {
        assert_eq!(EventKind::classify("IssuesEvent").label(), "Issues");
        assert_eq!(EventKind::classify("PullRequestEvent").label(), "Pull Request");
        assert_eq!(
            EventKind::classify("PullRequestReviewCommentEvent").label(),
            "Pull Request Review Comment"
        );
        assert_eq!(EventKind::classify("GollumEvent"), EventKind::Wiki);
        assert_eq!(EventKind::classify("PushEvent"), EventKind::Push);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("opened"), "Opened");
        assert_eq!(title_case("BRANCH"), "Branch");
        assert_eq!(title_case("ready_for_review"), "Ready_For_Review");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_issue_comment_prefers_comment_url() {
        let derived = derive(&event(
            "IssueCommentEvent",
            json!({
                "action": "created",
                "issue": {"number": 7, "title": "Crash on start", "html_url": "https://github.com/acme/api/issues/7"},
                "comment": {"html_url": "https://github.com/acme/api/issues/7#issuecomment-1"}
            }),
        ));
        assert_eq!(derived.kind.label(), "Issue Comment");
        assert_eq!(derived.payload_id.as_deref(), Some("7"));
        assert_eq!(derived.action.as_deref(), Some("Created"));
        assert_eq!(
            derived.url.as_deref(),
            Some("https://github.com/acme/api/issues/7#issuecomment-1")
        );
        assert_eq!(derived.title.as_deref(), Some("Crash on start"));
    }

    #[test]
    fn test_pull_request_wins_over_issue() {
        let derived = derive(&event(
            "PullRequestReviewEvent",
            json!({
                "action": "created",
                "number": 12,
                "issue": {"number": 11, "title": "Tracking bug", "html_url": "https://github.com/acme/api/issues/11"},
                "pull_request": {"number": 12, "title": "Fix tracking bug", "html_url": "https://github.com/acme/api/pull/12"}
            }),
        ));
        assert_eq!(derived.payload_id.as_deref(), Some("12"));
        assert_eq!(derived.url.as_deref(), Some("https://github.com/acme/api/pull/12"));
        assert_eq!(derived.title.as_deref(), Some("Fix tracking bug"));
    }

    #[test]
    fn test_pull_request_fields() {
        let derived = derive(&event(
            "PullRequestEvent",
            json!({
                "action": "closed",
                "number": 9,
                "pull_request": {"number": 9, "title": "Add cache", "html_url": "https://github.com/acme/api/pull/9"}
            }),
        ));
        assert_eq!(derived.payload_id.as_deref(), Some("9"));
        assert_eq!(derived.action.as_deref(), Some("Closed"));
        assert_eq!(derived.url.as_deref(), Some("https://github.com/acme/api/pull/9"));
        assert_eq!(derived.title.as_deref(), Some("Add cache"));
    }

    #[test]
    fn test_push_uses_first_commit() {
        let derived = derive(&event(
            "PushEvent",
            json!({
                "ref": "refs/heads/main",
                "commits": [
                    {"sha": "abc1234def", "message": "Fix login\n\nDetails", "url": "https://api.github.com/repos/acme/api/commits/abc1234def"},
                    {"sha": "fff", "message": "Second", "url": "https://api.github.com/repos/acme/api/commits/fff"}
                ]
            }),
        ));
        assert_eq!(derived.kind, EventKind::Push);
        assert_eq!(derived.payload_id.as_deref(), Some("abc1234def"));
        assert_eq!(
            derived.url.as_deref(),
            Some("https://github.com/acme/api/commits/abc1234def")
        );
        assert_eq!(derived.title.as_deref(), Some("refs/heads/main: Fix login"));
        assert_eq!(derived.action, None);
    }

    #[test]
    fn test_create_and_delete() {
        let created = derive(&event(
            "CreateEvent",
            json!({"ref": "feature/x", "ref_type": "branch"}),
        ));
        assert_eq!(created.action.as_deref(), Some("Created Branch"));
        assert_eq!(created.title.as_deref(), Some("feature/x"));

        let deleted = derive(&event("DeleteEvent", json!({"ref": "v1.0", "ref_type": "tag"})));
        assert_eq!(deleted.action.as_deref(), Some("Deleted Tag"));
        assert_eq!(deleted.payload_id, None);
    }

    #[test]
    fn test_wiki_uses_first_page() {
        let derived = derive(&event(
            "GollumEvent",
            json!({
                "pages": [{"sha": "0123456789", "action": "edited", "title": "Home", "html_url": "https://github.com/acme/api/wiki/Home"}]
            }),
        ));
        assert_eq!(derived.kind.label(), "Wiki");
        assert_eq!(derived.payload_id.as_deref(), Some("0123456789"));
        assert_eq!(derived.action.as_deref(), Some("Edited"));
        assert_eq!(derived.url.as_deref(), Some("https://github.com/acme/api/wiki/Home"));
        assert_eq!(derived.title.as_deref(), Some("Home"));
    }

    #[test]
    fn test_event_without_payload_fields() {
        let derived = derive(&event("WatchEvent", json!({"action": "started"})));
        assert_eq!(derived.kind.label(), "Watch");
        assert_eq!(derived.action.as_deref(), Some("Started"));
        assert_eq!(derived.payload_id, None);
        assert_eq!(derived.url, None);
        assert_eq!(derived.title, None);
    }
}
