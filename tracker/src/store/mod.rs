//! Local activity event store
//!
//! Pulls repository events from GitHub and keeps them in SQLite, one row per
//! GitHub event id. Every user insert and every event write is committed on
//! its own, so an aborted sync keeps whatever it already wrote.

pub mod classify;

pub use classify::{derive, DerivedEvent, EventKind};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use github_api::{ClientConfig, Credentials, GitHubClient, RepoEvent};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::db::{Database, NewEvent, StoredEvent, UpsertOutcome};

/// Counters reported by [`EventStore::sync`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub repositories: usize,
    pub events: usize,
    pub inserted: usize,
    pub updated: usize,
    pub users_created: usize,
}

/// Event store backed by a [`Database`]
#[derive(Clone)]
pub struct EventStore {
    db: Database,
}

impl EventStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the store at `path`, creating the file and schema as needed
    pub fn open(path: PathBuf) -> Result<Self> {
        Ok(Self::new(Database::open_at(path)?))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Create the user and event tables if absent
    pub fn ensure_schema(&self) -> Result<()> {
        self.db.ensure_schema()
    }

    /// Sync every repository of `organization` over HTTP
    pub async fn sync(
        &self,
        organization: &str,
        credentials: Credentials,
        timezone: Option<String>,
        config: ClientConfig,
    ) -> Result<SyncStats> {
        let github = GitHubClient::new(config, credentials, timezone)
            .context("Failed to build GitHub client")?;
        self.sync_with(&github, organization).await
    }

    /// Sync every repository of `organization` through an existing client
    ///
    /// Repositories are walked in name order. The first API error aborts the
    /// sync; rows written before it stay.
    pub async fn sync_with(&self, github: &GitHubClient, organization: &str) -> Result<SyncStats> {
        let org = github
            .get_org(organization)
            .await
            .with_context(|| format!("Failed to look up organization {}", organization))?;

        let mut repos = github
            .get_repos(&org)
            .await
            .with_context(|| format!("Failed to list repositories of {}", organization))?;
        repos.sort_by(|a, b| a.name.cmp(&b.name));

        let mut stats = SyncStats::default();
        for repo in &repos {
            let events = github
                .get_repo_events(organization, &repo.name)
                .await
                .with_context(|| format!("Failed to list events of {}/{}", organization, repo.name))?;
            debug!(repo = %repo.name, events = events.len(), "fetched events");

            for event in &events {
                self.record_event(&repo.name, event, &mut stats)?;
            }
            stats.repositories += 1;
        }

        info!(
            organization,
            repositories = stats.repositories,
            events = stats.events,
            inserted = stats.inserted,
            updated = stats.updated,
            users_created = stats.users_created,
            "event sync complete"
        );
        Ok(stats)
    }

    /// Derive and upsert one event, creating its actor on first sight
    pub fn record_event(&self, repo: &str, event: &RepoEvent, stats: &mut SyncStats) -> Result<()> {
        let (user_id, created) = self.db.ensure_user(&event.actor.login)?;
        if created {
            stats.users_created += 1;
        }

        let derived = derive(event);
        let row = NewEvent {
            user_id,
            created_at: event.created_at.clone(),
            source_id: event.id.clone(),
            repo: repo.to_string(),
            event: derived.kind.label().to_string(),
            payload_id: derived.payload_id,
            action: derived.action,
            url: derived.url,
            title: derived.title,
        };

        stats.events += 1;
        match self.db.upsert_event(&row)? {
            UpsertOutcome::Inserted(_) => stats.inserted += 1,
            UpsertOutcome::Updated(_) => stats.updated += 1,
        }
        Ok(())
    }

    /// Stored events created at or after `cutoff`, oldest first
    pub fn events_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<StoredEvent>> {
        self.db.events_since(cutoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use github_api::testing::ScriptedTransport;
    use github_api::HttpResponse;
    use serde_json::json;
    use std::sync::Arc;

    fn client(transport: Arc<ScriptedTransport>) -> GitHubClient {
        GitHubClient::with_transport(
            transport,
            ClientConfig {
                api_url: "https://api.test".to_string(),
                ..ClientConfig::default()
            },
            Credentials::new("octo", "secret"),
            None,
        )
    }

    fn org_routes() -> ScriptedTransport {
        ScriptedTransport::new()
            .route(
                "https://api.test/orgs/acme",
                HttpResponse::json(
                    200,
                    json!({"login": "acme", "repos_url": "https://api.test/orgs/acme/repos"}),
                ),
            )
            .route(
                "https://api.test/orgs/acme/repos",
                HttpResponse::json(200, json!([{"name": "web"}, {"name": "api"}])),
            )
    }

    fn issue_event(id: &str, login: &str, action: &str, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "type": "IssuesEvent",
            "actor": {"login": login},
            "payload": {
                "action": action,
                "issue": {"number": 3, "title": title, "html_url": "https://github.com/acme/api/issues/3"}
            },
            "created_at": "2024-05-01T12:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_sync_twice_overwrites_in_place() {
        let transport = Arc::new(
            org_routes()
                .route(
                    "https://api.test/repos/acme/api/events",
                    HttpResponse::json(200, json!([issue_event("e1", "octo", "opened", "Bug")])),
                )
                .route(
                    "https://api.test/repos/acme/api/events",
                    HttpResponse::json(200, json!([issue_event("e1", "octo", "closed", "Bug (fixed)")])),
                )
                .route(
                    "https://api.test/repos/acme/web/events",
                    HttpResponse::json(200, json!([issue_event("e2", "hubot", "opened", "Style")])),
                ),
        );
        let github = client(transport);
        let store = EventStore::new(Database::open_in_memory().unwrap());

        let first = store.sync_with(&github, "acme").await.unwrap();
        assert_eq!(
            first,
            SyncStats {
                repositories: 2,
                events: 2,
                inserted: 2,
                updated: 0,
                users_created: 2,
            }
        );

        let second = store.sync_with(&github, "acme").await.unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.updated, 2);
        assert_eq!(second.users_created, 0);

        let db = store.database();
        assert_eq!(db.count_events().unwrap(), 2);
        let stored = db.get_event_by_source_id("e1").unwrap().unwrap();
        assert_eq!(stored.action.as_deref(), Some("Closed"));
        assert_eq!(stored.title.as_deref(), Some("Bug (fixed)"));
        assert_eq!(stored.event, "Issues");
        assert_eq!(stored.repo, "api");
        assert_eq!(stored.payload_id.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_api_error_keeps_committed_rows() {
        // `api` sorts first and succeeds; `web` has no route and 404s
        let transport = Arc::new(org_routes().route(
            "https://api.test/repos/acme/api/events",
            HttpResponse::json(200, json!([issue_event("e1", "octo", "opened", "Bug")])),
        ));
        let github = client(transport);
        let store = EventStore::new(Database::open_in_memory().unwrap());

        let err = store.sync_with(&github, "acme").await.unwrap_err();
        assert!(format!("{:?}", err).contains("404"));
        assert_eq!(store.database().count_events().unwrap(), 1);
        assert!(store.database().find_user_id("octo").unwrap().is_some());
    }

    #[test]
    fn test_open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.db");
        let store = EventStore::open(path.clone()).unwrap();
        store.ensure_schema().unwrap();
        assert!(path.exists());
    }
}
