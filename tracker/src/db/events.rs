//! Event upsert and window queries

use super::users::UserRecord;
use super::Database;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};

/// Value of the `source` column for everything synced from GitHub
pub const EVENT_SOURCE: &str = "GitHub";

/// Fields written on insert and overwritten on every later sight
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub user_id: i64,
    pub created_at: String,
    /// GitHub's event id; unique across the table
    pub source_id: String,
    pub repo: String,
    pub event: String,
    pub payload_id: Option<String>,
    pub action: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
}

/// Event row joined with its user
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEvent {
    pub event_id: i64,
    pub user_id: i64,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub source: String,
    pub source_id: String,
    pub repo: String,
    pub event: String,
    pub payload_id: Option<String>,
    pub action: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted(i64),
    Updated(i64),
}

impl UpsertOutcome {
    pub fn event_id(&self) -> i64 {
        match self {
            UpsertOutcome::Inserted(id) | UpsertOutcome::Updated(id) => *id,
        }
    }
}

const SELECT_STORED: &str = r#"
    SELECT e.event_id, e.user_id, u.first_name, u.last_name, u.github,
           e.created_at, e.source, e.source_id, e.repo, e.event,
           e.payload_id, e.action, e.url, e.title
    FROM event e
    LEFT JOIN user u ON u.user_id = e.user_id
"#;

fn stored_from_row(row: &Row<'_>) -> rusqlite::Result<StoredEvent> {
    let user_id: i64 = row.get(1)?;
    let github: Option<String> = row.get(4)?;
    let user = UserRecord {
        user_id,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        github: github.unwrap_or_else(|| "unknown".to_string()),
    };

    let created_at: String = row.get(5)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(StoredEvent {
        event_id: row.get(0)?,
        user_id,
        display_name: user.display_name(),
        created_at,
        source: row.get(6)?,
        source_id: row.get(7)?,
        repo: row.get(8)?,
        event: row.get(9)?,
        payload_id: row.get(10)?,
        action: row.get(11)?,
        url: row.get(12)?,
        title: row.get(13)?,
    })
}

impl Database {
    /// Insert the event if its source id is unseen, otherwise overwrite it
    ///
    /// Lookup and write share one transaction, committed before returning.
    pub fn upsert_event(&self, event: &NewEvent) -> Result<UpsertOutcome> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT event_id FROM event WHERE source_id = ?1",
                [&event.source_id],
                |row| row.get(0),
            )
            .optional()?;

        let outcome = match existing {
            None => {
                tx.execute(
                    r#"
                    INSERT INTO event (user_id, created_at, source, source_id, repo, event,
                                       payload_id, action, url, title)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                    "#,
                    params![
                        event.user_id,
                        event.created_at,
                        EVENT_SOURCE,
                        event.source_id,
                        event.repo,
                        event.event,
                        event.payload_id,
                        event.action,
                        event.url,
                        event.title,
                    ],
                )
                .with_context(|| format!("Failed to insert event {}", event.source_id))?;
                UpsertOutcome::Inserted(tx.last_insert_rowid())
            }
            Some(event_id) => {
                tx.execute(
                    r#"
                    UPDATE event SET
                        user_id = ?1, created_at = ?2, source = ?3, source_id = ?4, repo = ?5,
                        event = ?6, payload_id = ?7, action = ?8, url = ?9, title = ?10
                    WHERE event_id = ?11
                    "#,
                    params![
                        event.user_id,
                        event.created_at,
                        EVENT_SOURCE,
                        event.source_id,
                        event.repo,
                        event.event,
                        event.payload_id,
                        event.action,
                        event.url,
                        event.title,
                        event_id,
                    ],
                )
                .with_context(|| format!("Failed to update event {}", event.source_id))?;
                UpsertOutcome::Updated(event_id)
            }
        };

        tx.commit()?;
        Ok(outcome)
    }

    /// Get an event by GitHub event id
    pub fn get_event_by_source_id(&self, source_id: &str) -> Result<Option<StoredEvent>> {
        let conn = self.conn()?;
        let sql = format!("{} WHERE e.source_id = ?1", SELECT_STORED);
        let event = conn
            .query_row(&sql, [source_id], stored_from_row)
            .optional()?;
        Ok(event)
    }

    /// Events created at or after `cutoff`, oldest first
    pub fn events_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<StoredEvent>> {
        let conn = self.conn()?;
        let sql = format!(
            "{} WHERE e.created_at >= ?1 ORDER BY e.created_at ASC, e.event_id ASC",
            SELECT_STORED
        );
        let mut stmt = conn.prepare(&sql)?;

        let cutoff = cutoff.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let events = stmt
            .query_map([cutoff], stored_from_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read events")?;

        Ok(events)
    }

    pub fn count_events(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM event", [], |row| row.get(0))?;
        Ok(count)
    }
}
