//! Database schema definitions

use anyhow::Result;
use rusqlite::Connection;

/// Create all tables if they don't exist
///
/// `event.source_id` carries no UNIQUE constraint; `Database::upsert_event`
/// keeps it unique by looking up and writing inside one transaction.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- GitHub users referenced by events
        CREATE TABLE IF NOT EXISTS user (
            user_id INTEGER PRIMARY KEY,
            first_name TEXT,
            last_name TEXT,
            github TEXT
        );

        -- Repository activity events
        CREATE TABLE IF NOT EXISTS event (
            event_id INTEGER PRIMARY KEY,
            user_id INTEGER,
            created_at TEXT,
            source TEXT,
            source_id TEXT,
            repo TEXT,
            event TEXT,
            payload_id TEXT,
            action TEXT,
            url TEXT,
            title TEXT
        );

        -- Lookup by login when resolving actors
        CREATE INDEX IF NOT EXISTS idx_user_github ON user(github);

        -- Lookup by external id on every upsert
        CREATE INDEX IF NOT EXISTS idx_event_source_id ON event(source_id);

        -- Window queries for the activity digest
        CREATE INDEX IF NOT EXISTS idx_event_created_at ON event(created_at);
        "#,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        // Verify tables exist
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(tables, vec!["event".to_string(), "user".to_string()]);
    }

    #[test]
    fn test_event_columns() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        let columns: Vec<String> = conn
            .prepare("SELECT name FROM pragma_table_info('event')")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(
            columns,
            [
                "event_id", "user_id", "created_at", "source", "source_id", "repo", "event",
                "payload_id", "action", "url", "title"
            ]
        );
    }
}
