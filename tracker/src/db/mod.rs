//! Database module for the activity event store
//!
//! Uses SQLite to store users and events in ~/.gh-tracker/events.db

pub mod events;
pub mod schema;
pub mod users;

pub use events::{NewEvent, StoredEvent, UpsertOutcome, EVENT_SOURCE};
pub use users::UserRecord;

use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// Database connection wrapper with thread-safe access
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create the database at a specific path
    pub fn open_at(path: PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {:?}", path))?;

        let db = Self::from_connection(conn);
        db.ensure_schema()?;

        tracing::info!("Database opened at {:?}", path);
        Ok(db)
    }

    /// In-memory database with the schema applied
    pub fn open_in_memory() -> Result<Self> {
        let db = Self::from_connection(Connection::open_in_memory()?);
        db.ensure_schema()?;
        Ok(db)
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create the user and event tables if they don't exist
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        schema::create_tables(&conn)
    }

    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("database connection lock poisoned"))
    }
}
