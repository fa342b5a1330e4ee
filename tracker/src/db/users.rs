//! User lookup and lazy creation

use super::Database;
use anyhow::{Context, Result};
use rusqlite::OptionalExtension;

/// User record
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub github: String,
}

impl UserRecord {
    /// "First Last" when a name is on file, otherwise the GitHub login
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            self.github.clone()
        } else {
            parts.join(" ")
        }
    }
}

impl Database {
    /// Find a user id by GitHub login
    pub fn find_user_id(&self, login: &str) -> Result<Option<i64>> {
        let conn = self.conn()?;
        let id = conn
            .query_row(
                "SELECT user_id FROM user WHERE github = ?1",
                [login],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// Return the id for `login`, inserting a user row on first sight
    ///
    /// The boolean is true when the row was created by this call. The insert
    /// is committed before returning so later lookups in the same run see it.
    pub fn ensure_user(&self, login: &str) -> Result<(i64, bool)> {
        if let Some(id) = self.find_user_id(login)? {
            return Ok((id, false));
        }

        let conn = self.conn()?;
        conn.execute("INSERT INTO user (github) VALUES (?1)", [login])
            .with_context(|| format!("Failed to create user {}", login))?;
        let id = conn.last_insert_rowid();
        tracing::debug!(login, user_id = id, "created user");
        Ok((id, true))
    }

    /// Get a user by id
    pub fn get_user(&self, user_id: i64) -> Result<Option<UserRecord>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT user_id, first_name, last_name, github FROM user WHERE user_id = ?1",
                [user_id],
                |row| {
                    Ok(UserRecord {
                        user_id: row.get(0)?,
                        first_name: row.get(1)?,
                        last_name: row.get(2)?,
                        github: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_user_creates_once() {
        let db = Database::open_in_memory().unwrap();

        let (first, created) = db.ensure_user("octo").unwrap();
        assert!(created);

        let (second, created) = db.ensure_user("octo").unwrap();
        assert!(!created);
        assert_eq!(first, second);

        let (other, _) = db.ensure_user("hubot").unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn test_get_user() {
        let db = Database::open_in_memory().unwrap();
        let (id, _) = db.ensure_user("octo").unwrap();

        let user = db.get_user(id).unwrap().unwrap();
        assert_eq!(user.github, "octo");
        assert_eq!(user.first_name, None);
        assert!(db.get_user(id + 100).unwrap().is_none());
    }

    #[test]
    fn test_display_name() {
        let mut user = UserRecord {
            user_id: 1,
            first_name: None,
            last_name: None,
            github: "octo".to_string(),
        };
        assert_eq!(user.display_name(), "octo");

        user.first_name = Some("Mona".to_string());
        user.last_name = Some("Lisa".to_string());
        assert_eq!(user.display_name(), "Mona Lisa");
    }
}
