//! Common types shared across GitHub entities

use serde::{Deserialize, Serialize};

/// Represents a GitHub user (assignee, event actor, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// GitHub login/username
    pub login: String,
}

/// Represents a GitHub label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Label name
    pub name: String,

    /// Label color (hex without #)
    #[serde(default)]
    pub color: Option<String>,
}

/// Organization as returned by `GET /orgs/{org}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub login: String,

    /// Absolute URL listing the organization's repositories
    pub repos_url: String,
}

/// Repository as returned by the repository listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,

    #[serde(default)]
    pub full_name: String,

    #[serde(default)]
    pub html_url: String,
}
