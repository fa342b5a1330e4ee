//! GitHub REST client
//!
//! A small, paginating client for the parts of the GitHub v3 REST API the
//! tracker needs: organization lookup, repository/milestone/issue/event
//! listings and issue body updates.
//!
//! # Example
//!
//! ```rust,ignore
//! use github_api::{ClientConfig, Credentials, GitHubClient};
//!
//! let github = GitHubClient::new(ClientConfig::default(), Credentials::new("me", "token"), None)?;
//! let org = github.get_org("acme").await?;
//! let repos = github.get_repos(&org).await?;
//! ```

pub mod client;
pub mod error;
pub mod pagination;
pub mod transport;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{ApiPayload, ClientConfig, Credentials, GitHubClient};
pub use error::{ApiError, GitHubError, GitHubResult};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use types::*;

// Re-export so callers of `call` don't need a direct reqwest dependency
pub use reqwest::Method;
