//! Error types for GitHub REST calls
//!
//! Every non-success HTTP status is normalized into a single [`ApiError`].
//! Transport and decoding failures are kept apart in [`GitHubError`] so
//! callers can still tell a refused request from a broken connection.

use thiserror::Error;

/// A non-success response from the GitHub API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{status}: {message} ({documentation_url}) [{url}]")]
pub struct ApiError {
    /// HTTP status code
    pub status: u16,
    /// Message supplied by the API (or the raw body when it was not JSON)
    pub message: String,
    /// URL of the request that failed
    pub url: String,
    /// Documentation link supplied by the API
    pub documentation_url: String,
}

/// Errors that can occur when talking to GitHub
#[derive(Error, Debug)]
pub enum GitHubError {
    /// The API answered with a non-success status
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The request never produced a response
    #[error("http transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the JSON we expected
    #[error("failed to decode GitHub response: {0}")]
    Decode(#[from] serde_json::Error),

    /// An endpoint or pagination link could not be turned into a URL
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// An endpoint answered with a different JSON shape than it should
    #[error("expected a JSON {expected} from {url}")]
    UnexpectedShape { url: String, expected: &'static str },

    /// The server kept handing out `next` links past the configured cap
    #[error("pagination for {url} exceeded {pages} pages")]
    PageLimit { url: String, pages: usize },

    /// A day window that is negative or reaches outside the supported date range
    #[error("invalid window of {days} days")]
    InvalidWindow { days: i64 },
}

/// Result type alias for GitHub operations
pub type GitHubResult<T> = Result<T, GitHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError {
            status: 404,
            message: "Not Found".to_string(),
            url: "https://api.github.com/orgs/nope".to_string(),
            documentation_url: "https://docs.github.com/rest".to_string(),
        };
        let text = err.to_string();
        assert!(text.starts_with("404: Not Found"));
        assert!(text.contains("https://api.github.com/orgs/nope"));
    }

    #[test]
    fn test_api_error_converts() {
        let err: GitHubError = ApiError {
            status: 401,
            message: "Bad credentials".to_string(),
            url: String::new(),
            documentation_url: String::new(),
        }
        .into();
        assert!(matches!(err, GitHubError::Api(ApiError { status: 401, .. })));
    }
}
