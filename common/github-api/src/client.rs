//! Paginating GitHub REST client
//!
//! [`GitHubClient::call`] is the single entry point. Object bodies are
//! returned as-is; array bodies are accumulated across `rel="next"` links
//! until the server stops sending one. The derived operations below only
//! build endpoints and query parameters on top of it.

use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{ApiError, GitHubError, GitHubResult};
use crate::pagination::next_link;
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::types::{Issue, Milestone, Organization, RepoEvent, Repository};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_PER_PAGE: u32 = 100;
pub const DEFAULT_MAX_PAGES: usize = 1000;

const ACCEPT_V3: &str = "application/vnd.github.v3+json";

/// Client settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for relative endpoints
    pub api_url: String,
    /// Page size requested from list endpoints
    pub per_page: u32,
    /// Upper bound on followed `next` links for one call
    pub max_pages: usize,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
            max_pages: DEFAULT_MAX_PAGES,
            user_agent: concat!("gh-tracker/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// HTTP basic credentials (password may be a personal access token)
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Decoded body of a call
#[derive(Debug, Clone, PartialEq)]
pub enum ApiPayload {
    /// A non-array body, returned without pagination
    Single(Value),
    /// Every item of every page, in server order
    List(Vec<Value>),
}

impl ApiPayload {
    /// Deserialize a list payload into typed records
    pub fn into_list<T: DeserializeOwned>(self, url: &str) -> GitHubResult<Vec<T>> {
        match self {
            ApiPayload::List(items) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(GitHubError::from))
                .collect(),
            ApiPayload::Single(_) => Err(GitHubError::UnexpectedShape {
                url: url.to_string(),
                expected: "array",
            }),
        }
    }

    /// Deserialize a single-object payload
    pub fn into_single<T: DeserializeOwned>(self, url: &str) -> GitHubResult<T> {
        match self {
            ApiPayload::Single(value) => Ok(serde_json::from_value(value)?),
            ApiPayload::List(_) => Err(GitHubError::UnexpectedShape {
                url: url.to_string(),
                expected: "object",
            }),
        }
    }
}

/// GitHub REST client
pub struct GitHubClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
    credentials: Credentials,
    timezone: Option<String>,
}

impl GitHubClient {
    /// Create a client that talks HTTP through `reqwest`
    pub fn new(
        config: ClientConfig,
        credentials: Credentials,
        timezone: Option<String>,
    ) -> GitHubResult<Self> {
        let transport = ReqwestTransport::new(&config.user_agent)?;
        Ok(Self::with_transport(
            Arc::new(transport),
            config,
            credentials,
            timezone,
        ))
    }

    /// Create a client on top of any transport
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        config: ClientConfig,
        credentials: Credentials,
        timezone: Option<String>,
    ) -> Self {
        Self {
            transport,
            config,
            credentials,
            timezone,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Turn an endpoint into an absolute URL. Absolute URLs pass through.
    fn resolve(&self, endpoint: &str) -> GitHubResult<String> {
        let raw = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!(
                "{}/{}",
                self.config.api_url.trim_end_matches('/'),
                endpoint.trim_start_matches('/')
            )
        };

        Url::parse(&raw).map_err(|source| GitHubError::InvalidUrl {
            url: raw.clone(),
            source,
        })?;
        Ok(raw)
    }

    fn build_request(
        &self,
        method: Method,
        url: String,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> HttpRequest {
        let mut headers = vec![("Accept".to_string(), ACCEPT_V3.to_string())];
        if let Some(timezone) = &self.timezone {
            headers.push(("Time-Zone".to_string(), timezone.clone()));
        }

        HttpRequest {
            method,
            url,
            query,
            headers,
            basic_auth: Some((
                self.credentials.username.clone(),
                self.credentials.password.clone(),
            )),
            body,
        }
    }

    /// Perform a request, following pagination for array bodies
    ///
    /// # Errors
    ///
    /// - [`GitHubError::Api`] on any non-success status (no retries)
    /// - [`GitHubError::PageLimit`] when more than `max_pages` pages are offered
    #[instrument(skip(self, params, body))]
    pub async fn call(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
    ) -> GitHubResult<ApiPayload> {
        let mut url = self.resolve(endpoint)?;
        let mut query: Vec<(String, String)> = params
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        let mut items = Vec::new();
        let mut pages = 0usize;

        loop {
            // The next link already encodes the query, so it is only sent once
            let request = self.build_request(
                method.clone(),
                url.clone(),
                std::mem::take(&mut query),
                body.cloned(),
            );
            let response = self.transport.send(request).await?;
            pages += 1;

            match check_response(&url, &response)? {
                Value::Array(page) => {
                    debug!(url = %url, page = pages, items = page.len(), "received page");
                    items.extend(page);
                }
                other if pages == 1 => return Ok(ApiPayload::Single(other)),
                _ => {
                    return Err(GitHubError::UnexpectedShape {
                        url,
                        expected: "array",
                    })
                }
            }

            let Some(next) = response.link.as_deref().and_then(next_link) else {
                return Ok(ApiPayload::List(items));
            };

            if pages >= self.config.max_pages {
                warn!(endpoint, pages, "server keeps paginating, giving up");
                return Err(GitHubError::PageLimit {
                    url: endpoint.to_string(),
                    pages,
                });
            }

            debug!(next = %next, "following next link");
            url = self.resolve(&next)?;
        }
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> GitHubResult<Vec<T>> {
        self.call(Method::GET, endpoint, params, None)
            .await?
            .into_list(endpoint)
    }

    fn per_page(&self) -> String {
        self.config.per_page.to_string()
    }

    /// `GET /orgs/{org}`
    pub async fn get_org(&self, organization: &str) -> GitHubResult<Organization> {
        let endpoint = format!("orgs/{}", organization);
        self.call(Method::GET, &endpoint, &[], None)
            .await?
            .into_single(&endpoint)
    }

    /// All repositories of an organization, sorted by full name server-side
    pub async fn get_repos(&self, org: &Organization) -> GitHubResult<Vec<Repository>> {
        self.get_list(
            &org.repos_url,
            &[
                ("sort", "full_name".to_string()),
                ("page", "1".to_string()),
                ("per_page", self.per_page()),
            ],
        )
        .await
    }

    /// Open milestones of a repository
    pub async fn get_milestones(&self, organization: &str, repo: &str) -> GitHubResult<Vec<Milestone>> {
        self.get_list(
            &format!("repos/{}/{}/milestones", organization, repo),
            &[
                ("state", "open".to_string()),
                ("page", "1".to_string()),
                ("per_page", self.per_page()),
            ],
        )
        .await
    }

    /// Every issue and pull request (open and closed) in a milestone
    pub async fn get_issues(
        &self,
        organization: &str,
        repo: &str,
        milestone_number: u64,
    ) -> GitHubResult<Vec<Issue>> {
        self.get_list(
            &format!("repos/{}/{}/issues", organization, repo),
            &[
                ("state", "all".to_string()),
                ("milestone", milestone_number.to_string()),
                ("page", "1".to_string()),
                ("per_page", self.per_page()),
            ],
        )
        .await
    }

    /// Closed issues updated within the last `days` days
    pub async fn get_closed_issues(
        &self,
        organization: &str,
        repo: &str,
        days: i64,
    ) -> GitHubResult<Vec<Issue>> {
        self.get_list(
            &format!("repos/{}/{}/issues", organization, repo),
            &[
                ("state", "closed".to_string()),
                ("since", since_timestamp(days)?),
                ("page", "1".to_string()),
                ("per_page", self.per_page()),
            ],
        )
        .await
    }

    /// Recent activity events of a repository
    pub async fn get_repo_events(&self, organization: &str, repo: &str) -> GitHubResult<Vec<RepoEvent>> {
        self.get_list(
            &format!("repos/{}/{}/events", organization, repo),
            &[("page", "1".to_string()), ("per_page", self.per_page())],
        )
        .await
    }

    /// Replace the body of an issue
    ///
    /// `issue_ref` has the form `{owner}/{repo}/issues/{number}`.
    pub async fn update_issue(&self, issue_ref: &str, markdown: &str) -> GitHubResult<Value> {
        let endpoint = format!("repos/{}", issue_ref);
        let body = json!({ "body": markdown });
        match self.call(Method::PATCH, &endpoint, &[], Some(&body)).await? {
            ApiPayload::Single(value) => Ok(value),
            ApiPayload::List(_) => Err(GitHubError::UnexpectedShape {
                url: endpoint,
                expected: "object",
            }),
        }
    }
}

/// `since` parameter for a window of `days` days ending now
pub fn since_timestamp(days: i64) -> GitHubResult<String> {
    let start = window_start(Utc::now(), days)?;
    Ok(start.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

/// `now` minus `days` days
///
/// Fails with [`GitHubError::InvalidWindow`] for negative windows and for
/// windows reaching past the earliest representable date.
pub fn window_start(now: DateTime<Utc>, days: i64) -> GitHubResult<DateTime<Utc>> {
    if days < 0 {
        return Err(GitHubError::InvalidWindow { days });
    }
    Duration::try_days(days)
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or(GitHubError::InvalidWindow { days })
}

/// Map non-success statuses to [`ApiError`] and decode the body
fn check_response(url: &str, response: &HttpResponse) -> GitHubResult<Value> {
    if !response.is_success() {
        let parsed: Option<Value> = serde_json::from_str(&response.body).ok();
        let field = |name: &str| {
            parsed
                .as_ref()
                .and_then(|body| body.get(name))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        return Err(ApiError {
            status: response.status,
            message: field("message").unwrap_or_else(|| response.body.trim().to_string()),
            url: url.to_string(),
            documentation_url: field("documentation_url").unwrap_or_default(),
        }
        .into());
    }

    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&response.body)?)
}
