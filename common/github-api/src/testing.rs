//! Scripted in-memory transport
//!
//! Routes are matched on the exact request URL (query parameters passed
//! separately are not part of the key). A route can hold several responses;
//! they are served in order and the last one keeps being served.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::error::GitHubResult;
use crate::transport::{HttpRequest, HttpResponse, Transport};

impl HttpResponse {
    /// A response with a JSON body
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            link: None,
            body: body.to_string(),
        }
    }

    /// Attach a `rel="next"` link
    pub fn with_next(mut self, url: &str) -> Self {
        self.link = Some(format!("<{}>; rel=\"next\"", url));
        self
    }
}

#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `url`
    pub fn route(self, url: &str, response: HttpResponse) -> Self {
        self.push(url, response);
        self
    }

    /// Queue a response for `url` on an already shared transport
    pub fn push(&self, url: &str, response: HttpResponse) {
        self.routes
            .lock()
            .expect("routes lock poisoned")
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    /// Every request seen so far, in order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock poisoned").clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> GitHubResult<HttpResponse> {
        let url = request.url.clone();
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(request);

        let mut routes = self.routes.lock().expect("routes lock poisoned");
        let response = match routes.get_mut(&url) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        Ok(response.unwrap_or_else(|| {
            HttpResponse::json(
                404,
                json!({
                    "message": "Not Found",
                    "documentation_url": "https://docs.github.com/rest"
                }),
            )
        }))
    }
}
