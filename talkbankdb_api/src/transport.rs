//! The network seam: post a JSON body to a route, get JSON back.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::Error;

/// Production TalkBankDB endpoint.
pub const DEFAULT_BASE_URL: &str = "https://sla2.talkbank.org:1515/";

/// Request timeout for TalkBankDB calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends one request to the service and returns the decoded JSON body.
///
/// Implementations report credential rejection as [`Error::Authentication`]
/// and network failures as [`Error::Transport`].
pub trait Transport: Send + Sync {
    fn post_json(
        &self,
        route: &str,
        body: &Value,
    ) -> impl Future<Output = Result<Value, Error>> + Send;
}

/// [`Transport`] over HTTPS with `reqwest`.
pub struct HttpTransport {
    client: reqwest::Client,
    /// Base URL for the API, always ending in `/`.
    base_api_url: Url,
}

impl HttpTransport {
    /// Creates a transport pointing at the production TalkBankDB service.
    pub fn new() -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a transport with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_api_url = Url::parse(&normalized).map_err(|e| {
            tracing::error!("Invalid base URL {}: {}", base_url, e);
            Error::InvalidUrl(e)
        })?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("talkbankdb_api/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Transport(e)
            })?;
        Ok(Self {
            client,
            base_api_url,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_api_url.as_str()
    }

    fn get_url(&self, route: &str) -> Result<Url, Error> {
        self.base_api_url.join(route).map_err(|e| {
            tracing::error!("Invalid URL constructed for route {}: {}", route, e);
            Error::InvalidUrl(e)
        })
    }
}

impl Transport for HttpTransport {
    async fn post_json(&self, route: &str, body: &Value) -> Result<Value, Error> {
        let url = self.get_url(route)?;
        let resp = self
            .client
            .post(url)
            .header("accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach {}: {}", route, e);
                Error::Transport(e)
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Transport(e)
        })?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            tracing::error!("Credentials rejected by {} ({})", route, status);
            return Err(Error::Authentication(text));
        }

        if !status.is_success() {
            let snippet = truncate_body(&text);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        serde_json::from_str::<Value>(&text).map_err(|e| {
            let snippet = truncate_body(&text);
            tracing::error!("Failed to parse response: {} | body: {}", e, snippet);
            Error::MalformedResponse(format!("{} | body: {}", e, snippet))
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
