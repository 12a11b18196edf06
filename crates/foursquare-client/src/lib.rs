pub mod types;

pub use reqwest::StatusCode;
pub use types::{SearchParams, SearchResponse, Venue};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::{debug, info, instrument};

pub const DEFAULT_BASE_URL: &str = "https://api.foursquare.com/v2";
const SEARCH_PATH: &str = "venues/search";
const TOKEN_PARAM: &str = "oauth_token";

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(String),
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("unexpected status code: {0}")]
    Status(StatusCode),
    #[error("failed to decode search response: {0}")]
    Decode(String),
}

impl ClientError {
    /// True when no HTTP response was obtained at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Build(_) | Self::Http(_))
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Request timeout; `None` keeps reqwest's default.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: "FoursquareBot/0.1".to_string(),
            timeout: None,
        }
    }
}

/// Seam between the message handler and the remote venue search.
#[async_trait]
pub trait VenueSearch: Send + Sync {
    async fn search_venues(&self, params: &SearchParams) -> Result<SearchResponse, ClientError>;
}

#[derive(Debug, Clone)]
pub struct FoursquareClient {
    http: Client,
    config: ClientConfig,
}

impl FoursquareClient {
    pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone()).gzip(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|error| ClientError::Build(error.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn search_url(&self) -> String {
        format!("{}/{SEARCH_PATH}", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl VenueSearch for FoursquareClient {
    #[instrument(name = "foursquare_client.search_venues", skip(self, params), fields(near = ?params.near))]
    async fn search_venues(&self, params: &SearchParams) -> Result<SearchResponse, ClientError> {
        let request = self
            .http
            .get(self.search_url())
            .query(params)
            .build()
            .map_err(|error| ClientError::Http(error.to_string()))?;

        info!(
            target: "foursquare_client",
            url = %redact_token(request.url()),
            "Issuing venue search"
        );

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|error| ClientError::Http(error.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(target: "foursquare_client", %status, "Venue search rejected");
            return Err(ClientError::Status(status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|error| ClientError::Http(error.to_string()))?;
        serde_json::from_slice(&body).map_err(|error| ClientError::Decode(error.to_string()))
    }
}

/// Copy of `url` with the OAuth token value masked, safe for logs.
pub fn redact_token(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == TOKEN_PARAM {
                "REDACTED".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    if !pairs.is_empty() {
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }
    redacted
}
