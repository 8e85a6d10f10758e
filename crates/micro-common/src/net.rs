//! HTTP fetch utilities for the micro application loader.
//!
//! The loader only ever needs the text of a resource. [`Fetcher`] is the
//! contract it depends on; [`HttpFetcher`] is the production implementation.
//!
//! TODO: Implement proper Fetch Standard (<https://fetch.spec.whatwg.org/>)
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// User-Agent header sent with all requests unless configured otherwise.
///
/// Mimics a common desktop browser to avoid basic bot detection.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    Client(String),
    /// The request could not be sent or timed out.
    #[error("request to {url} failed: {message}")]
    Request {
        /// URL that was requested.
        url: String,
        /// Underlying transport error.
        message: String,
    },
    /// The server answered with a non-success status.
    #[error("HTTP error {status} for {url}")]
    Status {
        /// URL that was requested.
        url: String,
        /// Status code returned by the server.
        status: u16,
    },
    /// The response body could not be decoded as text.
    #[error("failed to read response body from {url}: {message}")]
    Body {
        /// URL that was requested.
        url: String,
        /// Underlying decode error.
        message: String,
    },
    /// Used by non-network fetchers (tests, caches) to report a missing resource.
    #[error("resource not available: {0}")]
    Unavailable(String),
}

/// Retrieves the text content of a URL.
///
/// The loader runs on a single-threaded executor, so implementations do not
/// need to be `Send`.
#[async_trait(?Send)]
pub trait Fetcher {
    /// Fetch `url` and return its body as text.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the resource cannot be retrieved.
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// [`Fetcher`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpFetcher {
    /// Create a fetcher with the given User-Agent and request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client cannot be created.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
        })
    }

    /// Create a fetcher with [`DEFAULT_USER_AGENT`] and [`DEFAULT_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }
}

#[async_trait(?Send)]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        debug!(url, "fetching");
        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
