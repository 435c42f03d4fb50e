//! HTTP client for the real-time feed endpoints.

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, error};

use super::acquire::FeedProvider;
use super::catalog::{DEFAULT_BASE_URL, feed_url};
use super::decode::{FeedDecoder, GtfsRealtimeDecoder};
use super::error::FeedError;
use super::types::DecodedFeed;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedClientConfig {
    /// API key sent as `x-api-key`; feeds are fetched anonymously without one
    pub api_key: Option<String>,
    /// Base URL for the feed endpoints (defaults to production MTA)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FeedClientConfig {
    /// Create a new config with production defaults and no API key.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the API key. Empty keys are ignored.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = Some(key).filter(|k| !k.trim().is_empty());
        self
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for FeedClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetches feed payloads over HTTP and hands them to a decoder.
#[derive(Debug, Clone)]
pub struct FeedClient<D = GtfsRealtimeDecoder> {
    http: reqwest::Client,
    base_url: String,
    decoder: D,
}

impl FeedClient<GtfsRealtimeDecoder> {
    /// Create a client using the GTFS-realtime decoder.
    pub fn new(config: FeedClientConfig) -> Result<Self, FeedError> {
        Self::with_decoder(config, GtfsRealtimeDecoder)
    }
}

impl<D: FeedDecoder> FeedClient<D> {
    /// Create a client with a custom decoder.
    pub fn with_decoder(config: FeedClientConfig, decoder: D) -> Result<Self, FeedError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| FeedError::InvalidApiKey)?;
            headers.insert("x-api-key", value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            decoder,
        })
    }

    /// Fetch the raw payload for a named feed.
    pub async fn fetch_bytes(&self, feed: &str) -> Result<Vec<u8>, FeedError> {
        let url = feed_url(&self.base_url, feed)
            .ok_or_else(|| FeedError::UnknownFeed(feed.to_string()))?;

        debug!(feed, %url, "fetching feed");
        let response = self.http.get(&url).send().await?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            error!(feed, status = status.as_u16(), "feed request unauthorized");
            return Err(FeedError::Unauthorized {
                feed: feed.to_string(),
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                feed: feed.to_string(),
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

impl<D: FeedDecoder> FeedProvider for FeedClient<D> {
    async fn fetch_feed(&self, feed: &str) -> Result<DecodedFeed, FeedError> {
        let bytes = self.fetch_bytes(feed).await?;
        self.decoder.decode(feed, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = FeedClientConfig::new()
            .with_api_key("test-key")
            .with_base_url("http://localhost:8080")
            .with_timeout(5);

        assert_eq!(config.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn config_defaults() {
        let config = FeedClientConfig::default();

        assert_eq!(config.api_key, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn blank_api_key_ignored() {
        let config = FeedClientConfig::new().with_api_key("  ");
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn invalid_api_key_rejected() {
        let config = FeedClientConfig::new().with_api_key("bad\nkey");
        assert!(matches!(
            FeedClient::new(config).unwrap_err(),
            FeedError::InvalidApiKey
        ));
    }

    #[tokio::test]
    async fn unknown_feed_fails_before_network() {
        let client = FeedClient::new(FeedClientConfig::new()).unwrap();
        let err = client.fetch_bytes("gtfs-g").await.unwrap_err();
        assert!(matches!(err, FeedError::UnknownFeed(_)));
    }
}
