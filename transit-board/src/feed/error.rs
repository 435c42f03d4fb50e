//! Feed acquisition error types.

use chrono::{DateTime, Utc};

/// Errors from fetching, decoding or validating a real-time feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API key cannot be sent as a header value
    #[error("invalid API key format")]
    InvalidApiKey,

    /// Credential missing or rejected (401/403)
    #[error("feed {feed} unauthorized (HTTP {status})")]
    Unauthorized { feed: String, status: u16 },

    /// Feed endpoint returned a non-success status
    #[error("feed {feed} returned HTTP {status}: {message}")]
    Api {
        feed: String,
        status: u16,
        message: String,
    },

    /// No catalog entry for the requested feed
    #[error("unknown feed: {0}")]
    UnknownFeed(String),

    /// Payload could not be decoded
    #[error("feed {feed} decode error: {message}")]
    Decode { feed: String, message: String },

    /// Feed is older than the staleness threshold, or carries no timestamp
    #[error("feed {feed} is stale: generated at {}", .generated_at.map(|t| t.to_rfc3339()).unwrap_or_else(|| "unknown".into()))]
    Stale {
        feed: String,
        generated_at: Option<DateTime<Utc>>,
        threshold_secs: u64,
    },
}

impl FeedError {
    /// Whether this is a freshness failure rather than a transport one.
    pub fn is_stale(&self) -> bool {
        matches!(self, FeedError::Stale { .. })
    }
}
