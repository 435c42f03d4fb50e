//! In-memory feed provider for offline runs and tests.
//!
//! Serves decoded feeds from memory, or from `{feed}.pb` files in a
//! directory as if they were live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::acquire::FeedProvider;
use super::decode::{FeedDecoder, GtfsRealtimeDecoder};
use super::error::FeedError;
use super::types::DecodedFeed;

#[derive(Debug, Clone)]
enum MockResponse {
    Feed(DecodedFeed),
    Status(u16),
}

/// Feed provider backed by a map of canned responses.
#[derive(Debug, Clone, Default)]
pub struct MockFeedProvider {
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
}

impl MockFeedProvider {
    /// Create an empty provider. Every feed is unknown until set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `{feed}.pb` GTFS-realtime payloads from a directory.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, FeedError> {
        let data_dir = data_dir.as_ref();
        let io_error = |message: String| FeedError::Api {
            feed: data_dir.display().to_string(),
            status: 0,
            message,
        };

        let entries = std::fs::read_dir(data_dir)
            .map_err(|e| io_error(format!("failed to read mock data directory: {e}")))?;

        let mut responses = HashMap::new();
        for entry in entries {
            let path = entry
                .map_err(|e| io_error(format!("failed to read directory entry: {e}")))?
                .path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("pb") {
                continue;
            }
            let Some(feed) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let bytes = std::fs::read(&path)
                .map_err(|e| io_error(format!("failed to read {}: {e}", path.display())))?;
            let decoded = GtfsRealtimeDecoder.decode(feed, &bytes)?;
            responses.insert(feed.to_string(), MockResponse::Feed(decoded));
        }

        if responses.is_empty() {
            return Err(io_error("no mock feed files found".to_string()));
        }

        Ok(Self {
            responses: Arc::new(RwLock::new(responses)),
        })
    }

    /// Serve `feed` for the given name.
    pub async fn set_feed(&self, name: &str, feed: DecodedFeed) {
        self.responses
            .write()
            .await
            .insert(name.to_string(), MockResponse::Feed(feed));
    }

    /// Answer the given name with an HTTP error status.
    pub async fn fail_feed(&self, name: &str, status: u16) {
        self.responses
            .write()
            .await
            .insert(name.to_string(), MockResponse::Status(status));
    }
}

impl FeedProvider for MockFeedProvider {
    async fn fetch_feed(&self, feed: &str) -> Result<DecodedFeed, FeedError> {
        let responses = self.responses.read().await;
        match responses.get(feed) {
            Some(MockResponse::Feed(decoded)) => Ok(decoded.clone()),
            Some(MockResponse::Status(status)) => Err(FeedError::Api {
                feed: feed.to_string(),
                status: *status,
                message: "mock failure".to_string(),
            }),
            None => Err(FeedError::UnknownFeed(feed.to_string())),
        }
    }
}
