//! Resilience cache for board results.
//!
//! Two layers share one contract. [`LastGood`] holds the most recent
//! successful snapshot of one result for fallback within the fetch cycle.
//! [`SourceCache`] is the keyed store readers and health reporting use; it
//! additionally tracks fetch/error counters and timestamps per source.
//!
//! Writers replace a whole snapshot at once; readers always get their own
//! copy, so no caller can observe or cause a partial update.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use moka::future::Cache as MokaCache;
use tokio::sync::RwLock;

/// Bookkeeping and data for one logical source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheEntry<V> {
    pub data: V,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_error_at: Option<DateTime<Utc>>,
    pub fetch_count: u64,
    pub error_count: u64,
}

/// Metadata view of an entry, without the data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub last_updated: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_error_at: Option<DateTime<Utc>>,
    pub fetch_count: u64,
    pub error_count: u64,
}

impl<V> CacheEntry<V> {
    pub fn metadata(&self) -> EntryMetadata {
        EntryMetadata {
            last_updated: self.last_updated,
            last_error: self.last_error.clone(),
            last_error_at: self.last_error_at,
            fetch_count: self.fetch_count,
            error_count: self.error_count,
        }
    }
}

/// Thread-safe keyed store of source snapshots.
///
/// Entries are created lazily with empty defaults. Each key's
/// read-modify-write is serialised; critical sections only copy memory.
#[derive(Clone)]
pub struct SourceCache<V: Clone + Default + Send + Sync + 'static> {
    entries: MokaCache<String, Arc<CacheEntry<V>>>,
}

impl<V: Clone + Default + Send + Sync + 'static> SourceCache<V> {
    /// Create an empty, unbounded cache.
    pub fn new() -> Self {
        Self {
            entries: MokaCache::builder().build(),
        }
    }

    /// Replace a source's data, stamp it updated and clear its last error.
    pub async fn set(&self, key: &str, data: V, now: DateTime<Utc>) {
        self.entries
            .entry(key.to_string())
            .and_upsert_with(|existing| {
                let mut entry = existing
                    .map(|e| CacheEntry::clone(&e.into_value()))
                    .unwrap_or_default();
                entry.data = data;
                entry.last_updated = Some(now);
                entry.last_error = None;
                entry.last_error_at = None;
                entry.fetch_count += 1;
                std::future::ready(Arc::new(entry))
            })
            .await;
    }

    /// Record a failure without touching the stored data.
    pub async fn record_error(&self, key: &str, error: impl Into<String>, now: DateTime<Utc>) {
        let error = error.into();
        self.entries
            .entry(key.to_string())
            .and_upsert_with(|existing| {
                let mut entry = existing
                    .map(|e| CacheEntry::clone(&e.into_value()))
                    .unwrap_or_default();
                entry.last_error = Some(error);
                entry.last_error_at = Some(now);
                entry.error_count += 1;
                std::future::ready(Arc::new(entry))
            })
            .await;
    }

    /// An independent copy of a source's entry; empty defaults if never written.
    pub async fn get(&self, key: &str) -> CacheEntry<V> {
        self.entries
            .get(key)
            .await
            .map(|entry| CacheEntry::clone(&entry))
            .unwrap_or_default()
    }

    /// Metadata for every source written so far, sorted by key.
    pub fn all_metadata(&self) -> Vec<(String, EntryMetadata)> {
        let mut all: Vec<(String, EntryMetadata)> = self
            .entries
            .iter()
            .map(|(key, entry)| (String::clone(&key), entry.metadata()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }
}

impl<V: Clone + Default + Send + Sync + 'static> Default for SourceCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Most recent successful result, for fallback when a cycle fails.
#[derive(Debug)]
pub struct LastGood<T> {
    inner: RwLock<Option<(DateTime<Utc>, T)>>,
}

impl<T: Clone> LastGood<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Replace the snapshot.
    pub async fn store(&self, value: T, at: DateTime<Utc>) {
        *self.inner.write().await = Some((at, value));
    }

    /// A copy of the value, or the type's default if nothing was stored.
    pub async fn value_or_default(&self) -> T
    where
        T: Default,
    {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|(_, value)| value.clone())
            .unwrap_or_default()
    }
}

impl<T: Clone> Default for LastGood<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn missing_key_has_defaults() {
        let cache: SourceCache<Vec<u32>> = SourceCache::new();
        let entry = cache.get("subway").await;
        assert_eq!(entry, CacheEntry::default());
        assert!(cache.all_metadata().is_empty());
    }

    #[tokio::test]
    async fn set_replaces_and_counts() {
        let cache = SourceCache::new();
        cache.set("subway", vec![1, 2], now()).await;
        cache.set("subway", vec![3], now() + Duration::seconds(30)).await;

        let entry = cache.get("subway").await;
        assert_eq!(entry.data, vec![3]);
        assert_eq!(entry.fetch_count, 2);
        assert_eq!(entry.last_updated, Some(now() + Duration::seconds(30)));
    }

    #[tokio::test]
    async fn record_error_keeps_data() {
        let cache = SourceCache::new();
        cache.set("subway", vec![1], now()).await;
        cache
            .record_error("subway", "feed stale", now() + Duration::seconds(30))
            .await;

        let entry = cache.get("subway").await;
        assert_eq!(entry.data, vec![1]);
        assert_eq!(entry.last_updated, Some(now()));
        assert_eq!(entry.last_error.as_deref(), Some("feed stale"));
        assert_eq!(entry.last_error_at, Some(now() + Duration::seconds(30)));
        assert_eq!(entry.error_count, 1);
        assert_eq!(entry.fetch_count, 1);
    }

    #[tokio::test]
    async fn set_clears_error() {
        let cache = SourceCache::new();
        cache.record_error("inbound", "boom", now()).await;
        cache.set("inbound", vec![7], now() + Duration::seconds(1)).await;

        let entry = cache.get("inbound").await;
        assert_eq!(entry.last_error, None);
        assert_eq!(entry.last_error_at, None);
        assert_eq!(entry.error_count, 1);
    }

    #[tokio::test]
    async fn copies_are_isolated() {
        let cache = SourceCache::new();
        cache.set("subway", vec![1, 2, 3], now()).await;

        let mut copy = cache.get("subway").await;
        copy.data.push(99);
        copy.fetch_count = 1000;

        let fresh = cache.get("subway").await;
        assert_eq!(fresh.data, vec![1, 2, 3]);
        assert_eq!(fresh.fetch_count, 1);
    }

    #[tokio::test]
    async fn metadata_for_all_sources() {
        let cache = SourceCache::new();
        cache.set("subway", vec![1], now()).await;
        cache.record_error("inbound", "boom", now()).await;

        let all = cache.all_metadata();
        let keys: Vec<&str> = all.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["inbound", "subway"]);
        assert_eq!(all[0].1.error_count, 1);
        assert_eq!(all[1].1.fetch_count, 1);
    }

    #[tokio::test]
    async fn concurrent_writers_count_every_write() {
        let cache: SourceCache<Vec<u32>> = SourceCache::new();
        let mut handles = Vec::new();
        for i in 0..16 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    cache.set("subway", vec![i], now()).await;
                } else {
                    cache.record_error("subway", "boom", now()).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let entry = cache.get("subway").await;
        assert_eq!(entry.fetch_count, 8);
        assert_eq!(entry.error_count, 8);
    }

    #[tokio::test]
    async fn last_good_snapshot() {
        let last_good: LastGood<Vec<u32>> = LastGood::new();
        assert!(last_good.value_or_default().await.is_empty());

        last_good.store(vec![4, 5], now()).await;
        let mut value = last_good.value_or_default().await;
        value.clear();

        assert_eq!(last_good.value_or_default().await, vec![4, 5]);
    }
}
