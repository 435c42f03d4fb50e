//! Per-source freshness and overall service health.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::EntryMetadata;
use crate::config::DisplayConfig;

/// Health of one cached source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    Healthy,
    Stale,
    Error,
}

/// Health of the service as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Degraded,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceHealth {
    /// "never" or "<n>s ago".
    pub last_update: String,
    pub status: SourceStatus,
    pub fetch_count: u64,
    pub error_count: u64,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: OverallStatus,
    pub uptime_seconds: i64,
    #[serde(flatten)]
    pub sources: BTreeMap<String, SourceHealth>,
}

/// Classify one source.
///
/// A source whose latest event is an error, or that never updated, is in
/// error; so is one older than the critical threshold. Older than the
/// warning threshold is stale.
pub fn source_status(
    metadata: &EntryMetadata,
    now: DateTime<Utc>,
    display: &DisplayConfig,
) -> SourceStatus {
    let Some(last_updated) = metadata.last_updated else {
        return SourceStatus::Error;
    };
    if metadata
        .last_error_at
        .is_some_and(|error_at| error_at >= last_updated)
    {
        return SourceStatus::Error;
    }

    let age = (now - last_updated).num_seconds();
    if age >= display.staleness_critical_sec as i64 {
        SourceStatus::Error
    } else if age >= display.staleness_warning_sec as i64 {
        SourceStatus::Stale
    } else {
        SourceStatus::Healthy
    }
}

/// "never" or "<n>s ago", clamped at zero.
pub fn format_age(last_updated: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match last_updated {
        Some(at) => format!("{}s ago", (now - at).num_seconds().max(0)),
        None => "never".to_string(),
    }
}

/// Build the health report for the named sources.
///
/// Sources absent from `metadata` report as never updated.
pub fn health_report(
    sources: &[&str],
    metadata: &[(String, EntryMetadata)],
    display: &DisplayConfig,
    started_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> HealthReport {
    let empty = EntryMetadata::default();

    let sources: BTreeMap<String, SourceHealth> = sources
        .iter()
        .map(|name| {
            let meta = metadata
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, meta)| meta)
                .unwrap_or(&empty);
            let health = SourceHealth {
                last_update: format_age(meta.last_updated, now),
                status: source_status(meta, now, display),
                fetch_count: meta.fetch_count,
                error_count: meta.error_count,
                last_error: meta.last_error.clone(),
            };
            (name.to_string(), health)
        })
        .collect();

    let status = if sources.values().any(|s| s.status == SourceStatus::Error) {
        OverallStatus::Down
    } else if sources.values().any(|s| s.status == SourceStatus::Stale) {
        OverallStatus::Degraded
    } else {
        OverallStatus::Healthy
    };

    HealthReport {
        status,
        uptime_seconds: (now - started_at).num_seconds().max(0),
        sources,
    }
}
