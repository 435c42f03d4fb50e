//! Line code → feed name → URL catalog.

use tracing::warn;

/// Public MTA GTFS-realtime endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api-endpoint.mta.info/Dataservice/mtagtfsfeeds";

/// Feeds in catalog order: (feed name, URL path, lines carried).
const FEEDS: &[(&str, &str, &[&str])] = &[
    ("gtfs-1234567", "nyct%2Fgtfs", &["1", "2", "3", "4", "5", "6", "7"]),
    ("gtfs-ace", "nyct%2Fgtfs-ace", &["A", "C", "E"]),
    ("gtfs-nqrw", "nyct%2Fgtfs-nqrw", &["N", "Q", "R", "W"]),
    ("gtfs-jz", "nyct%2Fgtfs-jz", &["J", "Z"]),
];

/// Feed name carrying a line, if any.
pub fn feed_for_line(line: &str) -> Option<&'static str> {
    let line = line.trim();
    FEEDS
        .iter()
        .find(|(_, _, lines)| lines.iter().any(|l| *l == line))
        .map(|(name, _, _)| *name)
}

/// URL of a named feed under `base_url`.
pub fn feed_url(base_url: &str, feed: &str) -> Option<String> {
    FEEDS
        .iter()
        .find(|(name, _, _)| *name == feed)
        .map(|(_, path, _)| format!("{}/{}", base_url.trim_end_matches('/'), path))
}

/// Feeds needed to cover `lines`, deduplicated and in catalog order.
///
/// Unknown lines are skipped with a warning.
pub fn required_feeds<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut needed = Vec::new();
    for line in lines {
        match feed_for_line(line) {
            Some(feed) => needed.push(feed),
            None => warn!(line, "unknown line in config; skipping feed mapping"),
        }
    }

    FEEDS
        .iter()
        .map(|(name, _, _)| *name)
        .filter(|name| needed.contains(name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_lines_to_feeds() {
        assert_eq!(feed_for_line("4"), Some("gtfs-1234567"));
        assert_eq!(feed_for_line(" A "), Some("gtfs-ace"));
        assert_eq!(feed_for_line("W"), Some("gtfs-nqrw"));
        assert_eq!(feed_for_line("Z"), Some("gtfs-jz"));
        assert_eq!(feed_for_line("G"), None);
    }

    #[test]
    fn urls() {
        assert_eq!(
            feed_url(DEFAULT_BASE_URL, "gtfs-1234567").as_deref(),
            Some("https://api-endpoint.mta.info/Dataservice/mtagtfsfeeds/nyct%2Fgtfs")
        );
        assert_eq!(
            feed_url("http://localhost:8080/", "gtfs-jz").as_deref(),
            Some("http://localhost:8080/nyct%2Fgtfs-jz")
        );
        assert_eq!(feed_url(DEFAULT_BASE_URL, "gtfs-g"), None);
    }

    #[test]
    fn required_feeds_deduped_in_catalog_order() {
        let feeds = required_feeds(["J", "4", "5", "G", "A", "6"]);
        assert_eq!(feeds, vec!["gtfs-1234567", "gtfs-ace", "gtfs-jz"]);
    }

    #[test]
    fn required_feeds_empty() {
        assert!(required_feeds(Vec::<&str>::new()).is_empty());
        assert!(required_feeds(["G", "L"]).is_empty());
    }
}
