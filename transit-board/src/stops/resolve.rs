//! Station name → stop id resolution.
//!
//! Riders configure stations by name; the feed speaks platform stop ids.
//! Resolution is deterministic: the same name and direction always map to
//! the same platform for a given table.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::{Direction, StopId};

use super::error::StopError;
use super::names::{names_match, normalize_station_name};
use super::table::{StopRecord, StopTable};

/// Parent stations to prefer when a name matches several complexes.
///
/// Keys are normalized names.
const PREFERRED_PARENT_STATIONS: &[(&str, &[&str])] = &[
    ("59 st", &["629"]),
    ("grand central 42 st", &["631"]),
    ("14 st union sq", &["635"]),
    ("brooklyn bridge", &["640"]),
    ("brooklyn bridge city hall", &["640"]),
    ("wall st", &["419"]),
    ("fulton st", &["418"]),
];

/// Minimum similarity for a fuzzy name match.
const FUZZY_CUTOFF: f64 = 0.6;

/// Maximum number of distinct names considered by a fuzzy match.
const FUZZY_MAX_NAMES: usize = 5;

const EARTH_RADIUS_MILES: f64 = 3958.8;

const METERS_PER_MILE: f64 = 1609.34;

/// Average walking pace, meters per second.
const WALKING_SPEED_MPS: f64 = 1.4;

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance in miles.
    pub fn distance_miles(&self, other: &GeoPoint) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let delta_phi = (other.lat - self.lat).to_radians();
        let delta_lambda = (other.lon - self.lon).to_radians();

        let a = (delta_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_MILES * c
    }
}

/// Walking time for a straight-line distance, rounded, at least a minute
/// for any positive distance. `None` for a non-finite distance.
pub fn walk_minutes(distance_miles: f64) -> Option<u32> {
    if !distance_miles.is_finite() {
        return None;
    }
    if distance_miles <= 0.0 {
        return Some(0);
    }
    let minutes_per_mile = METERS_PER_MILE / (WALKING_SPEED_MPS * 60.0);
    Some(((distance_miles * minutes_per_mile).round() as u32).max(1))
}

impl StopRecord {
    /// Location of this stop.
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

impl StopTable {
    /// Resolve a station name to its platform stop id for `direction`.
    ///
    /// Candidates are non-parent rows whose id carries the direction suffix
    /// and whose name matches. When several match, the preferred-parent
    /// override wins; otherwise the smallest stop id is chosen.
    pub fn resolve(&self, name: &str, direction: Direction) -> Result<StopId, StopError> {
        if !matches!(direction, Direction::North | Direction::South) {
            return Err(StopError::UnsupportedDirection(direction));
        }

        let mut matches: Vec<&StopRecord> = self
            .iter()
            .filter(|stop| !stop.is_parent())
            .filter(|stop| stop.stop_id.has_suffix(direction))
            .filter(|stop| names_match(&stop.name, name))
            .collect();

        if matches.is_empty() {
            return Err(StopError::NotFound {
                name: name.to_string(),
                direction,
            });
        }

        if let Some(preferred) = preferred_parents(&normalize_station_name(name)) {
            let narrowed: Vec<&StopRecord> = matches
                .iter()
                .copied()
                .filter(|stop| {
                    stop.parent_station
                        .as_deref()
                        .is_some_and(|p| preferred.iter().any(|want| *want == p))
                })
                .collect();
            if !narrowed.is_empty() {
                matches = narrowed;
            }
        }

        matches
            .into_iter()
            .map(|stop| &stop.stop_id)
            .min()
            .cloned()
            .ok_or_else(|| StopError::NotFound {
                name: name.to_string(),
                direction,
            })
    }

    /// Fuzzy search for a free-text station name.
    ///
    /// Exact normalized matches win outright. Otherwise each distinct name
    /// is scored by similarity; the best few above the cutoff are kept and
    /// the highest-scoring stops returned. Results are ordered by distance
    /// from `near` when given, then by stop id.
    pub fn search(&self, query: &str, near: Option<GeoPoint>) -> Vec<&StopRecord> {
        let query = normalize_station_name(query);
        if query.is_empty() {
            return Vec::new();
        }

        let mut by_name: BTreeMap<String, Vec<&StopRecord>> = BTreeMap::new();
        for stop in self.iter() {
            by_name
                .entry(normalize_station_name(&stop.name))
                .or_default()
                .push(stop);
        }

        if let Some(exact) = by_name.remove(&query) {
            return order_by_distance(exact, near);
        }

        let mut scored: Vec<(f64, &str)> = by_name
            .keys()
            .map(|name| (strsim::normalized_levenshtein(&query, name), name.as_str()))
            .filter(|(score, _)| *score >= FUZZY_CUTOFF)
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(FUZZY_MAX_NAMES);

        let Some(best) = scored.first().map(|(score, _)| *score) else {
            return Vec::new();
        };

        let top: Vec<&StopRecord> = scored
            .iter()
            .filter(|(score, _)| (best - score).abs() < f64::EPSILON)
            .flat_map(|(_, name)| by_name.get(*name).into_iter().flatten().copied())
            .collect();

        order_by_distance(top, near)
    }
}

fn preferred_parents(normalized_name: &str) -> Option<&'static [&'static str]> {
    PREFERRED_PARENT_STATIONS
        .iter()
        .find(|(name, _)| *name == normalized_name)
        .map(|(_, parents)| *parents)
}

fn order_by_distance(mut stops: Vec<&StopRecord>, near: Option<GeoPoint>) -> Vec<&StopRecord> {
    stops.sort_by(|a, b| {
        let by_distance = match near {
            Some(point) => point
                .distance_miles(&a.location())
                .partial_cmp(&point.distance_miles(&b.location()))
                .unwrap_or(Ordering::Equal),
            None => Ordering::Equal,
        };
        by_distance.then_with(|| a.stop_id.cmp(&b.stop_id))
    });
    stops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stops::table::fixtures::{lexington_table, record};

    #[test]
    fn resolves_platform_for_direction() {
        let table = lexington_table();
        assert_eq!(
            table.resolve("Astor Pl", Direction::South).unwrap().as_str(),
            "636S"
        );
        assert_eq!(
            table.resolve("Astor Pl", Direction::North).unwrap().as_str(),
            "636N"
        );
    }

    #[test]
    fn never_returns_parent_rows() {
        let table = lexington_table();
        let id = table.resolve("Canal St", Direction::South).unwrap();
        assert!(!table.get(id.as_str()).unwrap().is_parent());
    }

    #[test]
    fn preferred_parent_breaks_ties() {
        // Wall St exists under parents 230 and 419; 230S sorts first, but
        // the override pins the Lexington platform.
        let table = lexington_table();
        assert_eq!(
            table.resolve("Wall St", Direction::South).unwrap().as_str(),
            "419S"
        );
    }

    #[test]
    fn smallest_id_without_override() {
        let table = StopTable::from_records(vec![
            record("B20S", "Union Tpke", "B20", 0.0, 0.0),
            record("A10S", "Union Tpke", "A10", 0.0, 0.0),
        ]);
        assert_eq!(
            table.resolve("Union Tpke", Direction::South).unwrap().as_str(),
            "A10S"
        );
    }

    #[test]
    fn normalized_name_variants_resolve() {
        let table = lexington_table();
        assert_eq!(
            table
                .resolve("14th Street - Union Square", Direction::South)
                .unwrap()
                .as_str(),
            "635S"
        );
        assert_eq!(
            table.resolve("Brooklyn Bridge", Direction::South).unwrap().as_str(),
            "640S"
        );
    }

    #[test]
    fn resolution_is_idempotent() {
        let table = lexington_table();
        let first = table.resolve("Grand Central", Direction::South).unwrap();
        let second = table.resolve("Grand Central", Direction::South).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_str(), "631S");
    }

    #[test]
    fn unknown_name_is_not_found() {
        let table = lexington_table();
        let err = table.resolve("Atlantis", Direction::North).unwrap_err();
        assert!(matches!(err, StopError::NotFound { .. }));
    }

    #[test]
    fn east_west_unsupported() {
        let table = lexington_table();
        let err = table.resolve("Wall St", Direction::East).unwrap_err();
        assert!(matches!(err, StopError::UnsupportedDirection(Direction::East)));
    }

    #[test]
    fn haversine_distance() {
        let wall = GeoPoint::new(40.707557, -74.011862);
        let fulton = GeoPoint::new(40.710368, -74.009509);
        let d = wall.distance_miles(&fulton);
        assert!(d > 0.2 && d < 0.3, "unexpected distance {d}");
        assert_eq!(wall.distance_miles(&wall), 0.0);
    }

    #[test]
    fn walk_minutes_from_distance() {
        assert_eq!(walk_minutes(1.0), Some(19));
        assert_eq!(walk_minutes(0.01), Some(1));
        assert_eq!(walk_minutes(0.0), Some(0));
        assert_eq!(walk_minutes(f64::NAN), None);
    }

    #[test]
    fn search_exact_orders_by_distance() {
        let table = lexington_table();
        // Closer to the 2/3 Wall St (230) than to the 4/5 one (419).
        let near = GeoPoint::new(40.706821, -74.0091);
        let results = table.search("wall street", Some(near));
        assert_eq!(results.len(), 6);
        assert!(results[0].stop_id.as_str().starts_with("230"));
        assert!(results[5].stop_id.as_str().starts_with("419"));
    }

    #[test]
    fn search_fuzzy_picks_best_name() {
        let table = lexington_table();
        let results = table.search("Bleeker St", None);
        assert!(!results.is_empty());
        assert!(results.iter().all(|s| s.name == "Bleecker St"));
        assert_eq!(results[0].stop_id.as_str(), "637");
    }

    #[test]
    fn search_below_cutoff_is_empty() {
        let table = lexington_table();
        assert!(table.search("Coney Island", None).is_empty());
        assert!(table.search("", None).is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::stops::table::fixtures::lexington_table;
    use proptest::prelude::*;

    proptest! {
        /// Resolution never depends on call order or repetition
        #[test]
        fn deterministic(idx in 0usize..14, north in any::<bool>()) {
            let table = lexington_table();
            let names = [
                "59 St", "Grand Central-42 St", "33 St", "28 St", "23 St",
                "14 St-Union Sq", "Astor Pl", "Bleecker St", "Spring St",
                "Canal St", "Brooklyn Bridge-City Hall", "Fulton St", "Wall St", "Wall St",
            ];
            let direction = if north { Direction::North } else { Direction::South };
            let a = table.resolve(names[idx], direction).ok();
            let b = table.resolve(names[idx], direction).ok();
            prop_assert!(a.is_some());
            prop_assert_eq!(a, b);
        }
    }
}
