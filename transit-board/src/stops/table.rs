//! Static stop table loaded from GTFS `stops.txt`.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::domain::StopId;

use super::error::StopError;

/// GTFS `location_type` for a parent station row.
const PARENT_LOCATION_TYPE: &str = "1";

/// Raw CSV row. Every column is optional so partial exports still load.
#[derive(Debug, Deserialize)]
struct StopRow {
    #[serde(default)]
    stop_id: String,
    #[serde(default)]
    stop_name: String,
    #[serde(default)]
    stop_lat: String,
    #[serde(default)]
    stop_lon: String,
    #[serde(default)]
    location_type: String,
    #[serde(default)]
    parent_station: String,
}

/// A single stop or station from the static table.
#[derive(Debug, Clone, PartialEq)]
pub struct StopRecord {
    pub stop_id: StopId,
    pub name: String,
    /// GTFS location type; empty for ordinary platforms.
    pub location_type: String,
    /// Parent station id, if the row has one.
    pub parent_station: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl StopRecord {
    /// Whether this row is a parent station rather than a platform.
    pub fn is_parent(&self) -> bool {
        self.location_type == PARENT_LOCATION_TYPE
    }
}

/// Immutable stop lookup, keyed by stop id.
///
/// Loaded once at startup and shared read-only for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct StopTable {
    stops: HashMap<StopId, StopRecord>,
}

impl StopTable {
    /// Load a stop table from a GTFS `stops.txt` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StopError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| StopError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Parse a stop table from CSV with a header row.
    ///
    /// Rows without a usable stop id are skipped; unparsable coordinates
    /// default to 0.0.
    pub fn from_reader(reader: impl Read) -> Result<Self, StopError> {
        let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut records = Vec::new();

        for row in csv.deserialize::<StopRow>() {
            let row = row?;
            let Ok(stop_id) = StopId::parse(&row.stop_id) else {
                continue;
            };
            records.push(StopRecord {
                stop_id,
                name: row.stop_name,
                location_type: row.location_type,
                parent_station: Some(row.parent_station).filter(|p| !p.is_empty()),
                lat: row.stop_lat.parse().unwrap_or(0.0),
                lon: row.stop_lon.parse().unwrap_or(0.0),
            });
        }

        Ok(Self::from_records(records))
    }

    /// Build a table from already-parsed records. Later duplicates win.
    pub fn from_records(records: impl IntoIterator<Item = StopRecord>) -> Self {
        let stops = records
            .into_iter()
            .map(|record| (record.stop_id.clone(), record))
            .collect();
        Self { stops }
    }

    /// Look up a stop by id.
    pub fn get(&self, stop_id: &str) -> Option<&StopRecord> {
        self.stops.get(stop_id)
    }

    /// Whether the stop id exists in the table.
    pub fn contains(&self, stop_id: &str) -> bool {
        self.stops.contains_key(stop_id)
    }

    /// Display name for a stop id.
    pub fn name_of(&self, stop_id: &str) -> Option<&str> {
        self.get(stop_id).map(|s| s.name.as_str())
    }

    /// Parent station id for a stop id.
    pub fn parent_of(&self, stop_id: &str) -> Option<&str> {
        self.get(stop_id).and_then(|s| s.parent_station.as_deref())
    }

    /// Iterate over all records in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &StopRecord> {
        self.stops.values()
    }

    /// Number of stops in the table.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}
