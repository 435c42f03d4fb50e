//! Station block configuration and its expansion into monitored directions.
//!
//! Two authoring shapes are accepted per station:
//!
//! ```json
//! { "name": "Wall St", "lines": ["4", "5"], "stop_id": "419N", "direction": "N" }
//! { "name": "Wall St", "lines": ["4", "5"],
//!   "directions": [{ "code": "N", "stop_id": "419N", "label": "Uptown" }] }
//! ```

use serde::Deserialize;

use crate::domain::{StopId, direction_label};
use crate::stops::GeoPoint;

use super::error::ConfigError;

/// A station as authored in configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StationEntry {
    /// Explicit block id; derived from name and lines when absent.
    pub id: Option<String>,
    pub name: Option<String>,
    pub lines: Vec<String>,
    /// Legacy single-direction shape.
    pub stop_id: Option<String>,
    /// Legacy single-direction shape.
    pub direction: Option<String>,
    pub directions: Vec<DirectionEntry>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// One monitored direction of a station as authored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DirectionEntry {
    pub code: Option<String>,
    pub stop_id: Option<String>,
    pub label: Option<String>,
    pub destination: Option<String>,
}

/// A validated direction of a station block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionSpec {
    pub code: String,
    pub label: String,
    pub destination: Option<String>,
    pub stop_id: StopId,
}

/// A validated station block.
#[derive(Debug, Clone, PartialEq)]
pub struct StationBlock {
    pub id: String,
    pub name: String,
    pub lines: Vec<String>,
    pub directions: Vec<DirectionSpec>,
    /// Street entrance, when both coordinates are configured.
    pub location: Option<GeoPoint>,
}

/// One monitored platform direction, flattened for the arrival selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationDirection {
    pub station_block_id: String,
    pub station_name: String,
    pub lines: Vec<String>,
    pub direction_code: String,
    pub direction_label: String,
    pub direction_destination: Option<String>,
    pub stop_id: StopId,
}

/// Validate station entries into blocks.
pub fn resolve_station_blocks(entries: &[StationEntry]) -> Result<Vec<StationBlock>, ConfigError> {
    entries.iter().map(resolve_station_block).collect()
}

/// Flatten blocks into one record per monitored direction, in config order.
pub fn expand_station_directions(blocks: &[StationBlock]) -> Vec<StationDirection> {
    blocks
        .iter()
        .flat_map(|block| {
            block.directions.iter().map(|direction| StationDirection {
                station_block_id: block.id.clone(),
                station_name: block.name.clone(),
                lines: block.lines.clone(),
                direction_code: direction.code.clone(),
                direction_label: direction.label.clone(),
                direction_destination: direction.destination.clone(),
                stop_id: direction.stop_id.clone(),
            })
        })
        .collect()
}

fn resolve_station_block(entry: &StationEntry) -> Result<StationBlock, ConfigError> {
    let name = non_empty(entry.name.as_deref()).ok_or(ConfigError::StationMissingName)?;

    let lines: Vec<String> = entry
        .lines
        .iter()
        .filter_map(|line| non_empty(Some(line)))
        .map(str::to_string)
        .collect();
    if lines.is_empty() {
        return Err(ConfigError::StationMissingLines(name.to_string()));
    }

    let directions = if !entry.directions.is_empty() {
        entry
            .directions
            .iter()
            .map(|d| resolve_direction(name, &lines, d))
            .collect::<Result<Vec<_>, _>>()?
    } else if let (Some(stop_id), Some(code)) = (
        non_empty(entry.stop_id.as_deref()),
        non_empty(entry.direction.as_deref()),
    ) {
        vec![DirectionSpec {
            code: code.to_ascii_uppercase(),
            label: direction_label(&lines, code).to_string(),
            destination: None,
            stop_id: parse_stop_id(name, stop_id)?,
        }]
    } else {
        return Err(ConfigError::StationMissingDirections(name.to_string()));
    };

    Ok(StationBlock {
        id: station_block_id(name, &lines, entry.id.as_deref()),
        name: name.to_string(),
        lines,
        directions,
        location: entry.lat.zip(entry.lng).map(|(lat, lng)| GeoPoint::new(lat, lng)),
    })
}

fn resolve_direction(
    station: &str,
    lines: &[String],
    entry: &DirectionEntry,
) -> Result<DirectionSpec, ConfigError> {
    let code = non_empty(entry.code.as_deref())
        .ok_or_else(|| ConfigError::DirectionMissingCode(station.to_string()))?;
    let stop_id = non_empty(entry.stop_id.as_deref()).ok_or_else(|| {
        ConfigError::DirectionMissingStopId {
            station: station.to_string(),
            code: code.to_string(),
        }
    })?;

    let label = match non_empty(entry.label.as_deref()) {
        Some(label) => label.to_string(),
        None => direction_label(lines, code).to_string(),
    };

    Ok(DirectionSpec {
        code: code.to_ascii_uppercase(),
        label,
        destination: non_empty(entry.destination.as_deref()).map(str::to_string),
        stop_id: parse_stop_id(station, stop_id)?,
    })
}

fn parse_stop_id(station: &str, raw: &str) -> Result<StopId, ConfigError> {
    StopId::parse(raw).map_err(|source| ConfigError::InvalidStopId {
        station: station.to_string(),
        source,
    })
}

/// Stable id for a station block.
///
/// An explicit id wins; otherwise the slugified name joined with the sorted
/// slugified line codes, so the same logical station always gets the same id.
///
/// # Examples
///
/// ```
/// use transit_board::config::station_block_id;
///
/// let lines = vec!["5".to_string(), "4".to_string()];
/// assert_eq!(station_block_id("Wall St", &lines, None), "wall_st_4_5");
/// assert_eq!(station_block_id("Wall St", &lines, Some(" home ")), "home");
/// ```
pub fn station_block_id(name: &str, lines: &[String], provided: Option<&str>) -> String {
    if let Some(id) = non_empty(provided) {
        return id.to_string();
    }

    let mut line_slugs: Vec<String> = lines
        .iter()
        .filter(|line| !line.is_empty())
        .map(|line| slugify(line))
        .collect();
    line_slugs.sort();

    format!("{}_{}", slugify(name), line_slugs.join("_"))
        .trim_matches('_')
        .to_string()
}

/// Lowercase, collapse non-alphanumeric runs to `_`, trim underscores.
fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_sep = false;

    for c in value.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }

    if slug.is_empty() {
        "station".to_string()
    } else {
        slug
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(json: &str) -> StationEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn legacy_shape_expands_to_one_direction() {
        let blocks = resolve_station_blocks(&[entry(
            r#"{"name": "Wall St", "lines": ["4", "5"], "stop_id": "419N", "direction": "n"}"#,
        )])
        .unwrap();

        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.id, "wall_st_4_5");
        assert_eq!(block.directions.len(), 1);
        assert_eq!(block.directions[0].code, "N");
        assert_eq!(block.directions[0].label, "Uptown");
        assert_eq!(block.directions[0].stop_id.as_str(), "419N");
        assert_eq!(block.directions[0].destination, None);
        assert_eq!(block.location, None);
    }

    #[test]
    fn station_coordinates() {
        let blocks = resolve_station_blocks(&[entry(
            r#"{"name": "Wall St", "lines": ["4"], "stop_id": "419N", "direction": "N",
                "lat": 40.7074, "lng": -74.0113}"#,
        )])
        .unwrap();
        assert_eq!(blocks[0].location, Some(GeoPoint::new(40.7074, -74.0113)));
    }

    #[test]
    fn directions_list_shape() {
        let blocks = resolve_station_blocks(&[entry(
            r#"{
                "name": "Broad St", "lines": ["J", "Z"],
                "directions": [
                    {"code": "S", "stop_id": "M23S"},
                    {"code": "N", "stop_id": "M23N", "label": "To Queens", "destination": "Jamaica Center"}
                ]
            }"#,
        )])
        .unwrap();

        let dirs = &blocks[0].directions;
        assert_eq!(dirs.len(), 2);
        assert_eq!(dirs[0].label, "Southbound");
        assert_eq!(dirs[1].label, "To Queens");
        assert_eq!(dirs[1].destination.as_deref(), Some("Jamaica Center"));
    }

    #[test]
    fn directions_list_wins_over_legacy_fields() {
        let blocks = resolve_station_blocks(&[entry(
            r#"{"name": "Rector St", "lines": ["1"], "stop_id": "139N", "direction": "N",
                "directions": [{"code": "S", "stop_id": "139S"}]}"#,
        )])
        .unwrap();
        assert_eq!(blocks[0].directions.len(), 1);
        assert_eq!(blocks[0].directions[0].stop_id.as_str(), "139S");
    }

    #[test]
    fn missing_name_is_error() {
        let err = resolve_station_blocks(&[entry(r#"{"lines": ["4"], "stop_id": "419N", "direction": "N"}"#)])
            .unwrap_err();
        assert!(matches!(err, ConfigError::StationMissingName));

        let err = resolve_station_blocks(&[entry(r#"{"name": "  ", "lines": ["4"]}"#)]).unwrap_err();
        assert!(matches!(err, ConfigError::StationMissingName));
    }

    #[test]
    fn missing_lines_is_error() {
        let err = resolve_station_blocks(&[entry(
            r#"{"name": "Wall St", "lines": [" "], "stop_id": "419N", "direction": "N"}"#,
        )])
        .unwrap_err();
        assert!(matches!(err, ConfigError::StationMissingLines(_)));
    }

    #[test]
    fn missing_directions_is_error() {
        let err = resolve_station_blocks(&[entry(r#"{"name": "Wall St", "lines": ["4"], "stop_id": "419N"}"#)])
            .unwrap_err();
        assert!(matches!(err, ConfigError::StationMissingDirections(_)));
    }

    #[test]
    fn direction_missing_fields_are_errors() {
        let err = resolve_station_blocks(&[entry(
            r#"{"name": "Wall St", "lines": ["4"], "directions": [{"stop_id": "419N"}]}"#,
        )])
        .unwrap_err();
        assert!(matches!(err, ConfigError::DirectionMissingCode(_)));

        let err = resolve_station_blocks(&[entry(
            r#"{"name": "Wall St", "lines": ["4"], "directions": [{"code": "N"}]}"#,
        )])
        .unwrap_err();
        assert!(matches!(err, ConfigError::DirectionMissingStopId { .. }));
    }

    #[test]
    fn malformed_stop_id_is_error() {
        let err = resolve_station_blocks(&[entry(
            r#"{"name": "Wall St", "lines": ["4"], "stop_id": "41 9N", "direction": "N"}"#,
        )])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStopId { .. }));
    }

    #[test]
    fn block_id_is_order_independent() {
        let a = station_block_id("Fulton St", &["C".to_string(), "A".to_string()], None);
        let b = station_block_id("Fulton St", &["A".to_string(), "C".to_string()], None);
        assert_eq!(a, b);
        assert_eq!(a, "fulton_st_a_c");
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("14 St-Union Sq"), "14_st_union_sq");
        assert_eq!(slugify("  --Wall  St--  "), "wall_st");
        assert_eq!(slugify("!!!"), "station");
    }

    #[test]
    fn expand_preserves_order() {
        let blocks = resolve_station_blocks(&[
            entry(r#"{"name": "Wall St", "lines": ["4", "5"], "directions": [
                {"code": "N", "stop_id": "419N"}, {"code": "S", "stop_id": "419S"}]}"#),
            entry(r#"{"name": "Rector St", "lines": ["1"], "stop_id": "139N", "direction": "N"}"#),
        ])
        .unwrap();

        let expanded = expand_station_directions(&blocks);
        let ids: Vec<&str> = expanded.iter().map(|d| d.stop_id.as_str()).collect();
        assert_eq!(ids, vec!["419N", "419S", "139N"]);
        assert_eq!(expanded[2].station_block_id, "rector_st_1");
        assert_eq!(expanded[0].direction_label, "Uptown");
        assert_eq!(expanded[1].direction_label, "Downtown");
    }
}
