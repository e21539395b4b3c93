//! Decoding of air-quality feed payloads into reading records.
//!
//! A payload is either a bare JSON array or a paginated object carrying the
//! array under `results`. Each element may use one of three shapes:
//! - `{ "latitude", "longitude", ... }` (sensor or sample points)
//! - `{ "grid_cell": { "geometry": { "coordinates": [[[lon, lat], ...]] } }, ... }`
//! - `{ "location": { "coordinates": [lon, lat] }, ... }`
//!
//! Coordinates are never invented: an element without a usable position keeps
//! `None` and is dropped by the layer.

use scene::{Metadata, ReadingRecord};
use serde_json::Value;
use tracing::{debug, warn};

/// Which measurement a feed is read for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Metric {
    Aqi,
    Pm25,
}

impl Metric {
    /// Value keys in lookup order.
    pub fn value_keys(self) -> &'static [&'static str] {
        match self {
            Metric::Aqi => &["aqi", "value"],
            Metric::Pm25 => &["pm25_value", "pm25", "value"],
        }
    }
}

const POSITION_KEYS: [&str; 4] = ["latitude", "longitude", "grid_cell", "location"];

#[derive(Debug)]
pub enum FeedError {
    Json(serde_json::Error),
    NotAList,
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Json(e) => write!(f, "feed is not valid JSON: {e}"),
            FeedError::NotAList => {
                write!(f, "expected a JSON array or an object with a `results` array")
            }
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Json(e) => Some(e),
            FeedError::NotAList => None,
        }
    }
}

pub fn parse_feed_str(payload: &str, metric: Metric) -> Result<Vec<ReadingRecord>, FeedError> {
    let value: Value = serde_json::from_str(payload).map_err(FeedError::Json)?;
    parse_feed_value(&value, metric)
}

pub fn parse_feed_value(value: &Value, metric: Metric) -> Result<Vec<ReadingRecord>, FeedError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(obj) => obj
            .get("results")
            .and_then(|v| v.as_array())
            .ok_or(FeedError::NotAList)?,
        _ => return Err(FeedError::NotAList),
    };

    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if !item.is_object() {
            warn!(index, "feed entry is not an object");
        }
        out.push(record_from_value(item, metric));
    }
    debug!(records = out.len(), ?metric, "decoded feed");
    Ok(out)
}

/// Normalize one feed element. Non-objects yield an empty record.
pub fn record_from_value(item: &Value, metric: Metric) -> ReadingRecord {
    let Some(obj) = item.as_object() else {
        return ReadingRecord::default();
    };

    let (latitude, longitude) = grid_cell_position(item)
        .or_else(|| {
            let lat = obj.get("latitude").and_then(number);
            let lon = obj.get("longitude").and_then(number);
            (lat.is_some() || lon.is_some()).then_some((lat, lon))
        })
        .or_else(|| location_position(item))
        .unwrap_or((None, None));

    // First key holding a number; a non-numeric entry falls through to the next key.
    let (value_key, value) = metric
        .value_keys()
        .iter()
        .find_map(|k| obj.get(*k).and_then(number).map(|v| (Some(*k), Some(v))))
        .unwrap_or((None, None));

    let mut metadata = Metadata::new();
    for (k, v) in obj {
        if POSITION_KEYS.contains(&k.as_str()) || Some(k.as_str()) == value_key {
            continue;
        }
        if v.is_object() || v.is_array() {
            continue;
        }
        metadata.insert(k.clone(), v.clone());
    }

    ReadingRecord::new(latitude, longitude, value).with_metadata(metadata)
}

// First vertex of the outer ring.
fn grid_cell_position(item: &Value) -> Option<(Option<f64>, Option<f64>)> {
    let vertex = item
        .pointer("/grid_cell/geometry/coordinates/0/0")?
        .as_array()?;
    let lon = vertex.first().and_then(number);
    let lat = vertex.get(1).and_then(number);
    Some((lat, lon))
}

fn location_position(item: &Value) -> Option<(Option<f64>, Option<f64>)> {
    let coords = item.pointer("/location/coordinates")?.as_array()?;
    let lon = coords.first().and_then(number);
    let lat = coords.get(1).and_then(number);
    Some((lat, lon))
}

// Numbers, or strings holding one (decimal fields often arrive as strings).
fn number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}
