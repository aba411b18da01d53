use serde_json::Value;

use super::error::ChannelError;
use super::types::{Point, PointOrigin};

pub const MAX_RESULTS: i64 = 100;
pub const DEFAULT_RESULTS: i64 = 10;

/// Clamp a requested history size into [1, 100]; absent means 10.
pub fn clamp_results(requested: Option<i64>) -> usize {
    requested.unwrap_or(DEFAULT_RESULTS).clamp(1, MAX_RESULTS) as usize
}

/// Upstream records carry coordinates as either JSON numbers or numeric
/// strings. Returns None for anything that does not coerce to a finite float.
fn coordinate(record: &Value, field: &str) -> Option<f64> {
    let value = match record.get(field)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

fn in_range(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

fn created_at(record: &Value) -> Option<String> {
    record
        .get("created_at")
        .and_then(Value::as_str)
        .map(String::from)
}

/// Parse the single most recent record. Fails with a validation error when
/// either configured field is missing, non-numeric, non-finite, or outside
/// geographic range.
pub fn parse_latest(
    record: &Value,
    lat_field: &str,
    lng_field: &str,
) -> Result<Point, ChannelError> {
    let lat = coordinate(record, lat_field);
    let lng = coordinate(record, lng_field);

    let (Some(lat), Some(lng)) = (lat, lng) else {
        return Err(ChannelError::Validation(format!(
            "non-numeric lat/lng: {}={:?} {}={:?}",
            lat_field,
            record.get(lat_field),
            lng_field,
            record.get(lng_field),
        )));
    };

    if !in_range(lat, lng) {
        return Err(ChannelError::Validation(format!(
            "out-of-range lat/lng: lat={} lng={}",
            lat, lng
        )));
    }

    Ok(Point {
        source: PointOrigin::Live,
        created_at: created_at(record),
        lat,
        lng,
    })
}

/// Map an oldest-first feed array to newest-first Points, silently dropping
/// records whose coordinates do not validate. The reversal is part of the
/// contract, not an upstream default.
pub fn parse_history(feeds: &[Value], lat_field: &str, lng_field: &str) -> Vec<Point> {
    let mut points: Vec<Point> = feeds
        .iter()
        .filter_map(|record| {
            let lat = coordinate(record, lat_field)?;
            let lng = coordinate(record, lng_field)?;
            in_range(lat, lng).then(|| Point {
                source: PointOrigin::Live,
                created_at: created_at(record),
                lat,
                lng,
            })
        })
        .collect();
    points.reverse();
    points
}
