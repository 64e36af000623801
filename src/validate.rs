//! validate.rs — turn user-typed coordinate text into a `GeoPoint`.
//!
//! Checks run in a fixed order and the first failure is reported, so the
//! same input always produces the same message.

use crate::{error::CoordinateError, point::GeoPoint};

fn is_coordinate_text(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-')
}

/// Validate a latitude/longitude pair as typed by the user.
///
/// Both ends of each interval are excluded: `90` and `-180` are rejected.
pub fn parse_coordinates(lat: &str, lng: &str) -> Result<GeoPoint, CoordinateError> {
    let (lat, lng) = (lat.trim(), lng.trim());

    if lat.is_empty() {
        return Err(CoordinateError::EmptyLatitude);
    }
    if lng.is_empty() {
        return Err(CoordinateError::EmptyLongitude);
    }
    if !is_coordinate_text(lat) {
        return Err(CoordinateError::LatitudeCharacter);
    }
    if !is_coordinate_text(lng) {
        return Err(CoordinateError::LongitudeCharacter);
    }

    let latitude: f64 = lat.parse().map_err(|_| CoordinateError::LatitudeNumber)?;
    let longitude: f64 = lng.parse().map_err(|_| CoordinateError::LongitudeNumber)?;

    if latitude >= 90.0 || latitude <= -90.0 {
        return Err(CoordinateError::LatitudeRange);
    }
    if longitude >= 180.0 || longitude <= -180.0 {
        return Err(CoordinateError::LongitudeRange);
    }
    Ok(GeoPoint::new(latitude, longitude))
}

/// Parse `"LAT,LNG"` (spaces allowed around either number).
pub fn parse_lat_lng_pair(s: &str) -> Result<GeoPoint, CoordinateError> {
    let (lat, lng) = s.split_once(',').ok_or(CoordinateError::PairFormat)?;
    parse_coordinates(lat, lng)
}
