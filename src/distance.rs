//! distance.rs — great-circle distance on a spherical Earth.

use crate::point::GeoPoint;

/// Mean Earth radius in meters.
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two points, in kilometers.
pub fn distance_km(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let sin_dlat_half = ((p2.latitude - p1.latitude).to_radians() * 0.5).sin();
    let sin_dlon_half = ((p2.longitude - p1.longitude).to_radians() * 0.5).sin();

    let h = sin_dlat_half * sin_dlat_half + lat1.cos() * lat2.cos() * sin_dlon_half * sin_dlon_half;

    // h can drift a hair above 1 for antipodal points
    2.0 * MEAN_EARTH_RADIUS_M * h.sqrt().min(1.0).asin() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const NYC: GeoPoint = GeoPoint::new(40.7128, -74.0060);

    #[test]
    fn test_zero_for_same_point() {
        assert_eq!(distance_km(NYC, NYC), 0.0);
        let pole = GeoPoint::new(90.0, 0.0);
        assert_eq!(distance_km(pole, pole), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let izmir = GeoPoint::new(38.4237, 27.1428);
        let manisa = GeoPoint::new(38.6191, 27.4289);
        assert_eq!(distance_km(izmir, manisa), distance_km(manisa, izmir));
        assert_eq!(distance_km(NYC, izmir), distance_km(izmir, NYC));
    }

    #[test]
    fn test_known_distances() {
        // one degree of latitude along a meridian
        let d = distance_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");

        let london = GeoPoint::new(51.5074, -0.1278);
        let d = distance_km(NYC, london);
        assert!((d - 5570.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn test_antipodes_are_half_circumference() {
        let d = distance_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0));
        let half = std::f64::consts::PI * MEAN_EARTH_RADIUS_M / 1000.0;
        assert!((d - half).abs() < 1e-6);
    }
}
