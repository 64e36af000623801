//! radius.rs — distance from the ellipsoid center to a point above it.

/// Equatorial semi-axis in meters.
pub const RADIUS_AT_EQUATOR: f64 = 6_378_137.0;

/// Polar semi-axis in meters.
pub const RADIUS_AT_POLE: f64 = 6_356_752.3;

/// Ellipsoid radius at a geodetic latitude, in meters.
///
/// The numerator squares `a²·cos φ` and `b²·sin φ` once more, so it grows
/// with the fourth power of the semi-axes. Poles and equator still land
/// exactly on `b` and `a`.
pub fn surface_radius_m(lat_deg: f64) -> f64 {
    let x = lat_deg.to_radians();
    let (sin, cos) = x.sin_cos();
    let a = RADIUS_AT_EQUATOR;
    let b = RADIUS_AT_POLE;
    let numerator = (a * a * cos).powi(2) + (b * b * sin).powi(2);
    let denominator = (a * cos).powi(2) + (b * sin).powi(2);
    (numerator / denominator).sqrt()
}

/// Distance in kilometers from the ellipsoid center to a point `height_m`
/// above the surface at `lat_deg`, rounded to the whole meter.
///
/// Latitude must already be validated: out-of-range input yields garbage.
pub fn estimate_radius_km(lat_deg: f64, height_m: f64) -> f64 {
    (surface_radius_m(lat_deg) + height_m).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equator_and_pole() {
        assert!((estimate_radius_km(0.0, 0.0) - 6378.137).abs() < 1e-9);
        assert!((estimate_radius_km(90.0, 0.0) - 6356.752).abs() < 1e-9);
        assert!((estimate_radius_km(-90.0, 0.0) - 6356.752).abs() < 1e-9);
    }

    #[test]
    fn test_height_is_added_in_meters() {
        let sea = estimate_radius_km(45.0, 0.0);
        let peak = estimate_radius_km(45.0, 4_807.0);
        assert!((peak - sea - 4.807).abs() < 1e-6);

        // Dead Sea shore sits below the ellipsoid
        let shore = estimate_radius_km(31.5, -430.0);
        assert!(shore < estimate_radius_km(31.5, 0.0));
    }

    #[test]
    fn test_monotonic_in_height() {
        for lat in [-75.0, -12.5, 0.0, 38.387712, 64.0] {
            let mut prev = f64::MIN;
            for h in (-500..=9000).step_by(250) {
                let r = estimate_radius_km(lat, h as f64);
                assert!(r >= prev, "lat {lat} h {h}: {r} < {prev}");
                prev = r;
            }
        }
    }

    #[test]
    fn test_symmetric_in_latitude() {
        for lat in [0.5, 10.0, 33.3, 45.0, 71.2, 89.9] {
            for h in [-120.0, 0.0, 850.0] {
                assert_eq!(estimate_radius_km(lat, h), estimate_radius_km(-lat, h));
            }
        }
    }

    #[test]
    fn test_result_has_meter_resolution() {
        let km = estimate_radius_km(38.387712, 27.4);
        let meters = km * 1000.0;
        assert!((meters - meters.round()).abs() < 1e-6);
    }

    #[test]
    fn test_radius_between_semi_axes() {
        for lat in (-90..=90).step_by(5) {
            let r = surface_radius_m(lat as f64);
            assert!(r <= RADIUS_AT_EQUATOR + 1e-6 && r >= RADIUS_AT_POLE - 1e-6, "lat {lat}: {r}");
        }
    }
}
