//! Lookup services the locator depends on.
//!
//! Each trait is one narrow question asked of the outside world. Calls
//! block until the service answers; failures come back as `ProviderError`
//! and are never retried here.

pub mod fixed;
pub mod geoip;
pub mod google;

use crate::{
    error::ProviderError,
    point::{GeoPoint, PlaceCandidate},
};

/// Places around a point.
pub trait PlaceLookup {
    fn nearby_search(&self, center: GeoPoint, radius_m: u32) -> Result<Vec<PlaceCandidate>, ProviderError>;
}

/// Ground height above the ellipsoid at a point, in meters.
pub trait Elevation {
    fn elevation(&self, point: GeoPoint) -> Result<f64, ProviderError>;
}

/// A named place with its canonical center.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub formatted_address: String,
    pub center: GeoPoint,
}

impl Region {
    /// Leading component of the address, e.g. `"İzmir"` for `"İzmir, Turkey"`.
    pub fn short_name(&self) -> &str {
        self.formatted_address.split(',').next().unwrap_or_default().trim()
    }
}

/// Forward and reverse geocoding.
pub trait Geocoding {
    /// Administrative region (first-level) containing `point`.
    fn region_at(&self, point: GeoPoint) -> Result<Region, ProviderError>;

    /// Best match for a free-text address.
    fn resolve(&self, address: &str) -> Result<Region, ProviderError>;
}

/// The device's current position.
pub trait Position {
    fn current(&self) -> Result<GeoPoint, ProviderError>;
}

impl<T: Position + ?Sized> Position for Box<T> {
    fn current(&self) -> Result<GeoPoint, ProviderError> {
        (**self).current()
    }
}
