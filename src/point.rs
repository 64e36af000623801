//! point.rs — plain geographic value types shared by every module.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

/// Category tag the places provider attaches to city/town-level areas.
pub const LOCALITY: &str = "locality";

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// A place returned by a nearby search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub location: GeoPoint,
    pub tags: BTreeSet<String>,
}

impl PlaceCandidate {
    pub fn new<I, S>(name: impl Into<String>, location: GeoPoint, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            location,
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_locality(&self) -> bool {
        self.has_tag(LOCALITY)
    }
}

/// Height above the reference ellipsoid at a point. Negative below sea level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationSample {
    pub location: GeoPoint,
    pub height_m: f64,
}
