//! nearest.rs — pick the closest locality out of a nearby-search result.

use serde::Serialize;

use crate::{
    distance::distance_km,
    point::{GeoPoint, PlaceCandidate},
};

/// The selected city and how far it is from the reference point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NearestCity<'a> {
    pub place: &'a PlaceCandidate,
    pub distance_km: f64,
}

/// Returns the locality-tagged candidate closest to `reference`, or `None`
/// when no candidate carries the locality tag.
///
/// Equal distances resolve to whichever candidate came first.
pub fn select_nearest_city(reference: GeoPoint, candidates: &[PlaceCandidate]) -> Option<NearestCity<'_>> {
    candidates
        .iter()
        .filter(|c| c.is_locality())
        .map(|place| NearestCity { place, distance_km: distance_km(place.location, reference) })
        .min_by(|a, b| a.distance_km.total_cmp(&b.distance_km))
}
