//! locator.rs — the three user actions wired to their providers.
//!
//! Each action gathers its inputs from the providers, runs the pure
//! calculations, and hands back the message to show together with the
//! scene to draw. Provider failures come back untouched.

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    error::ProviderError,
    nearest::select_nearest_city,
    point::{ElevationSample, GeoPoint},
    providers::{Elevation, Geocoding, PlaceLookup, Position},
    radius::estimate_radius_km,
    scene::{Scene, DEFAULT_ZOOM},
};

/// Places nearby search caps its radius here.
pub const MAX_SEARCH_RADIUS_M: u32 = 50_000;

/// Machine-readable part of an outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Detail {
    City { name: String, address: String, center: GeoPoint },
    NoCity { reason: String },
    NearestCity { name: String, location: GeoPoint, distance_km: f64 },
    NoNearbyCity { radius_m: u32 },
    EarthCenter { elevation: ElevationSample, distance_km: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub message: String,
    pub detail: Detail,
    pub scene: Scene,
}

pub struct Locator<P, E, G, L> {
    places: P,
    elevation: E,
    geocoder: G,
    position: L,
    search_radius_m: u32,
}

impl<P, E, G, L> Locator<P, E, G, L>
where
    P: PlaceLookup,
    E: Elevation,
    G: Geocoding,
    L: Position,
{
    pub fn new(places: P, elevation: E, geocoder: G, position: L) -> Self {
        Self { places, elevation, geocoder, position, search_radius_m: MAX_SEARCH_RADIUS_M }
    }

    pub fn with_search_radius(mut self, radius_m: u32) -> Self {
        self.search_radius_m = radius_m.clamp(1, MAX_SEARCH_RADIUS_M);
        self
    }

    pub fn search_radius_m(&self) -> u32 {
        self.search_radius_m
    }

    /// Name the first-level region containing `point` and mark its center.
    pub fn show_city(&self, point: GeoPoint) -> Result<Outcome, ProviderError> {
        let mut scene = Scene::centered(point);
        scene.add_marker(point);

        let city = match self.geocoder.region_at(point).and_then(|r| self.geocoder.resolve(r.short_name())) {
            Ok(city) => city,
            Err(e) if e.is_not_found() => {
                info!(%point, "no city at point: {e}");
                return Ok(Outcome {
                    message: "No such city".into(),
                    detail: Detail::NoCity { reason: e.to_string() },
                    scene,
                });
            }
            Err(e) => return Err(e),
        };

        let name = city.short_name().to_string();
        info!(%point, city = %name, "resolved city");
        scene.set_info(city.center, format!("Center of {}", city.formatted_address));
        Ok(Outcome {
            message: format!("You are in {name}"),
            detail: Detail::City { name, address: city.formatted_address, center: city.center },
            scene,
        })
    }

    /// Closest locality to `reference`, or to the current position when
    /// no reference is given.
    pub fn nearest_city(&self, reference: Option<GeoPoint>) -> Result<Outcome, ProviderError> {
        let here = match reference {
            Some(p) => p,
            None => self.position.current()?,
        };
        let mut scene = Scene::centered(here);
        scene.add_marker(here);

        let candidates = self.places.nearby_search(here, self.search_radius_m)?;
        debug!(%here, candidates = candidates.len(), radius_m = self.search_radius_m, "nearby search");

        let Some(nearest) = select_nearest_city(here, &candidates) else {
            let km = f64::from(self.search_radius_m) / 1000.0;
            info!(%here, "no locality within {km} km");
            return Ok(Outcome {
                message: format!("No city found within {km} km"),
                detail: Detail::NoNearbyCity { radius_m: self.search_radius_m },
                scene,
            });
        };

        let city = nearest.place;
        info!(%here, city = %city.name, distance_km = nearest.distance_km, "nearest city");
        scene.add_marker(city.location);
        scene.add_line(here, city.location);
        scene.fit_zoom(DEFAULT_ZOOM);
        Ok(Outcome {
            message: format!("You are {:.2} km away from {}", nearest.distance_km, city.name),
            detail: Detail::NearestCity {
                name: city.name.clone(),
                location: city.location,
                distance_km: nearest.distance_km,
            },
            scene,
        })
    }

    /// Straight-line distance from `point` (or the current position) to
    /// the center of the Earth, ground elevation included.
    pub fn earth_center(&self, point: Option<GeoPoint>) -> Result<Outcome, ProviderError> {
        let point = match point {
            Some(p) => p,
            None => self.position.current()?,
        };
        let height_m = self.elevation.elevation(point)?;
        let distance_km = estimate_radius_km(point.latitude, height_m);
        info!(%point, height_m, distance_km, "distance to earth center");

        let mut scene = Scene::centered(point);
        scene.add_marker(point);
        Ok(Outcome {
            message: format!("You are {distance_km} km away from the earth center"),
            detail: Detail::EarthCenter { elevation: ElevationSample { location: point, height_m }, distance_km },
            scene,
        })
    }
}
