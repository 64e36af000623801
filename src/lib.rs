//! geocenter — find the city you're in, the nearest city, or your
//! distance to the center of the Earth.
//!
//! The calculations ([`radius`], [`distance`], [`nearest`]) are pure
//! functions over plain values. Everything that talks to the outside
//! world sits behind the traits in [`providers`], and [`locator`] ties
//! the two together.

pub mod cli;
pub mod distance;
pub mod error;
pub mod locator;
pub mod nearest;
pub mod point;
pub mod providers;
pub mod radius;
pub mod render;
pub mod scene;
pub mod validate;

pub use distance::distance_km;
pub use error::{CoordinateError, ProviderError};
pub use locator::{Locator, Outcome};
pub use nearest::{select_nearest_city, NearestCity};
pub use point::{ElevationSample, GeoPoint, PlaceCandidate};
pub use radius::estimate_radius_km;
