//! scene.rs — what the map shows after an action.
//!
//! Every locator action starts from an empty scene and returns the filled
//! one, so nothing about previous markers or lines survives between calls.

use serde::Serialize;

use crate::point::GeoPoint;

/// Zoom used for a single-point scene.
pub const DEFAULT_ZOOM: u8 = 11;

/// Rendered viewport size in pixels.
pub const WIDTH: f64 = 1200.0;
pub const HEIGHT: f64 = 600.0;

/// Tile edge at zoom 0; the world is `TILE * 2^zoom` pixels wide.
const TILE: f64 = 256.0;

/// Fraction of the viewport kept free along each edge when fitting.
const FIT_MARGIN: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoWindow {
    pub position: GeoPoint,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub center: GeoPoint,
    pub zoom: u8,
    pub markers: Vec<GeoPoint>,
    pub lines: Vec<[GeoPoint; 2]>,
    pub info: Option<InfoWindow>,
}

impl Scene {
    pub fn centered(center: GeoPoint) -> Self {
        Self { center, zoom: DEFAULT_ZOOM, markers: Vec::new(), lines: Vec::new(), info: None }
    }

    pub fn add_marker(&mut self, at: GeoPoint) {
        self.markers.push(at);
    }

    pub fn add_line(&mut self, from: GeoPoint, to: GeoPoint) {
        self.lines.push([from, to]);
    }

    pub fn set_info(&mut self, position: GeoPoint, content: impl Into<String>) {
        self.info = Some(InfoWindow { position, content: content.into() });
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::around(self.center, self.zoom)
    }

    /// Largest zoom not above `max` at which every marker sits inside the
    /// viewport's inner margin.
    pub fn fit_zoom(&mut self, max: u8) {
        self.zoom = (0..=max)
            .rev()
            .find(|&z| {
                let vp = Viewport::around(self.center, z);
                self.markers.iter().all(|&m| vp.contains_inset(m, FIT_MARGIN))
            })
            .unwrap_or(0);
    }
}

/// Equirectangular window onto the map, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl Viewport {
    pub fn around(center: GeoPoint, zoom: u8) -> Self {
        let lon_span = 360.0 * WIDTH / (TILE * f64::from(1u32 << zoom.min(24)));
        let lat_span = lon_span * HEIGHT / WIDTH;
        Self {
            west: center.longitude - lon_span / 2.0,
            east: center.longitude + lon_span / 2.0,
            south: center.latitude - lat_span / 2.0,
            north: center.latitude + lat_span / 2.0,
        }
    }

    /// Pixel position of `p` inside a `WIDTH` × `HEIGHT` canvas.
    #[inline]
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        ((lon - self.west) / (self.east - self.west) * WIDTH, (self.north - lat) / (self.north - self.south) * HEIGHT)
    }

    fn contains_inset(&self, p: GeoPoint, margin: f64) -> bool {
        let (x, y) = self.project(p.longitude, p.latitude);
        let (mx, my) = (WIDTH * margin, HEIGHT * margin);
        (mx..=WIDTH - mx).contains(&x) && (my..=HEIGHT - my).contains(&y)
    }
}
