//! render.rs — draw a `Scene` as a self-contained SVG.
//!
//! Country polygons come from Natural Earth GeoJSON (written to
//! `assets/world.geojson` by the build script, fetched at runtime when
//! absent). Projection is equirectangular over the scene's viewport.
//!
//! Layers, bottom to top: ocean, graticule, land, lines, markers, caption.

use std::{fmt::Write as _, fs, path::Path};

use anyhow::Context;
use serde_json::Value;
use tracing::{debug, info};

use crate::scene::{Scene, Viewport, HEIGHT as H, WIDTH as W};

pub const GEOJSON_URL: &str =
    "https://raw.githubusercontent.com/datasets/geo-countries/master/data/countries.geojson";

pub const GEOJSON_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/world.geojson");

const MARKER_R: f64 = 6.0;

// ---------------------------------------------------------------------------
// Country polygons
// ---------------------------------------------------------------------------

/// Read the country GeoJSON from `path`, downloading it when missing.
pub fn load_countries(path: &Path) -> anyhow::Result<Value> {
    if path.exists() {
        debug!(path = %path.display(), "reading country polygons");
        let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        return serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()));
    }
    info!(url = GEOJSON_URL, "fetching country polygons");
    let resp = ureq::get(GEOJSON_URL).set("Accept-Encoding", "identity").call()?;
    Ok(serde_json::from_reader(resp.into_reader())?)
}

fn ring_to_path(vp: &Viewport, coords: &[Value]) -> String {
    let mut d = String::new();
    for (i, pt) in coords.iter().enumerate() {
        let arr = match pt.as_array() { Some(a) => a, None => continue };
        let lon = match arr.first().and_then(|v| v.as_f64()) { Some(v) => v, None => continue };
        let lat = match arr.get(1).and_then(|v| v.as_f64())  { Some(v) => v, None => continue };
        let (x, y) = vp.project(lon, lat);
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{cmd}{x:.2},{y:.2}");
    }
    d.push('Z');
    d
}

fn geometry_paths(vp: &Viewport, geom: &Value) -> Vec<String> {
    let polygons: Vec<&Value> = match geom["type"].as_str().unwrap_or("") {
        "Polygon" => vec![&geom["coordinates"]],
        "MultiPolygon" => geom["coordinates"].as_array().map(|p| p.iter().collect()).unwrap_or_default(),
        _ => Vec::new(),
    };
    polygons
        .into_iter()
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(Value::as_array)
        .map(|pts| ring_to_path(vp, pts))
        .collect()
}

/// Bounding box test in degrees so off-screen countries are skipped.
fn touches(vp: &Viewport, geom: &Value) -> bool {
    fn walk(v: &Value, bb: &mut [f64; 4]) {
        match v.as_array() {
            Some(a) if a.len() >= 2 && a[0].is_number() => {
                if let (Some(lon), Some(lat)) = (a[0].as_f64(), a[1].as_f64()) {
                    bb[0] = bb[0].min(lon);
                    bb[1] = bb[1].max(lon);
                    bb[2] = bb[2].min(lat);
                    bb[3] = bb[3].max(lat);
                }
            }
            Some(a) => a.iter().for_each(|c| walk(c, bb)),
            None => {}
        }
    }
    let mut bb = [f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY];
    walk(&geom["coordinates"], &mut bb);
    bb[0] <= vp.east && bb[1] >= vp.west && bb[2] <= vp.north && bb[3] >= vp.south
}

// ---------------------------------------------------------------------------
// SVG rendering
// ---------------------------------------------------------------------------

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('\'', "&apos;")
}

pub fn render_svg(scene: &Scene, countries: &Value) -> String {
    let vp = scene.viewport();
    let mut s = String::with_capacity(1 << 20);

    // header
    let _ = write!(
        s,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{W}" height="{H}" viewBox="0 0 {W} {H}">
  <title>{}</title>
"#,
        escape(&format!("Map around {} (zoom {})", scene.center, scene.zoom))
    );

    // ocean
    let _ = writeln!(s, "  <rect width='{W}' height='{H}' fill='#aadaff'/>");

    // graticule, spaced to give a handful of lines at any zoom
    let step = graticule_step(vp.east - vp.west);
    s.push_str("  <g stroke='#8fc3ea' stroke-width='0.5'>\n");
    let mut lon = (vp.west / step).ceil() * step;
    while lon <= vp.east {
        let (x, _) = vp.project(lon, 0.0);
        let _ = writeln!(s, "    <line x1='{x:.1}' y1='0' x2='{x:.1}' y2='{H}'/>");
        lon += step;
    }
    let mut lat = (vp.south / step).ceil() * step;
    while lat <= vp.north {
        let (_, y) = vp.project(0.0, lat);
        let _ = writeln!(s, "    <line x1='0' y1='{y:.1}' x2='{W}' y2='{y:.1}'/>");
        lat += step;
    }
    s.push_str("  </g>\n");

    // land
    s.push_str("  <g fill='#f2efe9' stroke='#b9a9c9' stroke-width='1'>\n");
    if let Some(features) = countries["features"].as_array() {
        for feature in features.iter().filter(|f| touches(&vp, &f["geometry"])) {
            for d in geometry_paths(&vp, &feature["geometry"]) {
                let _ = writeln!(s, "    <path d='{d}'/>");
            }
        }
    }
    s.push_str("  </g>\n");

    // lines
    s.push_str("  <g stroke='#FF0000' stroke-width='2' fill='none'>\n");
    for [a, b] in &scene.lines {
        let (x1, y1) = vp.project(a.longitude, a.latitude);
        let (x2, y2) = vp.project(b.longitude, b.latitude);
        let _ = writeln!(s, "    <line x1='{x1:.1}' y1='{y1:.1}' x2='{x2:.1}' y2='{y2:.1}'/>");
    }
    s.push_str("  </g>\n");

    // markers
    s.push_str("  <g fill='#ea4335' stroke='#a52714' stroke-width='1.5'>\n");
    for m in &scene.markers {
        let (x, y) = vp.project(m.longitude, m.latitude);
        let _ = writeln!(s, "    <circle cx='{x:.1}' cy='{y:.1}' r='{MARKER_R}'/>");
    }
    s.push_str("  </g>\n");

    // info window
    if let Some(info) = &scene.info {
        let (x, y) = vp.project(info.position.longitude, info.position.latitude);
        let text = escape(&info.content);
        let w = 8.0 + 7.0 * info.content.chars().count() as f64;
        let _ = write!(
            s,
            "  <g font-family='sans-serif' font-size='12'>\n    \
             <rect x='{:.1}' y='{:.1}' width='{w:.1}' height='22' rx='4' fill='#ffffff' stroke='#666666'/>\n    \
             <text x='{:.1}' y='{:.1}' fill='#202124'>{text}</text>\n  </g>\n",
            x - w / 2.0,
            y - 34.0,
            x - w / 2.0 + 4.0,
            y - 19.0
        );
    }

    s.push_str("</svg>\n");
    s
}

fn graticule_step(lon_span: f64) -> f64 {
    [30.0, 10.0, 5.0, 1.0, 0.5, 0.1, 0.05, 0.01]
        .into_iter()
        .find(|&step| lon_span / step >= 4.0)
        .unwrap_or(0.01)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::point::GeoPoint;

    fn countries() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "name": "Square" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[26.0, 38.0], [28.0, 38.0], [28.0, 39.0], [26.0, 39.0], [26.0, 38.0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "name": "Far away" },
                    "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": [[[[-75.0, 40.0], [-73.0, 40.0], [-73.0, 41.0], [-75.0, 40.0]]]]
                    }
                }
            ]
        })
    }

    #[test]
    fn test_renders_scene_layers() {
        let here = GeoPoint::new(38.61644, 27.22116);
        let city = GeoPoint::new(38.6191, 27.4289);
        let mut scene = Scene::centered(here);
        scene.add_marker(here);
        scene.add_marker(city);
        scene.add_line(here, city);
        scene.set_info(city, "Center of Manisa, Turkey <&>");

        let svg = render_svg(&scene, &countries());
        assert!(svg.starts_with("<?xml"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert_eq!(svg.matches("<path").count(), 1, "off-screen country should be skipped");
        assert!(svg.contains("stroke='#FF0000'"));
        assert!(svg.contains("Center of Manisa, Turkey &lt;&amp;&gt;"));
    }

    #[test]
    fn test_geometry_paths_handles_both_kinds() {
        let vp = Viewport::around(GeoPoint::new(0.0, 0.0), 0);
        let c = countries();
        let features = c["features"].as_array().unwrap();
        assert_eq!(geometry_paths(&vp, &features[0]["geometry"]).len(), 1);
        assert_eq!(geometry_paths(&vp, &features[1]["geometry"]).len(), 1);
        assert!(geometry_paths(&vp, &json!({"type": "Point", "coordinates": [1.0, 2.0]})).is_empty());
    }

    #[test]
    fn test_graticule_step_scales_with_zoom() {
        assert_eq!(graticule_step(360.0), 30.0);
        assert!(graticule_step(0.8) <= 0.1);
    }
}
