//! google.rs — Google Maps web-service client.
//!
//! Talks to the Places, Elevation and Geocoding JSON endpoints with a
//! blocking ureq agent. Every endpoint wraps its payload in the same
//! `{ "results": [...], "status": "...", "error_message": "..." }`
//! envelope; decoding lives in plain functions over the response body so
//! it can be exercised without the network.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use super::{Elevation, Geocoding, PlaceLookup, Region};
use crate::{
    error::ProviderError,
    point::{GeoPoint, PlaceCandidate},
};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Address component type that marks a first-level administrative area.
const REGION_TYPE: &str = "administrative_area_level_1";

// ---------------------------------------------------------------------------
// Wire model
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl From<LatLng> for GeoPoint {
    fn from(l: LatLng) -> Self {
        GeoPoint::new(l.lat, l.lng)
    }
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    #[serde(default)]
    results: Vec<PlaceResult>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    name: String,
    #[serde(default)]
    types: Vec<String>,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct ElevationResponse {
    #[serde(default)]
    results: Vec<ElevationResult>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ElevationResult {
    elevation: f64,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    #[serde(default)]
    types: Vec<String>,
    geometry: Geometry,
}

impl From<GeocodeResult> for Region {
    fn from(r: GeocodeResult) -> Self {
        Region { formatted_address: r.formatted_address, center: r.geometry.location.into() }
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// `OK` and `ZERO_RESULTS` both carry a (possibly empty) result list;
/// everything else is a service-side refusal.
fn check_status(status: String, message: Option<String>) -> Result<(), ProviderError> {
    match status.as_str() {
        "OK" | "ZERO_RESULTS" => Ok(()),
        _ => {
            warn!(%status, message = message.as_deref().unwrap_or(""), "maps service refused request");
            Err(ProviderError::Status { status, message })
        }
    }
}

pub(crate) fn decode_nearby(body: &str) -> Result<Vec<PlaceCandidate>, ProviderError> {
    let resp: NearbyResponse = serde_json::from_str(body)?;
    check_status(resp.status, resp.error_message)?;
    Ok(resp
        .results
        .into_iter()
        .map(|r| PlaceCandidate::new(r.name, r.geometry.location.into(), r.types))
        .collect())
}

pub(crate) fn decode_elevation(body: &str) -> Result<f64, ProviderError> {
    let resp: ElevationResponse = serde_json::from_str(body)?;
    check_status(resp.status, resp.error_message)?;
    resp.results
        .first()
        .map(|r| r.elevation)
        .ok_or_else(|| ProviderError::NotFound("No elevation results found".into()))
}

pub(crate) fn decode_region(body: &str) -> Result<Region, ProviderError> {
    let resp: GeocodeResponse = serde_json::from_str(body)?;
    check_status(resp.status, resp.error_message)?;
    resp.results
        .into_iter()
        .find(|r| r.types.iter().any(|t| t == REGION_TYPE))
        .map(Region::from)
        .ok_or_else(|| ProviderError::NotFound("Given coordinates are not in a city".into()))
}

pub(crate) fn decode_address(body: &str) -> Result<Region, ProviderError> {
    let resp: GeocodeResponse = serde_json::from_str(body)?;
    check_status(resp.status, resp.error_message)?;
    resp.results
        .into_iter()
        .next()
        .map(Region::from)
        .ok_or_else(|| ProviderError::NotFound("No city center near the given coordinates".into()))
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct GoogleMaps {
    agent: ureq::Agent,
    api_key: String,
    base_url: String,
}

impl GoogleMaps {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, ProviderError> {
        let url = format!("{}/{endpoint}/json", self.base_url);
        debug!(%url, ?params, "GET");
        let mut req = self.agent.get(&url).set("Accept-Encoding", "identity");
        for (k, v) in params {
            req = req.query(k, v);
        }
        let body = req.query("key", &self.api_key).call()?.into_string()?;
        debug!(endpoint, bytes = body.len(), "response");
        Ok(body)
    }
}

impl PlaceLookup for GoogleMaps {
    fn nearby_search(&self, center: GeoPoint, radius_m: u32) -> Result<Vec<PlaceCandidate>, ProviderError> {
        let location = center.to_string();
        let radius = radius_m.to_string();
        let body = self.fetch("place/nearbysearch", &[("location", location.as_str()), ("radius", radius.as_str())])?;
        decode_nearby(&body)
    }
}

impl Elevation for GoogleMaps {
    fn elevation(&self, point: GeoPoint) -> Result<f64, ProviderError> {
        let locations = point.to_string();
        let body = self.fetch("elevation", &[("locations", locations.as_str())])?;
        decode_elevation(&body)
    }
}

impl Geocoding for GoogleMaps {
    fn region_at(&self, point: GeoPoint) -> Result<Region, ProviderError> {
        let latlng = point.to_string();
        let body = self.fetch("geocode", &[("latlng", latlng.as_str())])?;
        decode_region(&body)
    }

    fn resolve(&self, address: &str) -> Result<Region, ProviderError> {
        let body = self.fetch("geocode", &[("address", address)])?;
        decode_address(&body)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{BufRead, BufReader, Write},
        net::TcpListener,
        thread::{self, JoinHandle},
    };

    use super::*;

    const NEARBY_OK: &str = r#"{
        "html_attributions": [],
        "results": [
            {
                "name": "Bornova",
                "types": ["sublocality_level_1", "sublocality", "political"],
                "geometry": { "location": { "lat": 38.4697, "lng": 27.2211 } }
            },
            {
                "name": "İzmir",
                "types": ["locality", "political"],
                "geometry": { "location": { "lat": 38.4237, "lng": 27.1428 } },
                "vicinity": "İzmir"
            },
            {
                "name": "Unnamed stop",
                "geometry": { "location": { "lat": 38.40, "lng": 27.10 } }
            }
        ],
        "status": "OK"
    }"#;

    #[test]
    fn test_decode_nearby() {
        let places = decode_nearby(NEARBY_OK).unwrap();
        assert_eq!(places.len(), 3);
        assert_eq!(places[1].name, "İzmir");
        assert!(places[1].is_locality());
        assert_eq!(places[1].location, GeoPoint::new(38.4237, 27.1428));
        assert!(places[2].tags.is_empty());
    }

    #[test]
    fn test_decode_nearby_zero_results() {
        let places = decode_nearby(r#"{"results": [], "status": "ZERO_RESULTS"}"#).unwrap();
        assert!(places.is_empty());
    }

    #[test]
    fn test_refusal_carries_message() {
        let body = r#"{"results": [], "status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#;
        match decode_nearby(body) {
            Err(ProviderError::Status { status, message }) => {
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message.as_deref(), Some("The provided API key is invalid."));
            }
            other => panic!("unexpected {other:?}"),
        }
        let err = decode_elevation(r#"{"status": "OVER_QUERY_LIMIT"}"#).unwrap_err();
        assert_eq!(err.to_string(), "service answered OVER_QUERY_LIMIT");
    }

    #[test]
    fn test_decode_elevation() {
        let body = r#"{
            "results": [
                { "elevation": 27.41, "location": { "lat": 38.387712, "lng": 27.1351808 }, "resolution": 9.54 }
            ],
            "status": "OK"
        }"#;
        assert_eq!(decode_elevation(body).unwrap(), 27.41);

        let err = decode_elevation(r#"{"results": [], "status": "OK"}"#).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_decode_region_picks_admin_area() {
        let body = r#"{
            "results": [
                {
                    "formatted_address": "Konak Mh., 35250 Konak/İzmir, Turkey",
                    "types": ["route"],
                    "geometry": { "location": { "lat": 38.41, "lng": 27.13 } }
                },
                {
                    "formatted_address": "İzmir, Turkey",
                    "types": ["administrative_area_level_1", "political"],
                    "geometry": { "location": { "lat": 38.3587, "lng": 27.1300 } }
                }
            ],
            "status": "OK"
        }"#;
        let region = decode_region(body).unwrap();
        assert_eq!(region.short_name(), "İzmir");
        assert_eq!(region.center, GeoPoint::new(38.3587, 27.1300));
    }

    #[test]
    fn test_decode_region_outside_any_area() {
        let body = r#"{
            "results": [
                {
                    "formatted_address": "Atlantic Ocean",
                    "types": ["natural_feature"],
                    "geometry": { "location": { "lat": 0.0, "lng": -30.0 } }
                }
            ],
            "status": "OK"
        }"#;
        let err = decode_region(body).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Given coordinates are not in a city");
    }

    #[test]
    fn test_decode_address() {
        let body = r#"{
            "results": [
                {
                    "formatted_address": "İzmir, Turkey",
                    "types": ["locality", "political"],
                    "geometry": { "location": { "lat": 38.4237, "lng": 27.1428 } }
                }
            ],
            "status": "OK"
        }"#;
        assert_eq!(decode_address(body).unwrap().center, GeoPoint::new(38.4237, 27.1428));
        assert!(decode_address(r#"{"results": [], "status": "ZERO_RESULTS"}"#).unwrap_err().is_not_found());
    }

    #[test]
    fn test_garbage_body_is_decode_error() {
        assert!(matches!(decode_nearby("<html>"), Err(ProviderError::Decode(_))));
    }

    /// Answer one HTTP request with `body`; the handle yields the request line.
    fn serve_once(body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                    break;
                }
            }
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            )
            .unwrap();
            stream.flush().unwrap();
            request_line.trim_end().to_string()
        });
        (format!("http://{addr}"), handle)
    }

    fn client(base_url: String) -> GoogleMaps {
        GoogleMaps::new("K", Duration::from_secs(5)).with_base_url(base_url)
    }

    #[test]
    fn test_nearby_search_request() {
        let (url, server) = serve_once(NEARBY_OK);
        let places = client(url).nearby_search(GeoPoint::new(38.38, 26.92), 50_000).unwrap();
        assert_eq!(places.len(), 3);
        assert_eq!(
            server.join().unwrap(),
            "GET /place/nearbysearch/json?location=38.38%2C26.92&radius=50000&key=K HTTP/1.1"
        );
    }

    #[test]
    fn test_resolve_request_escapes_address() {
        let body = r#"{
            "results": [
                {
                    "formatted_address": "İzmir, Turkey",
                    "types": ["locality", "political"],
                    "geometry": { "location": { "lat": 38.4237, "lng": 27.1428 } }
                }
            ],
            "status": "OK"
        }"#;
        let (url, server) = serve_once(body);
        let region = client(format!("{url}/")).resolve("İzmir").unwrap();
        assert_eq!(region.short_name(), "İzmir");
        assert_eq!(server.join().unwrap(), "GET /geocode/json?address=%C4%B0zmir&key=K HTTP/1.1");
    }

    #[test]
    fn test_elevation_and_reverse_geocode_requests() {
        let (url, server) = serve_once(r#"{"results": [{"elevation": -28.0}], "status": "OK"}"#);
        assert_eq!(client(url).elevation(GeoPoint::new(-33.5, 151.25)).unwrap(), -28.0);
        assert_eq!(server.join().unwrap(), "GET /elevation/json?locations=-33.5%2C151.25&key=K HTTP/1.1");

        let (url, server) = serve_once(r#"{"results": [], "status": "ZERO_RESULTS"}"#);
        assert!(client(url).region_at(GeoPoint::new(0.0, -30.0)).unwrap_err().is_not_found());
        assert_eq!(server.join().unwrap(), "GET /geocode/json?latlng=0%2C-30&key=K HTTP/1.1");
    }
}
