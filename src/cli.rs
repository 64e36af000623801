//! Command-Line Interface Module
//!
//! Argument model and value parsers. Every service setting can also come
//! from the environment so the binary runs unattended.

use std::{net::IpAddr, path::PathBuf};

use clap::{ArgAction, Parser, Subcommand};

use crate::{
    error::CoordinateError,
    locator::MAX_SEARCH_RADIUS_M,
    point::GeoPoint,
    providers::geoip::DEFAULT_MMDB_PATH,
    render::GEOJSON_PATH,
    validate::{parse_coordinates, parse_lat_lng_pair},
};

// ===================== CLI =====================

#[derive(Parser, Debug)]
#[command(author, version, about = "Find your city, the nearest city, or your distance to the Earth's center")]
pub struct Args {
    /// Google Maps web-services API key
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Nearby-search radius in meters (1 to 50000)
    #[arg(long, default_value_t = MAX_SEARCH_RADIUS_M, value_parser = parse_radius, env = "GEOCENTER_SEARCH_RADIUS", global = true)]
    pub radius: u32,

    /// Path to the GeoLite2-City database used to find the current position
    #[arg(long, default_value = DEFAULT_MMDB_PATH, env = "GEOCENTER_MMDB", global = true)]
    pub mmdb: PathBuf,

    /// Use this "LAT,LNG" as the current position instead of GeoIP
    #[arg(long, allow_hyphen_values = true, value_parser = parse_position, env = "GEOCENTER_POSITION", global = true)]
    pub position: Option<GeoPoint>,

    /// Geolocate this IP address instead of the public one
    #[arg(long, env = "GEOCENTER_IP", global = true)]
    pub ip: Option<IpAddr>,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 10, global = true)]
    pub timeout_secs: u64,

    /// Write the resulting map as SVG to this path
    #[arg(long, global = true)]
    pub svg: Option<PathBuf>,

    /// Country polygons for --svg (downloaded when missing)
    #[arg(long, default_value = GEOJSON_PATH, env = "GEOCENTER_GEOJSON", global = true)]
    pub geojson: PathBuf,

    /// Print the full outcome as JSON instead of the message
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show which city the given coordinates are in
    ShowCity {
        #[command(flatten)]
        at: Coordinates,
    },
    /// Find the nearest city and how far away it is
    NearestCity {
        #[command(flatten)]
        at: OptionalCoordinates,
    },
    /// Distance from a point to the center of the Earth
    EarthCenter {
        #[command(flatten)]
        at: OptionalCoordinates,
    },
    /// Print the current position
    Whereami,
}

/// Latitude and longitude as typed; validated together.
#[derive(clap::Args, Debug)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: String,
    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lng: String,
}

impl Coordinates {
    pub fn point(&self) -> Result<GeoPoint, CoordinateError> {
        parse_coordinates(&self.lat, &self.lng)
    }
}

/// Coordinates that fall back to the current position when omitted.
#[derive(clap::Args, Debug)]
pub struct OptionalCoordinates {
    /// Latitude in decimal degrees (default: current position)
    #[arg(long, allow_hyphen_values = true, requires = "lng")]
    pub lat: Option<String>,
    /// Longitude in decimal degrees (default: current position)
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    pub lng: Option<String>,
}

impl OptionalCoordinates {
    pub fn point(&self) -> Result<Option<GeoPoint>, CoordinateError> {
        match (&self.lat, &self.lng) {
            (None, None) => Ok(None),
            (lat, lng) => parse_coordinates(lat.as_deref().unwrap_or(""), lng.as_deref().unwrap_or("")).map(Some),
        }
    }
}

impl Args {
    pub fn log_level(&self) -> tracing::Level {
        match (self.quiet, self.verbose) {
            (true, _) => tracing::Level::WARN,
            (false, 0) => tracing::Level::INFO,
            (false, 1) => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

// ===================== CLI VALUE PARSERS =====================

fn parse_radius(s: &str) -> Result<u32, String> {
    let v: u32 = s.parse().map_err(|_| format!("Invalid integer: {}", s))?;
    if !(1..=MAX_SEARCH_RADIUS_M).contains(&v) {
        return Err(format!("Radius must be between 1 and {} meters, got {}", MAX_SEARCH_RADIUS_M, v));
    }
    Ok(v)
}

fn parse_position(s: &str) -> Result<GeoPoint, String> {
    parse_lat_lng_pair(s).map_err(|e| e.to_string())
}
