//! geoip.rs — current position from a MaxMind GeoLite2-City database.
//!
//! The database is opened on first use and kept for the life of the
//! provider. Without an explicit IP the public address is discovered over
//! HTTP first, then looked up:
//!
//! ```ignore
//! let here = GeoIp::new(DEFAULT_MMDB_PATH).current()?;
//! ```

use std::{
    net::IpAddr,
    path::PathBuf,
    str::FromStr,
    sync::OnceLock,
    time::Duration,
};

use maxminddb::{geoip2, Reader};
use tracing::{debug, info, warn};

use super::Position;
use crate::{error::ProviderError, point::GeoPoint};

pub const DEFAULT_MMDB_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/GeoLite2-City.mmdb");

const PUBLIC_IP_URL: &str = "https://api.ipify.org";

pub struct GeoIp {
    path: PathBuf,
    ip: Option<IpAddr>,
    timeout: Duration,
    db: OnceLock<Option<Reader<Vec<u8>>>>,
}

impl GeoIp {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), ip: None, timeout: Duration::from_secs(10), db: OnceLock::new() }
    }

    /// Look up this address instead of discovering the public one.
    pub fn with_ip(mut self, ip: Option<IpAddr>) -> Self {
        self.ip = ip;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn db(&self) -> Option<&Reader<Vec<u8>>> {
        self.db
            .get_or_init(|| {
                if !self.path.exists() {
                    warn!(
                        path = %self.path.display(),
                        "GeoLite2-City.mmdb not found; set MAXMIND_LICENSE_KEY and rebuild, or place the file there manually"
                    );
                    return None;
                }
                match Reader::open_readfile(&self.path) {
                    Ok(r) => {
                        info!(path = %self.path.display(), "opened GeoLite2 database");
                        Some(r)
                    }
                    Err(e) => {
                        warn!(path = %self.path.display(), "failed to open mmdb: {e}");
                        None
                    }
                }
            })
            .as_ref()
    }

    fn public_ip(&self) -> Result<IpAddr, ProviderError> {
        debug!(url = PUBLIC_IP_URL, "discovering public IP");
        let body = ureq::AgentBuilder::new()
            .timeout(self.timeout)
            .build()
            .get(PUBLIC_IP_URL)
            .call()?
            .into_string()?;
        IpAddr::from_str(body.trim())
            .map_err(|_| ProviderError::Unavailable(format!("unexpected public IP answer {:?}", body.trim())))
    }

    /// Latitude/longitude on record for `ip`.
    pub fn lookup(&self, ip: IpAddr) -> Result<GeoPoint, ProviderError> {
        let reader = self
            .db()
            .ok_or_else(|| ProviderError::Unavailable(format!("no GeoIP database at {}", self.path.display())))?;
        let record: geoip2::City = reader
            .lookup(ip)
            .map_err(|e| ProviderError::Unavailable(format!("{ip}: {e}")))?;
        let loc = record
            .location
            .ok_or_else(|| ProviderError::Unavailable(format!("{ip} has no city-level record")))?;
        match (loc.latitude, loc.longitude) {
            (Some(lat), Some(lon)) => Ok(GeoPoint::new(lat, lon)),
            _ => Err(ProviderError::Unavailable(format!("{ip} has no coordinates"))),
        }
    }
}

impl Position for GeoIp {
    fn current(&self) -> Result<GeoPoint, ProviderError> {
        let ip = match self.ip {
            Some(ip) => ip,
            None => self.public_ip()?,
        };
        let point = self.lookup(ip)?;
        info!(%ip, %point, "resolved position from GeoIP");
        Ok(point)
    }
}
