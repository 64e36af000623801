use super::Position;
use crate::{error::ProviderError, point::GeoPoint};

/// Position provider that always answers the same way.
#[derive(Debug, Clone)]
pub struct FixedPosition(Result<GeoPoint, String>);

impl FixedPosition {
    pub fn new(point: GeoPoint) -> Self {
        Self(Ok(point))
    }

    /// A provider whose user refused location access.
    pub fn denied(reason: impl Into<String>) -> Self {
        Self(Err(reason.into()))
    }
}

impl Position for FixedPosition {
    fn current(&self) -> Result<GeoPoint, ProviderError> {
        self.0.clone().map_err(ProviderError::PermissionDenied)
    }
}
