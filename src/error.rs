use thiserror::Error;

/// Failure reported by one of the lookup providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] Box<ureq::Error>),

    #[error("reading response failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("service answered {status}{}", detail_suffix(.message))]
    Status { status: String, message: Option<String> },

    #[error("{0}")]
    NotFound(String),

    #[error("location permission denied: {0}")]
    PermissionDenied(String),

    #[error("position unavailable: {0}")]
    Unavailable(String),
}

impl From<ureq::Error> for ProviderError {
    fn from(e: ureq::Error) -> Self {
        ProviderError::Transport(Box::new(e))
    }
}

fn detail_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound(_))
    }
}

/// Rejected coordinate text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("Latitude cannot be empty")]
    EmptyLatitude,

    #[error("Longitude cannot be empty")]
    EmptyLongitude,

    #[error("Invalid character in latitude")]
    LatitudeCharacter,

    #[error("Invalid character in longitude")]
    LongitudeCharacter,

    #[error("Latitude is not a number")]
    LatitudeNumber,

    #[error("Longitude is not a number")]
    LongitudeNumber,

    #[error("Latitude should be in the interval -90,90")]
    LatitudeRange,

    #[error("Longitude should be in the interval -180,180")]
    LongitudeRange,

    #[error("Expected LAT,LNG")]
    PairFormat,
}
