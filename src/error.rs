//! Error types for location-picker

use std::time::Duration;
use thiserror::Error;

/// Main error type for location-picker operations
#[derive(Error, Debug)]
pub enum Error {
    /// A forward lookup produced no candidates
    #[error("No location found for '{0}'")]
    GeocodeNotFound(String),

    /// The geocoding service could not be reached or answered with a failure
    #[error("Geocoding service unavailable: {0}")]
    GeocodeUnavailable(String),

    #[error("Location permission denied: {0}")]
    GeolocationDenied(String),

    #[error("Location request timed out after {}ms", .0.as_millis())]
    GeolocationTimeout(Duration),

    #[error("Location unavailable: {0}")]
    GeolocationUnavailable(String),

    /// Raised by the consuming form when it commits without a selection
    #[error("No location selected")]
    InvalidSelection,

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for location-picker operations
pub type Result<T> = std::result::Result<T, Error>;
