//! Centralized constants for the location-picker crate
//!
//! Values shared by more than one module live here.

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// User agent sent with every outbound request (Nominatim requires one)
    pub const USER_AGENT: &str = concat!("location-picker/", env!("CARGO_PKG_VERSION"));
}

/// Resolver timing
pub mod resolver {
    /// Quiet period before a search query is sent
    pub const DEBOUNCE_MS: u64 = 500;

    /// Upper bound on a device position request
    pub const GEOLOCATION_TIMEOUT_MS: u64 = 5000;

    /// Zoom level used when flying to a resolved location
    pub const SELECTION_ZOOM: f64 = 16.0;
}

/// Cache settings
pub mod cache {
    /// Device position cache duration in seconds (1 hour)
    pub const POSITION_MAX_AGE_SECS: u64 = 3600;

    /// Device position cache file name
    pub const POSITION_CACHE_FILE: &str = "position_cache.json";
}
