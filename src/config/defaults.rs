//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants;

/// Search debounce window in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = constants::resolver::DEBOUNCE_MS;

/// Device position timeout in milliseconds
pub const DEFAULT_GEOLOCATION_TIMEOUT_MS: u64 = constants::resolver::GEOLOCATION_TIMEOUT_MS;

/// Ask the device for its most accurate fix
pub const DEFAULT_HIGH_ACCURACY: bool = true;

/// Zoom used when flying to a selection
pub const DEFAULT_SELECTION_ZOOM: f64 = constants::resolver::SELECTION_ZOOM;

/// Initial map center before anything is selected
pub const DEFAULT_CENTER_LAT: f64 = 0.0;
pub const DEFAULT_CENTER_LNG: f64 = 0.0;

/// Initial map zoom (whole-world view)
pub const DEFAULT_MAP_ZOOM: f64 = 2.0;

/// Map container identifier
pub const DEFAULT_MAP_CONTAINER: &str = "map";

/// Geocoder request timeout in seconds
pub const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 10;

/// Maximum number of forward lookup candidates
pub const DEFAULT_GEOCODER_LIMIT: usize = 5;

/// Maximum age of a cached device position in seconds
pub const DEFAULT_CACHE_MAX_AGE_SECS: u64 = constants::cache::POSITION_MAX_AGE_SECS;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7879;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "openstreetmap";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "location-picker";
