//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/location-picker/config.toml

pub mod defaults;

use crate::constants::api::{IP_API_URL, NOMINATIM_URL, USER_AGENT};
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Resolver timing and behaviour
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Initial map viewport
    #[serde(default)]
    pub map: MapConfig,

    /// Geocoding service settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Device position settings
    #[serde(default)]
    pub geolocation: GeolocationConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Map link settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Resolver timing and behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Quiet period before a typed query is looked up
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Upper bound on a device position request
    #[serde(default = "default_geolocation_timeout_ms")]
    pub geolocation_timeout_ms: u64,

    /// Ask the device for its most accurate fix
    #[serde(default = "default_high_accuracy")]
    pub high_accuracy: bool,

    /// Zoom used when flying to a selection
    #[serde(default = "default_selection_zoom")]
    pub zoom: f64,
}

/// Initial map viewport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,

    #[serde(default = "default_center_lng")]
    pub center_lng: f64,

    #[serde(default = "default_map_zoom")]
    pub zoom: f64,

    /// Container the map is mounted into
    #[serde(default = "default_map_container")]
    pub container: String,
}

/// Geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Nominatim-compatible base URL
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_geocoder_timeout")]
    pub timeout_secs: u64,

    /// Maximum number of forward lookup candidates
    #[serde(default = "default_geocoder_limit")]
    pub limit: usize,
}

/// Device position settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    /// IP geolocation endpoint
    #[serde(default = "default_geolocation_url")]
    pub api_url: String,

    /// Maximum age of a cached fix (0 disables the cache)
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_secs: u64,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Map link settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

// Default value functions for serde
fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_geolocation_timeout_ms() -> u64 {
    DEFAULT_GEOLOCATION_TIMEOUT_MS
}
fn default_high_accuracy() -> bool {
    DEFAULT_HIGH_ACCURACY
}
fn default_selection_zoom() -> f64 {
    DEFAULT_SELECTION_ZOOM
}
fn default_center_lat() -> f64 {
    DEFAULT_CENTER_LAT
}
fn default_center_lng() -> f64 {
    DEFAULT_CENTER_LNG
}
fn default_map_zoom() -> f64 {
    DEFAULT_MAP_ZOOM
}
fn default_map_container() -> String {
    DEFAULT_MAP_CONTAINER.to_string()
}
fn default_geocoder_url() -> String {
    NOMINATIM_URL.to_string()
}
fn default_user_agent() -> String {
    USER_AGENT.to_string()
}
fn default_geocoder_timeout() -> u64 {
    DEFAULT_GEOCODER_TIMEOUT_SECS
}
fn default_geocoder_limit() -> usize {
    DEFAULT_GEOCODER_LIMIT
}
fn default_geolocation_url() -> String {
    IP_API_URL.to_string()
}
fn default_cache_max_age() -> u64 {
    DEFAULT_CACHE_MAX_AGE_SECS
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/@{lat},{lng},17z".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map=18/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lng}".to_string(),
    );
    providers
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            geolocation_timeout_ms: default_geolocation_timeout_ms(),
            high_accuracy: default_high_accuracy(),
            zoom: default_selection_zoom(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: default_center_lat(),
            center_lng: default_center_lng(),
            zoom: default_map_zoom(),
            container: default_map_container(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_geocoder_timeout(),
            limit: default_geocoder_limit(),
        }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            api_url: default_geolocation_url(),
            cache_max_age_secs: default_cache_max_age(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["resolver", "debounce_ms"] => Some(self.resolver.debounce_ms.to_string()),
            ["resolver", "geolocation_timeout_ms"] => {
                Some(self.resolver.geolocation_timeout_ms.to_string())
            }
            ["resolver", "high_accuracy"] => Some(self.resolver.high_accuracy.to_string()),
            ["resolver", "zoom"] => Some(self.resolver.zoom.to_string()),

            ["map", "center_lat"] => Some(self.map.center_lat.to_string()),
            ["map", "center_lng"] => Some(self.map.center_lng.to_string()),
            ["map", "zoom"] => Some(self.map.zoom.to_string()),
            ["map", "container"] => Some(self.map.container.clone()),

            ["geocoder", "base_url"] => Some(self.geocoder.base_url.clone()),
            ["geocoder", "user_agent"] => Some(self.geocoder.user_agent.clone()),
            ["geocoder", "timeout_secs"] => Some(self.geocoder.timeout_secs.to_string()),
            ["geocoder", "limit"] => Some(self.geocoder.limit.to_string()),

            ["geolocation", "api_url"] => Some(self.geolocation.api_url.clone()),
            ["geolocation", "cache_max_age_secs"] => {
                Some(self.geolocation.cache_max_age_secs.to_string())
            }

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["resolver", "debounce_ms"] => self.resolver.debounce_ms = parse_value(key, value)?,
            ["resolver", "geolocation_timeout_ms"] => {
                self.resolver.geolocation_timeout_ms = parse_value(key, value)?
            }
            ["resolver", "high_accuracy"] => {
                self.resolver.high_accuracy = parse_value(key, value)?
            }
            ["resolver", "zoom"] => self.resolver.zoom = parse_value(key, value)?,

            ["map", "center_lat"] => self.map.center_lat = parse_value(key, value)?,
            ["map", "center_lng"] => self.map.center_lng = parse_value(key, value)?,
            ["map", "zoom"] => self.map.zoom = parse_value(key, value)?,
            ["map", "container"] => self.map.container = value.to_string(),

            ["geocoder", "base_url"] => {
                self.geocoder.base_url = value.trim_end_matches('/').to_string()
            }
            ["geocoder", "user_agent"] => self.geocoder.user_agent = value.to_string(),
            ["geocoder", "timeout_secs"] => self.geocoder.timeout_secs = parse_value(key, value)?,
            ["geocoder", "limit"] => self.geocoder.limit = parse_value(key, value)?,

            ["geolocation", "api_url"] => self.geolocation.api_url = value.to_string(),
            ["geolocation", "cache_max_age_secs"] => {
                self.geolocation.cache_max_age_secs = parse_value(key, value)?
            }

            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => self.server.port = parse_value(key, value)?,

            ["url", "default"] => self.url.default = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "resolver.debounce_ms",
            "resolver.geolocation_timeout_ms",
            "resolver.high_accuracy",
            "resolver.zoom",
            "map.center_lat",
            "map.center_lng",
            "map.zoom",
            "map.container",
            "geocoder.base_url",
            "geocoder.user_agent",
            "geocoder.timeout_secs",
            "geocoder.limit",
            "geolocation.api_url",
            "geolocation.cache_max_age_secs",
            "server.host",
            "server.port",
            "url.default",
        ]
    }

    /// Format a URL using the specified provider
    ///
    /// Replaces {lat} and {lng} placeholders with actual values
    pub fn format_url(&self, provider: Option<&str>, lat: f64, lng: f64) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &lat.to_string())
            .replace("{lng}", &lng.to_string()))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
