//! Device position from the host's IP address
//!
//! Uses ip-api.com for a coarse fix with file-based caching. The fix is only
//! as good as the IP-to-city database, so a high-accuracy request always
//! bypasses the cache and asks the service again.

use crate::config::GeolocationConfig;
use crate::config::defaults::APP_DIR_NAME;
use crate::constants::cache::POSITION_CACHE_FILE;
use crate::coord::Location;
use crate::error::{Error, Result};
use crate::geo::GeolocationSource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tracing::debug;

/// IP geolocation source with caching
#[derive(Debug)]
pub struct IpGeolocationSource {
    client: reqwest::Client,
    api_url: String,
    cache_path: Option<PathBuf>,
    max_age: Duration,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    country: Option<String>,
}

/// Cached position
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedPosition {
    location: Location,
    timestamp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl IpGeolocationSource {
    /// Create a source with the default cache path
    pub fn new(config: &GeolocationConfig) -> Result<Self> {
        let cache_path = dirs::cache_dir().map(|p| p.join(APP_DIR_NAME).join(POSITION_CACHE_FILE));
        Self::build(config, cache_path)
    }

    /// Create a source with a specific cache path
    pub fn with_cache_path(config: &GeolocationConfig, cache_path: PathBuf) -> Result<Self> {
        Self::build(config, Some(cache_path))
    }

    /// Create a source without caching
    pub fn without_cache(config: &GeolocationConfig) -> Result<Self> {
        Self::build(config, None)
    }

    fn build(config: &GeolocationConfig, cache_path: Option<PathBuf>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::constants::api::USER_AGENT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            cache_path: cache_path.filter(|_| config.cache_max_age_secs > 0),
            max_age: Duration::from_secs(config.cache_max_age_secs),
        })
    }

    /// Fetch a fix from ip-api.com
    async fn fetch_position(&self) -> Result<Location> {
        let response = self
            .client
            .get(&self.api_url)
            .send()
            .await
            .map_err(|e| Error::GeolocationUnavailable(format!("IP location request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::FORBIDDEN || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::GeolocationDenied(format!(
                "IP location API refused the request: {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(Error::GeolocationUnavailable(format!(
                "IP location API returned status: {}",
                status
            )));
        }

        let data: IpApiResponse = response.json().await.map_err(|e| {
            Error::GeolocationUnavailable(format!("Failed to parse IP location response: {}", e))
        })?;

        if data.status != "success" {
            return Err(Error::GeolocationUnavailable(
                data.message
                    .unwrap_or_else(|| "IP location lookup failed".to_string()),
            ));
        }

        let (Some(lat), Some(lng)) = (data.lat, data.lon) else {
            return Err(Error::GeolocationUnavailable(
                "No coordinates in IP location response".to_string(),
            ));
        };

        let label = [data.city, data.region_name, data.country]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        Location::new(lat, lng)
            .map(|location| location.with_label(Some(label)))
            .map_err(|e| Error::GeolocationUnavailable(e.to_string()))
    }

    /// Load cached position if still fresh
    fn load_cache(&self) -> Option<Location> {
        let cache_path = self.cache_path.as_ref()?;
        let content = fs::read_to_string(cache_path).ok()?;
        let cached: CachedPosition = serde_json::from_str(&content).ok()?;

        if now_secs().saturating_sub(cached.timestamp) < self.max_age.as_secs() {
            Some(cached.location)
        } else {
            None
        }
    }

    /// Save position to cache, ignoring write failures
    fn save_cache(&self, location: &Location) {
        let Some(cache_path) = &self.cache_path else {
            return;
        };

        if let Some(parent) = cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let cached = CachedPosition {
            location: location.clone(),
            timestamp: now_secs(),
        };

        if let Ok(content) = serde_json::to_string_pretty(&cached) {
            let _ = fs::write(cache_path, content);
        }
    }

    /// Clear the cache
    pub fn clear_cache(&self) {
        if let Some(cache_path) = &self.cache_path {
            let _ = fs::remove_file(cache_path);
        }
    }
}

impl GeolocationSource for IpGeolocationSource {
    fn name(&self) -> &'static str {
        "ip-api"
    }

    async fn current_position(&self, timeout: Duration, high_accuracy: bool) -> Result<Location> {
        if !high_accuracy {
            if let Some(cached) = self.load_cache() {
                debug!("Using cached position {}", cached);
                return Ok(cached);
            }
        }

        let location = tokio::time::timeout(timeout, self.fetch_position())
            .await
            .map_err(|_| Error::GeolocationTimeout(timeout))??;

        self.save_cache(&location);
        Ok(location)
    }
}
