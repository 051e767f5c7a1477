//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the Nominatim JSON API for forward and reverse lookups.
//! The public instance allows 1 request per second and requires a
//! User-Agent; the resolver's debounce keeps typing well under that.

use crate::config::GeocoderConfig;
use crate::coord::{Coordinates, Location};
use crate::error::{Error, Result};
use crate::geo::GeocodeClient;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
    limit: usize,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// Nominatim reverse response
///
/// A point with no address yields `{"error": "Unable to geocode"}` with a
/// 200 status instead of a result.
#[derive(Debug, Deserialize)]
struct ReverseResult {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl NominatimClient {
    /// Create a client from geocoder settings
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limit: config.limit.max(1),
        })
    }

    /// Parse lat/lng strings to a validated location
    fn parse_location(lat: &str, lng: &str) -> Result<Location> {
        let lat: f64 = lat
            .parse()
            .map_err(|_| Error::InvalidCoordinates(format!("Invalid latitude: {}", lat)))?;
        let lng: f64 = lng
            .parse()
            .map_err(|_| Error::InvalidCoordinates(format!("Invalid longitude: {}", lng)))?;
        Location::new(lat, lng)
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::GeocodeUnavailable(format!("Nominatim request failed: {}", e)))
    }
}

impl GeocodeClient for NominatimClient {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    async fn forward_lookup(&self, query: &str) -> Result<Vec<Location>> {
        let url = format!(
            "{}/search?q={}&format=json&limit={}",
            self.base_url,
            urlencoding::encode(query),
            self.limit
        );

        let response = self.get(&url).await?;

        if !response.status().is_success() {
            return Err(Error::GeocodeUnavailable(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let results: Vec<SearchResult> = response.json().await.map_err(|e| {
            Error::GeocodeUnavailable(format!("Failed to parse Nominatim response: {}", e))
        })?;

        let locations = results
            .into_iter()
            .filter_map(|result| match Self::parse_location(&result.lat, &result.lon) {
                Ok(location) => Some(location.with_label(Some(result.display_name))),
                Err(e) => {
                    debug!("Skipping unusable Nominatim candidate: {}", e);
                    None
                }
            })
            .collect();

        Ok(locations)
    }

    async fn reverse_lookup(&self, coords: Coordinates) -> Result<Location> {
        let location = Location::from_coords(coords)?;
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json",
            self.base_url, coords.lat, coords.lng
        );

        let response = self.get(&url).await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(location);
        }
        if !response.status().is_success() {
            return Err(Error::GeocodeUnavailable(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let result: ReverseResult = response.json().await.map_err(|e| {
            Error::GeocodeUnavailable(format!("Failed to parse Nominatim response: {}", e))
        })?;

        if let Some(reason) = result.error {
            debug!("No address at {}: {}", coords, reason);
        }

        Ok(location.with_label(result.display_name))
    }
}
