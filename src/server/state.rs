//! Server shared state
//!
//! Holds configuration and the lookup backends shared by all handlers.

use crate::config::Config;
use crate::error::Result;
use crate::geo::device::IpGeolocationSource;
use crate::geo::nominatim::NominatimClient;
use crate::geo::{get_geocoder, get_position_source, GeocodeClient, GeolocationSource};
use std::sync::Arc;
use std::time::Duration;

/// Shared state for the HTTP server
pub struct AppState<G, L> {
    pub config: Config,
    pub geocoder: Arc<G>,
    pub locator: Arc<L>,
}

impl AppState<NominatimClient, IpGeolocationSource> {
    /// Build state with the configured backends
    pub fn from_config(config: Config) -> Result<Self> {
        let geocoder = get_geocoder(&config)?;
        let locator = get_position_source(&config)?;
        Ok(Self::new(config, geocoder, locator))
    }
}

impl<G: GeocodeClient, L: GeolocationSource> AppState<G, L> {
    pub fn new(config: Config, geocoder: G, locator: L) -> Self {
        Self {
            config,
            geocoder: Arc::new(geocoder),
            locator: Arc::new(locator),
        }
    }

    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_millis(self.config.resolver.geolocation_timeout_ms)
    }
}
