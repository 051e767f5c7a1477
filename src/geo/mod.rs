//! Geocoding and device position
//!
//! Two narrow contracts the resolver depends on:
//! - [`GeocodeClient`]: forward (text to places) and reverse (point to label)
//!   lookups against an external service
//! - [`GeolocationSource`]: a one-shot "where am I" request
//!
//! Both are plain request/response: no retries, and calls cannot be
//! cancelled once sent. Callers that need cancellation discard late results.

pub mod device;
pub mod nominatim;

use crate::config::Config;
use crate::coord::{Coordinates, Location};
use crate::error::Result;
use std::future::Future;
use std::time::Duration;

/// Trait for geocoding backends
pub trait GeocodeClient: Send + Sync {
    /// Short backend name for status output
    fn name(&self) -> &'static str;

    /// Resolve free text to candidate places, best match first
    ///
    /// An empty list is a valid answer meaning "nothing matched".
    fn forward_lookup(&self, query: &str) -> impl Future<Output = Result<Vec<Location>>> + Send;

    /// Resolve a point to a labelled location
    ///
    /// The returned location keeps the queried coordinates. When the service
    /// knows no address there the label is `None` rather than an error.
    fn reverse_lookup(&self, coords: Coordinates) -> impl Future<Output = Result<Location>> + Send;
}

/// Trait for device position providers
pub trait GeolocationSource: Send + Sync {
    /// Short backend name for status output
    fn name(&self) -> &'static str;

    /// Request the current position once
    ///
    /// Fails with `GeolocationTimeout` when no fix arrives within `timeout`,
    /// `GeolocationDenied` when the platform refuses, and
    /// `GeolocationUnavailable` otherwise.
    fn current_position(
        &self,
        timeout: Duration,
        high_accuracy: bool,
    ) -> impl Future<Output = Result<Location>> + Send;
}

/// Build the configured geocoding backend
pub fn get_geocoder(config: &Config) -> Result<nominatim::NominatimClient> {
    nominatim::NominatimClient::new(&config.geocoder)
}

/// Build the configured device position source
pub fn get_position_source(config: &Config) -> Result<device::IpGeolocationSource> {
    device::IpGeolocationSource::new(&config.geolocation)
}
