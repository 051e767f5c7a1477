//! HTTP API routes
//!
//! Read-only JSON endpoints over the geocoder and the position source.

use crate::coord::{Coordinates, Location};
use crate::error::Error;
use crate::geo::{GeocodeClient, GeolocationSource};
use crate::server::state::AppState;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Create the API router
pub fn create_router<G, L>(state: Arc<AppState<G, L>>) -> Router
where
    G: GeocodeClient + 'static,
    L: GeolocationSource + 'static,
{
    Router::new()
        .route("/api/geocode/search", get(search_handler::<G, L>))
        .route("/api/geocode/reverse", get(reverse_handler::<G, L>))
        .route("/api/location", get(location_handler::<G, L>))
        .route("/api/status", get(status_handler::<G, L>))
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::GeocodeNotFound(_) => (StatusCode::NOT_FOUND, "GEOCODE_NOT_FOUND"),
            Error::GeocodeUnavailable(_) => (StatusCode::BAD_GATEWAY, "GEOCODE_UNAVAILABLE"),
            Error::GeolocationDenied(_) => (StatusCode::FORBIDDEN, "GEOLOCATION_DENIED"),
            Error::GeolocationTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, "GEOLOCATION_TIMEOUT"),
            Error::GeolocationUnavailable(_) => {
                (StatusCode::BAD_GATEWAY, "GEOLOCATION_UNAVAILABLE")
            }
            Error::InvalidCoordinates(_) => (StatusCode::BAD_REQUEST, "INVALID_COORDINATES"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        if status.is_server_error() {
            warn!("Request failed: {}", err);
        }
        ApiError::new(status, code, err.to_string())
    }
}

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Search results
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<Location>,
}

/// Forward geocode free text
///
/// GET /api/geocode/search?q=...
async fn search_handler<G: GeocodeClient, L: GeolocationSource>(
    State(state): State<Arc<AppState<G, L>>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "INVALID_QUERY",
            "Query must not be empty",
        ));
    }

    let results = state.geocoder.forward_lookup(query).await?;
    if results.is_empty() {
        return Err(Error::GeocodeNotFound(query.to_string()).into());
    }

    Ok(Json(SearchResponse { results }))
}

/// Reverse query parameters
#[derive(Debug, Deserialize)]
pub struct ReverseParams {
    pub lat: f64,
    pub lng: f64,
}

/// Label a point
///
/// GET /api/geocode/reverse?lat=..&lng=..
async fn reverse_handler<G: GeocodeClient, L: GeolocationSource>(
    State(state): State<Arc<AppState<G, L>>>,
    Query(params): Query<ReverseParams>,
) -> Result<Json<Location>, ApiError> {
    let coords = Coordinates::new(params.lat, params.lng);
    coords.validate()?;

    let location = state.geocoder.reverse_lookup(coords).await?;
    Ok(Json(location))
}

/// Current device position
///
/// GET /api/location
async fn location_handler<G: GeocodeClient, L: GeolocationSource>(
    State(state): State<Arc<AppState<G, L>>>,
) -> Result<Json<Location>, ApiError> {
    let location = state
        .locator
        .current_position(state.geolocation_timeout(), state.config.resolver.high_accuracy)
        .await?;
    Ok(Json(location))
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Geocoding backend name
    pub geocoder: String,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler<G: GeocodeClient, L: GeolocationSource>(
    State(state): State<Arc<AppState<G, L>>>,
) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        geocoder: state.geocoder.name().to_string(),
    })
}
