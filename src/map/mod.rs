//! Map surface contract
//!
//! The resolver drives a map through a handful of imperative commands and
//! receives clicks back as [`MapEvent`]s. Rendering, tiles, pan and zoom
//! gestures all stay on the other side of this trait.

pub mod headless;

pub use headless::HeadlessMap;

use crate::coord::Coordinates;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Commands a map surface accepts
///
/// Implementations own a single marker: `set_marker` replaces it.
pub trait MapSurface {
    /// Mount the map into `container` with an initial viewport
    fn initialize(&mut self, container: &str, center: Coordinates, zoom: f64) -> Result<()>;

    /// Place the marker, creating it if absent and moving it otherwise
    fn set_marker(&mut self, coords: Coordinates);

    fn remove_marker(&mut self);

    /// Recenter the viewport on `coords` at `zoom`
    fn fly_to(&mut self, coords: Coordinates, zoom: f64);

    /// Release the surface. No command is honoured afterwards.
    fn destroy(&mut self);
}

/// Events a map surface emits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapEvent {
    /// The user clicked the map at a coordinate
    Click { coords: Coordinates },
}
