//! Geographic value types
//!
//! `Coordinates` is a bare point; `Location` is a validated point with an
//! optional human-readable label. Both are plain values: copying or cloning
//! them never shares state with the resolver that produced them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || self.lat < -90.0 || self.lat > 90.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !self.lng.is_finite() || self.lng < -180.0 || self.lng > 180.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// A selected or looked-up place
///
/// Always geometrically valid. The label is best-effort metadata and is
/// `None` whenever reverse geocoding failed or was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct Location {
    lat: f64,
    lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

/// Unchecked wire shape, validated on the way into `Location`
#[derive(Deserialize)]
struct RawLocation {
    lat: f64,
    lng: f64,
    #[serde(default)]
    label: Option<String>,
}

impl TryFrom<RawLocation> for Location {
    type Error = Error;

    fn try_from(raw: RawLocation) -> Result<Self> {
        Ok(Location::new(raw.lat, raw.lng)?.with_label(raw.label))
    }
}

impl Location {
    /// Create an unlabelled location, rejecting out-of-range coordinates
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        Self::from_coords(Coordinates::new(lat, lng))
    }

    pub fn from_coords(coords: Coordinates) -> Result<Self> {
        coords.validate()?;
        Ok(Self {
            lat: coords.lat,
            lng: coords.lng,
            label: None,
        })
    }

    /// Return a copy carrying `label`
    ///
    /// Blank labels are treated as absent.
    pub fn with_label<S: Into<String>>(mut self, label: Option<S>) -> Self {
        self.label = label.map(Into::into).filter(|l| !l.trim().is_empty());
        self
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} ({})", label, self.coords()),
            None => write!(f, "{}", self.coords()),
        }
    }
}
