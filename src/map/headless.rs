//! A map surface without a renderer
//!
//! Keeps the viewport and marker in memory and logs every command it
//! receives. The terminal picker displays it; tests assert against it.

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::map::{MapEvent, MapSurface};
use serde::Serialize;
use tracing::warn;

/// Commands kept in the log; older ones are dropped first
pub const COMMAND_LOG_LIMIT: usize = 256;

/// A command as received by [`HeadlessMap`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum MapCommand {
    Initialize {
        container: String,
        center: Coordinates,
        zoom: f64,
    },
    SetMarker {
        coords: Coordinates,
    },
    RemoveMarker,
    FlyTo {
        coords: Coordinates,
        zoom: f64,
    },
    Destroy,
}

/// In-memory map surface
#[derive(Debug, Default)]
pub struct HeadlessMap {
    container: Option<String>,
    center: Option<Coordinates>,
    zoom: f64,
    marker: Option<Coordinates>,
    destroyed: bool,
    commands: Vec<MapCommand>,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the event a user click at `coords` would emit
    pub fn click(&self, coords: Coordinates) -> MapEvent {
        MapEvent::Click { coords }
    }

    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    pub fn center(&self) -> Option<Coordinates> {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn marker(&self) -> Option<Coordinates> {
        self.marker
    }

    pub fn is_initialized(&self) -> bool {
        self.container.is_some() && !self.destroyed
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// The most recent commands received, oldest first
    pub fn commands(&self) -> &[MapCommand] {
        &self.commands
    }

    /// Returns false (and logs) when the surface can no longer take commands
    fn accepts(&self, command: &MapCommand) -> bool {
        if self.destroyed {
            warn!("Ignoring {:?} on a destroyed map", command);
            return false;
        }
        true
    }

    fn record(&mut self, command: MapCommand) -> bool {
        if !self.accepts(&command) {
            return false;
        }
        if self.commands.len() >= COMMAND_LOG_LIMIT {
            self.commands.remove(0);
        }
        self.commands.push(command);
        true
    }
}

impl MapSurface for HeadlessMap {
    fn initialize(&mut self, container: &str, center: Coordinates, zoom: f64) -> Result<()> {
        if self.destroyed {
            return Err(Error::Config("Map surface was already destroyed".to_string()));
        }
        if self.container.is_some() {
            return Err(Error::Config(format!(
                "Map surface is already mounted in '{}'",
                self.container.as_deref().unwrap_or_default()
            )));
        }
        center.validate()?;

        self.record(MapCommand::Initialize {
            container: container.to_string(),
            center,
            zoom,
        });
        self.container = Some(container.to_string());
        self.center = Some(center);
        self.zoom = zoom;
        Ok(())
    }

    fn set_marker(&mut self, coords: Coordinates) {
        if self.record(MapCommand::SetMarker { coords }) {
            self.marker = Some(coords);
        }
    }

    fn remove_marker(&mut self) {
        if self.record(MapCommand::RemoveMarker) {
            self.marker = None;
        }
    }

    fn fly_to(&mut self, coords: Coordinates, zoom: f64) {
        if self.record(MapCommand::FlyTo { coords, zoom }) {
            self.center = Some(coords);
            self.zoom = zoom;
        }
    }

    fn destroy(&mut self) {
        if self.record(MapCommand::Destroy) {
            self.marker = None;
            self.destroyed = true;
        }
    }
}
