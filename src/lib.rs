//! location-picker: map, search and device-position location picker
//!
//! The core of a location-picking widget. A user selects a point by
//! clicking a map, typing an address, or asking for the device position;
//! all three channels resolve to one authoritative [`Location`] owned by a
//! [`LocationResolver`].
//!
//! ## Features
//!
//! - Sequence-stamped requests: the last request issued wins
//! - Debounced forward geocoding of typed text
//! - Reverse geocoding to label clicked points, degrading to bare coordinates
//! - Device position with a hard timeout
//! - Nominatim and ip-api backends, a headless map, CLI and HTTP front-ends
//!
//! ## Quick Start
//!
//! ```no_run
//! use location_picker::config::Config;
//! use location_picker::geo::{get_geocoder, get_position_source};
//! use location_picker::map::HeadlessMap;
//! use location_picker::resolver::{LocationResolver, ResolverOptions};
//! use location_picker::coord::Coordinates;
//! use std::sync::Arc;
//!
//! # async fn demo() -> location_picker::Result<()> {
//! let config = Config::default();
//! let mut resolver = LocationResolver::mount(
//!     Arc::new(get_geocoder(&config)?),
//!     Arc::new(get_position_source(&config)?),
//!     HeadlessMap::new(),
//!     ResolverOptions::from_config(&config),
//! )?
//! .on_location_selected(|location| println!("Selected {}", location));
//!
//! resolver.click(Coordinates::new(40.7128, -74.0060));
//! resolver.settle().await;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod form;
pub mod geo;
pub mod map;
pub mod resolver;
pub mod server;
pub mod view;

// Re-export commonly used types
pub use config::Config;
pub use coord::{Coordinates, Location};
pub use error::{Error, Result};
pub use form::Selection;
pub use resolver::{LocationResolver, ResolverOptions};
