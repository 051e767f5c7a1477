//! Consuming side of the picker
//!
//! A form field that receives selections from the resolver's callback and
//! hands the final value to whatever submits the form.

use crate::coord::Location;
use crate::error::{Error, Result};
use std::sync::{Arc, Mutex, PoisonError};

/// The location field of a form
#[derive(Debug, Clone, Default)]
pub struct Selection {
    value: Option<Location>,
    updates: usize,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a snapshot delivered by the resolver
    pub fn set(&mut self, location: Location) {
        self.value = Some(location);
        self.updates += 1;
    }

    pub fn value(&self) -> Option<&Location> {
        self.value.as_ref()
    }

    /// How many snapshots have been received
    pub fn updates(&self) -> usize {
        self.updates
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    /// The location to submit, failing when nothing was picked
    pub fn commit(&self) -> Result<Location> {
        self.value.clone().ok_or(Error::InvalidSelection)
    }
}

/// A [`Selection`] shared with a resolver callback
#[derive(Debug, Clone, Default)]
pub struct SharedSelection(Arc<Mutex<Selection>>);

impl SharedSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback suitable for `LocationResolver::on_location_selected`
    pub fn sink(&self) -> impl FnMut(Location) + Send + 'static {
        let inner = Arc::clone(&self.0);
        move |location| {
            inner
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .set(location)
        }
    }

    pub fn get(&self) -> Selection {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub fn commit(&self) -> Result<Location> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).commit()
    }
}
