//! Location resolution
//!
//! [`LocationResolver`] owns the one authoritative selection and reconciles
//! three input channels onto it:
//! - map clicks, applied immediately and enriched with a reverse lookup
//! - typed searches, debounced and resolved with a forward lookup
//! - device position requests, bounded by a timeout and then enriched
//!
//! Every request is stamped with a [`Sequence`] when it is issued. Lookups
//! run as spawned tasks that only do I/O and post a tagged [`Completion`]
//! back; the resolver applies a completion only if its stamp is still the
//! newest on its channel and newer than whatever was last applied. The last
//! request issued wins, never the last one to finish.
//!
//! All state changes happen on the task that owns the resolver. Drive
//! completions with [`LocationResolver::next_completion`] or
//! [`LocationResolver::settle`]. A tokio runtime must be running.

pub mod request;
pub mod state;

#[cfg(test)]
mod tests;

pub use request::{Channel, RequestKind, ResolutionRequest, Sequence};
pub use state::{BusyFlags, Notice, NoticeKind, ResolverSnapshot, ResolverState};

use crate::config::Config;
use crate::coord::{Coordinates, Location};
use crate::error::{Error, Result};
use crate::geo::{GeocodeClient, GeolocationSource};
use crate::map::{MapEvent, MapSurface};
use request::ChannelMarks;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Construction options
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Selection to start from, e.g. when editing an existing report
    pub initial_location: Option<Location>,
    /// Quiet period before a typed query is looked up
    pub debounce: Duration,
    pub geolocation_timeout: Duration,
    pub high_accuracy: bool,
    /// Zoom used when flying to a selection
    pub zoom: f64,
    /// Viewport when nothing is selected
    pub initial_center: Coordinates,
    pub initial_zoom: f64,
    pub container: String,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ResolverOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            initial_location: None,
            debounce: Duration::from_millis(config.resolver.debounce_ms),
            geolocation_timeout: Duration::from_millis(config.resolver.geolocation_timeout_ms),
            high_accuracy: config.resolver.high_accuracy,
            zoom: config.resolver.zoom,
            initial_center: Coordinates::new(config.map.center_lat, config.map.center_lng),
            initial_zoom: config.map.zoom,
            container: config.map.container.clone(),
        }
    }

    pub fn with_initial_location(mut self, location: Option<Location>) -> Self {
        self.initial_location = location;
        self
    }
}

/// A user intent, as forwarded by the view
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    MapClick(Coordinates),
    /// The search box now contains this text
    SearchInput(String),
    Geolocate,
    ClearSelection,
    DismissNotice,
}

/// Result of an async step, tagged with the request it belongs to
#[derive(Debug)]
enum Completion {
    DebounceElapsed {
        generation: u64,
    },
    Search {
        sequence: Sequence,
        query: String,
        result: Result<Vec<Location>>,
    },
    Position {
        sequence: Sequence,
        result: Result<Location>,
    },
    Enrichment {
        sequence: Sequence,
        result: Result<Location>,
    },
}

struct PendingDebounce {
    generation: u64,
    handle: JoinHandle<()>,
}

type SelectionCallback = Box<dyn FnMut(Location) + Send>;

/// The location picker's coordinator
pub struct LocationResolver<G, L, M>
where
    G: GeocodeClient + 'static,
    L: GeolocationSource + 'static,
    M: MapSurface,
{
    geocoder: Arc<G>,
    locator: Arc<L>,
    map: M,
    options: ResolverOptions,
    state: ResolverState,
    last_issued: Sequence,
    marks: ChannelMarks,
    debounce: Option<PendingDebounce>,
    debounce_generation: u64,
    /// Spawned lookups whose completion has not been processed yet
    outstanding: usize,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    on_selected: Option<SelectionCallback>,
    torn_down: bool,
}

impl<G, L, M> LocationResolver<G, L, M>
where
    G: GeocodeClient + 'static,
    L: GeolocationSource + 'static,
    M: MapSurface,
{
    /// Mount the picker: initialize the map and seed the state
    pub fn mount(geocoder: Arc<G>, locator: Arc<L>, mut map: M, options: ResolverOptions) -> Result<Self> {
        match &options.initial_location {
            Some(location) => {
                map.initialize(&options.container, location.coords(), options.zoom)?;
                map.set_marker(location.coords());
            }
            None => {
                map.initialize(&options.container, options.initial_center, options.initial_zoom)?;
            }
        }

        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            geocoder,
            locator,
            map,
            state: ResolverState::new(options.initial_location.clone()),
            options,
            last_issued: Sequence::ZERO,
            marks: ChannelMarks::default(),
            debounce: None,
            debounce_generation: 0,
            outstanding: 0,
            tx,
            rx,
            on_selected: None,
            torn_down: false,
        })
    }

    /// Register the consuming form's callback
    ///
    /// Called with a copy of the selection every time it changes.
    pub fn on_location_selected<F>(mut self, callback: F) -> Self
    where
        F: FnMut(Location) + Send + 'static,
    {
        self.on_selected = Some(Box::new(callback));
        self
    }

    pub fn current(&self) -> Option<&Location> {
        self.state.current.as_ref()
    }

    pub fn state(&self) -> &ResolverState {
        &self.state
    }

    pub fn snapshot(&self) -> ResolverSnapshot {
        self.state.snapshot()
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// True when no lookup or debounce timer is pending
    pub fn is_idle(&self) -> bool {
        self.outstanding == 0 && self.debounce.is_none()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn dispatch(&mut self, intent: Intent) {
        match intent {
            Intent::MapClick(coords) => self.click(coords),
            Intent::SearchInput(text) => self.type_search(text),
            Intent::Geolocate => self.geolocate(),
            Intent::ClearSelection => self.clear_selection(),
            Intent::DismissNotice => self.dismiss_notice(),
        }
    }

    pub fn handle_map_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::Click { coords } => self.click(coords),
        }
    }

    /// Select a clicked point: applied now, labelled later
    pub fn click(&mut self, coords: Coordinates) {
        if self.torn_down {
            return;
        }
        let location = match Location::from_coords(coords) {
            Ok(location) => location,
            Err(e) => {
                warn!("Ignoring map click: {}", e);
                return;
            }
        };

        let request = self.issue(RequestKind::MapClick { coords });
        self.apply(request.sequence, location);
        self.spawn_enrichment(request.sequence, coords);
    }

    /// Select a known location, e.g. a restored draft
    ///
    /// Enrichment runs only when the location has no label yet.
    pub fn select(&mut self, location: Location) {
        if self.torn_down {
            return;
        }
        let coords = location.coords();
        let needs_label = location.label().is_none();

        let request = self.issue(RequestKind::MapClick { coords });
        self.apply(request.sequence, location);
        if needs_label {
            self.spawn_enrichment(request.sequence, coords);
        }
    }

    /// Record new search box contents and restart the debounce timer
    pub fn type_search(&mut self, text: impl Into<String>) {
        if self.torn_down {
            return;
        }
        self.state.pending_search_text = text.into();

        if let Some(pending) = self.debounce.take() {
            debug!("Debounce reset (generation {})", pending.generation);
            pending.handle.abort();
        }

        self.debounce_generation += 1;
        let generation = self.debounce_generation;
        let delay = self.options.debounce;
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Completion::DebounceElapsed { generation });
        });
        self.debounce = Some(PendingDebounce { generation, handle });
    }

    /// Ask the device where it is
    pub fn geolocate(&mut self) {
        if self.torn_down {
            return;
        }
        let request = self.issue(RequestKind::Geolocate);
        self.state.busy.locating = true;

        let locator = Arc::clone(&self.locator);
        let timeout = self.options.geolocation_timeout;
        let high_accuracy = self.options.high_accuracy;
        let sequence = request.sequence;
        self.spawn(async move {
            let result = tokio::time::timeout(timeout, locator.current_position(timeout, high_accuracy))
                .await
                .unwrap_or(Err(Error::GeolocationTimeout(timeout)));
            Completion::Position { sequence, result }
        });
    }

    /// Drop the selection and invalidate everything in flight
    pub fn clear_selection(&mut self) {
        if self.torn_down {
            return;
        }
        self.last_issued = self.last_issued.next();
        self.state.last_applied_sequence = self.last_issued;
        if self.state.current.take().is_some() {
            self.map.remove_marker();
            info!("Selection cleared");
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.state.notice = None;
    }

    /// Wait for and apply the next completion
    ///
    /// Returns false immediately when nothing is pending.
    pub async fn next_completion(&mut self) -> bool {
        if self.is_idle() || self.torn_down {
            return false;
        }
        match self.rx.recv().await {
            Some(completion) => {
                self.handle_completion(completion);
                true
            }
            None => false,
        }
    }

    /// Process completions until nothing is pending
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    /// Unmount: release the map and ignore every later completion
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if let Some(pending) = self.debounce.take() {
            pending.handle.abort();
        }
        self.outstanding = 0;
        self.state.busy = BusyFlags::default();
        self.rx.close();
        self.map.destroy();
        debug!("Resolver torn down at {}", self.last_issued);
    }

    fn issue(&mut self, kind: RequestKind) -> ResolutionRequest {
        self.last_issued = self.last_issued.next();
        let request = ResolutionRequest {
            sequence: self.last_issued,
            kind,
        };
        self.marks.raise(request.channel(), request.sequence);
        debug!("Issued {} request {}", request.channel(), request.sequence);
        request
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = Completion> + Send + 'static,
    {
        self.outstanding += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(task.await);
        });
    }

    fn spawn_enrichment(&mut self, sequence: Sequence, coords: Coordinates) {
        let geocoder = Arc::clone(&self.geocoder);
        self.spawn(async move {
            let result = geocoder.reverse_lookup(coords).await;
            Completion::Enrichment { sequence, result }
        });
    }

    fn issue_search(&mut self) {
        let query = self.state.pending_search_text.trim().to_string();
        if query.is_empty() {
            debug!("Search box is blank, nothing to look up");
            return;
        }

        let request = self.issue(RequestKind::Search {
            query: query.clone(),
        });
        self.state.busy.searching = true;

        let geocoder = Arc::clone(&self.geocoder);
        let sequence = request.sequence;
        self.spawn(async move {
            let result = geocoder.forward_lookup(&query).await;
            Completion::Search {
                sequence,
                query,
                result,
            }
        });
    }

    /// Make `location` the selection and push it to the map and the form
    fn apply(&mut self, sequence: Sequence, location: Location) {
        self.state.last_applied_sequence = sequence;
        if self.state.notice.is_some() && self.state.notice_sequence < sequence {
            debug!("Clearing notice from {}", self.state.notice_sequence);
            self.state.notice = None;
        }
        let moved = self
            .state
            .current
            .as_ref()
            .map_or(true, |current| current.coords() != location.coords());
        if moved {
            self.map.set_marker(location.coords());
            self.map.fly_to(location.coords(), self.options.zoom);
        }

        info!("Selected {} ({})", location, sequence);
        self.state.current = Some(location.clone());
        self.notify(location);
    }

    fn notify(&mut self, location: Location) {
        if let Some(callback) = self.on_selected.as_mut() {
            callback(location);
        }
    }

    fn raise_notice(&mut self, sequence: Sequence, err: &Error, fallback: NoticeKind) {
        warn!("{}", err);
        self.state.notice = Some(Notice::from_error(err, fallback));
        self.state.notice_sequence = sequence;
    }

    /// True when a primary result stamped `sequence` may replace `current`
    fn is_applicable(&self, channel: Channel, sequence: Sequence) -> bool {
        self.marks.is_latest(channel, sequence) && sequence > self.state.last_applied_sequence
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::DebounceElapsed { generation } => {
                match self.debounce.take() {
                    Some(pending) if pending.generation == generation => self.issue_search(),
                    other => {
                        debug!("Ignoring stale debounce timer (generation {})", generation);
                        self.debounce = other;
                    }
                }
            }
            Completion::Search {
                sequence,
                query,
                result,
            } => {
                self.outstanding = self.outstanding.saturating_sub(1);
                self.finish_search(sequence, query, result);
            }
            Completion::Position { sequence, result } => {
                self.outstanding = self.outstanding.saturating_sub(1);
                self.finish_geolocate(sequence, result);
            }
            Completion::Enrichment { sequence, result } => {
                self.outstanding = self.outstanding.saturating_sub(1);
                self.finish_enrichment(sequence, result);
            }
        }
    }

    fn finish_search(&mut self, sequence: Sequence, query: String, result: Result<Vec<Location>>) {
        if self.marks.is_latest(Channel::Search, sequence) {
            self.state.busy.searching = false;
        }
        if !self.is_applicable(Channel::Search, sequence) {
            debug!("Discarding superseded search {} for '{}'", sequence, query);
            return;
        }

        match result {
            Ok(candidates) => match candidates.into_iter().next() {
                Some(best) => {
                    self.apply(sequence, best);
                    if self.state.pending_search_text.trim() == query {
                        self.state.pending_search_text.clear();
                    }
                }
                None => self.raise_notice(
                    sequence,
                    &Error::GeocodeNotFound(query),
                    NoticeKind::GeocodeNotFound,
                ),
            },
            Err(e) => self.raise_notice(sequence, &e, NoticeKind::GeocodeUnavailable),
        }
    }

    fn finish_geolocate(&mut self, sequence: Sequence, result: Result<Location>) {
        if self.marks.is_latest(Channel::Geolocate, sequence) {
            self.state.busy.locating = false;
        }
        if !self.is_applicable(Channel::Geolocate, sequence) {
            debug!("Discarding superseded position {}", sequence);
            return;
        }

        match result {
            Ok(location) => {
                let coords = location.coords();
                self.apply(sequence, location);
                self.spawn_enrichment(sequence, coords);
            }
            Err(e) => self.raise_notice(sequence, &e, NoticeKind::GeolocationUnavailable),
        }
    }

    fn finish_enrichment(&mut self, sequence: Sequence, result: Result<Location>) {
        if sequence != self.state.last_applied_sequence {
            debug!("Discarding label for superseded request {}", sequence);
            return;
        }

        let enriched = match result {
            Ok(enriched) => enriched,
            Err(e) => {
                debug!("Reverse lookup failed, keeping bare coordinate: {}", e);
                return;
            }
        };

        let Some(current) = self.state.current.as_ref() else {
            return;
        };
        if enriched.label().is_none() || current.label() == enriched.label() {
            return;
        }

        let labelled = current.clone().with_label(enriched.label());
        info!("Labelled {} ({})", labelled, sequence);
        self.state.current = Some(labelled.clone());
        self.notify(labelled);
    }
}

impl<G, L, M> Drop for LocationResolver<G, L, M>
where
    G: GeocodeClient + 'static,
    L: GeolocationSource + 'static,
    M: MapSurface,
{
    fn drop(&mut self) {
        self.teardown();
    }
}
