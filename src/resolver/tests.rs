//! Resolver scenarios against scripted collaborators
//!
//! All tests run on a paused clock: spawned lookups sleep for their scripted
//! latency and tokio advances time whenever every task is waiting, so
//! completion order is fully determined by the scripts.

use super::*;
use crate::map::HeadlessMap;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[derive(Clone)]
enum Forward {
    Found(Vec<Location>),
    Empty,
    Unavailable,
}

#[derive(Clone)]
enum Reverse {
    Label(&'static str),
    NoAddress,
    Unavailable,
}

/// Geocoder with per-query and per-point scripted answers and latencies
#[derive(Default)]
struct FakeGeocoder {
    forward: Mutex<HashMap<String, (Duration, Forward)>>,
    reverse: Mutex<HashMap<String, (Duration, Reverse)>>,
    forward_calls: Mutex<Vec<String>>,
    reverse_calls: Mutex<Vec<Coordinates>>,
}

fn point_key(coords: Coordinates) -> String {
    format!("{},{}", coords.lat, coords.lng)
}

impl FakeGeocoder {
    fn with_forward(self, query: &str, latency: Duration, answer: Forward) -> Self {
        self.forward
            .lock()
            .unwrap()
            .insert(query.to_string(), (latency, answer));
        self
    }

    fn with_reverse(self, lat: f64, lng: f64, latency: Duration, answer: Reverse) -> Self {
        self.reverse
            .lock()
            .unwrap()
            .insert(point_key(Coordinates::new(lat, lng)), (latency, answer));
        self
    }

    fn forward_calls(&self) -> Vec<String> {
        self.forward_calls.lock().unwrap().clone()
    }

    fn reverse_calls(&self) -> Vec<Coordinates> {
        self.reverse_calls.lock().unwrap().clone()
    }
}

impl GeocodeClient for FakeGeocoder {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn forward_lookup(&self, query: &str) -> Result<Vec<Location>> {
        self.forward_calls.lock().unwrap().push(query.to_string());
        let scripted = self.forward.lock().unwrap().get(query).cloned();
        let (latency, answer) = scripted.unwrap_or((ms(10), Forward::Empty));

        tokio::time::sleep(latency).await;
        match answer {
            Forward::Found(candidates) => Ok(candidates),
            Forward::Empty => Ok(Vec::new()),
            Forward::Unavailable => Err(Error::GeocodeUnavailable("scripted outage".to_string())),
        }
    }

    async fn reverse_lookup(&self, coords: Coordinates) -> Result<Location> {
        self.reverse_calls.lock().unwrap().push(coords);
        let scripted = self.reverse.lock().unwrap().get(&point_key(coords)).cloned();
        let (latency, answer) = scripted.unwrap_or((ms(10), Reverse::NoAddress));

        tokio::time::sleep(latency).await;
        let location = Location::from_coords(coords)?;
        match answer {
            Reverse::Label(label) => Ok(location.with_label(Some(label))),
            Reverse::NoAddress => Ok(location),
            Reverse::Unavailable => Err(Error::GeocodeUnavailable("scripted outage".to_string())),
        }
    }
}

#[derive(Clone)]
enum Fix {
    At(Location),
    Denied,
    /// Never answers on its own
    Hang,
}

/// Device position source answering from a queue of scripted fixes
#[derive(Default)]
struct FakeLocator {
    fixes: Mutex<VecDeque<(Duration, Fix)>>,
    calls: Mutex<Vec<(Duration, bool)>>,
}

impl FakeLocator {
    fn then(self, latency: Duration, fix: Fix) -> Self {
        self.fixes.lock().unwrap().push_back((latency, fix));
        self
    }
}

impl GeolocationSource for FakeLocator {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn current_position(&self, timeout: Duration, high_accuracy: bool) -> Result<Location> {
        self.calls.lock().unwrap().push((timeout, high_accuracy));
        let next = self.fixes.lock().unwrap().pop_front();
        let (latency, fix) = next.unwrap_or((ms(10), Fix::Denied));

        tokio::time::sleep(latency).await;
        match fix {
            Fix::At(location) => Ok(location),
            Fix::Denied => Err(Error::GeolocationDenied("scripted refusal".to_string())),
            Fix::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(Error::GeolocationUnavailable("gave up".to_string()))
            }
        }
    }
}

type TestResolver = LocationResolver<FakeGeocoder, FakeLocator, HeadlessMap>;

struct Harness {
    resolver: TestResolver,
    geocoder: Arc<FakeGeocoder>,
    locator: Arc<FakeLocator>,
    selected: Arc<Mutex<Vec<Location>>>,
}

fn mount_with(geocoder: FakeGeocoder, locator: FakeLocator, options: ResolverOptions) -> Harness {
    let geocoder = Arc::new(geocoder);
    let locator = Arc::new(locator);
    let selected = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&selected);

    let resolver = LocationResolver::mount(
        Arc::clone(&geocoder),
        Arc::clone(&locator),
        HeadlessMap::new(),
        options,
    )
    .unwrap()
    .on_location_selected(move |location| sink.lock().unwrap().push(location));

    Harness {
        resolver,
        geocoder,
        locator,
        selected,
    }
}

fn mount(geocoder: FakeGeocoder, locator: FakeLocator) -> Harness {
    mount_with(geocoder, locator, ResolverOptions::default())
}

fn loc(lat: f64, lng: f64, label: Option<&str>) -> Location {
    Location::new(lat, lng).unwrap().with_label(label)
}

impl Harness {
    fn current(&self) -> Option<Location> {
        self.resolver.current().cloned()
    }

    fn selected(&self) -> Vec<Location> {
        self.selected.lock().unwrap().clone()
    }
}

#[tokio::test(start_paused = true)]
async fn test_search_scenario_applies_first_candidate() {
    let geocoder = FakeGeocoder::default().with_forward(
        "Main Street",
        ms(200),
        Forward::Found(vec![
            loc(40.0, -73.0, Some("123 Main Street")),
            loc(41.0, -72.0, Some("Main Street, Elsewhere")),
        ]),
    );
    let mut h = mount(geocoder, FakeLocator::default());
    assert!(h.current().is_none());

    h.resolver.type_search("Main Street");
    assert_eq!(h.resolver.state().pending_search_text, "Main Street");
    h.resolver.settle().await;

    assert_eq!(h.geocoder.forward_calls(), vec!["Main Street"]);
    assert_eq!(h.current(), Some(loc(40.0, -73.0, Some("123 Main Street"))));
    assert_eq!(h.resolver.map().marker(), Some(Coordinates::new(40.0, -73.0)));
    assert_eq!(h.resolver.map().center(), Some(Coordinates::new(40.0, -73.0)));
    assert_eq!(h.resolver.map().zoom(), h.resolver.options().zoom);
    assert_eq!(h.resolver.state().pending_search_text, "");
    assert!(!h.resolver.state().busy.searching);
    assert!(h.resolver.state().notice.is_none());
    assert_eq!(h.selected(), vec![loc(40.0, -73.0, Some("123 Main Street"))]);
}

#[tokio::test(start_paused = true)]
async fn test_debounce_sends_only_final_text() {
    let geocoder = FakeGeocoder::default().with_forward(
        "Main Street",
        ms(50),
        Forward::Found(vec![loc(40.0, -73.0, Some("123 Main Street"))]),
    );
    let mut h = mount(geocoder, FakeLocator::default());

    for text in ["M", "Ma", "Main", "Main S", "Main Street"] {
        h.resolver.type_search(text);
        tokio::time::advance(ms(200)).await;
    }
    assert!(h.geocoder.forward_calls().is_empty());

    tokio::time::advance(ms(250)).await;
    assert!(h.geocoder.forward_calls().is_empty());

    h.resolver.settle().await;
    assert_eq!(h.geocoder.forward_calls(), vec!["Main Street"]);
}

#[tokio::test(start_paused = true)]
async fn test_blank_search_issues_nothing() {
    let mut h = mount(FakeGeocoder::default(), FakeLocator::default());

    h.resolver.type_search("   ");
    h.resolver.settle().await;

    assert!(h.geocoder.forward_calls().is_empty());
    assert!(!h.resolver.state().busy.searching);
    assert!(h.resolver.is_idle());
}

#[tokio::test(start_paused = true)]
async fn test_search_not_found_raises_notice_and_keeps_selection() {
    let geocoder = FakeGeocoder::default()
        .with_forward("Atlantis", ms(100), Forward::Empty)
        .with_reverse(10.5, 20.5, ms(10), Reverse::Label("Harbour Road"));
    let mut h = mount(geocoder, FakeLocator::default());

    h.resolver.click(Coordinates::new(10.5, 20.5));
    h.resolver.settle().await;
    let before = h.current();

    h.resolver.type_search("Atlantis");
    h.resolver.settle().await;

    assert_eq!(h.current(), before);
    assert_eq!(h.resolver.state().pending_search_text, "Atlantis");
    let notice = h.resolver.state().notice.clone().unwrap();
    assert_eq!(notice.kind, NoticeKind::GeocodeNotFound);
    assert!(notice.message.contains("Atlantis"));
    assert!(!h.resolver.state().busy.searching);

    h.resolver.dismiss_notice();
    assert!(h.resolver.state().notice.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_later_selection_clears_older_notice() {
    let geocoder = FakeGeocoder::default()
        .with_forward("Atlantis", ms(100), Forward::Empty)
        .with_forward(
            "Main Street",
            ms(100),
            Forward::Found(vec![loc(40.0, -73.0, Some("123 Main Street"))]),
        );
    let mut h = mount(geocoder, FakeLocator::default());

    h.resolver.type_search("Atlantis");
    h.resolver.settle().await;
    assert_eq!(
        h.resolver.state().notice.as_ref().map(|n| n.kind),
        Some(NoticeKind::GeocodeNotFound)
    );

    h.resolver.type_search("Main Street");
    h.resolver.settle().await;

    assert_eq!(h.current(), Some(loc(40.0, -73.0, Some("123 Main Street"))));
    assert!(h.resolver.state().notice.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_search_outage_raises_notice() {
    let geocoder = FakeGeocoder::default().with_forward("Main Street", ms(100), Forward::Unavailable);
    let mut h = mount(geocoder, FakeLocator::default());

    h.resolver.type_search("Main Street");
    h.resolver.settle().await;

    assert!(h.current().is_none());
    assert_eq!(
        h.resolver.state().notice.as_ref().map(|n| n.kind),
        Some(NoticeKind::GeocodeUnavailable)
    );
}

#[tokio::test(start_paused = true)]
async fn test_click_applies_immediately_then_labels() {
    let geocoder =
        FakeGeocoder::default().with_reverse(10.5, 20.5, ms(300), Reverse::Label("Harbour Road"));
    let mut h = mount(geocoder, FakeLocator::default());

    h.resolver.click(Coordinates::new(10.5, 20.5));

    assert_eq!(h.current(), Some(loc(10.5, 20.5, None)));
    assert_eq!(h.resolver.map().marker(), Some(Coordinates::new(10.5, 20.5)));

    h.resolver.settle().await;

    assert_eq!(h.current(), Some(loc(10.5, 20.5, Some("Harbour Road"))));
    assert_eq!(
        h.selected(),
        vec![loc(10.5, 20.5, None), loc(10.5, 20.5, Some("Harbour Road"))]
    );
}

#[tokio::test(start_paused = true)]
async fn test_click_with_failed_reverse_lookup_degrades_silently() {
    let geocoder = FakeGeocoder::default().with_reverse(10.5, 20.5, ms(50), Reverse::Unavailable);
    let mut h = mount(geocoder, FakeLocator::default());

    h.resolver.handle_map_event(h.resolver.map().click(Coordinates::new(10.5, 20.5)));
    h.resolver.settle().await;

    assert_eq!(h.current(), Some(loc(10.5, 20.5, None)));
    assert_eq!(h.resolver.map().marker(), Some(Coordinates::new(10.5, 20.5)));
    assert!(h.resolver.state().notice.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_invalid_click_is_ignored() {
    let mut h = mount(FakeGeocoder::default(), FakeLocator::default());

    h.resolver.click(Coordinates::new(95.0, 0.0));

    assert!(h.current().is_none());
    assert!(h.resolver.is_idle());
    assert!(h.geocoder.reverse_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_superseded_enrichment_is_discarded() {
    // A's label arrives first, while B is already the selection.
    let geocoder = FakeGeocoder::default()
        .with_reverse(1.0, 1.0, ms(100), Reverse::Label("Label A"))
        .with_reverse(2.0, 2.0, ms(300), Reverse::Label("Label B"));
    let mut h = mount(geocoder, FakeLocator::default());

    h.resolver.click(Coordinates::new(1.0, 1.0));
    h.resolver.click(Coordinates::new(2.0, 2.0));

    assert!(h.resolver.next_completion().await);
    assert_eq!(h.current(), Some(loc(2.0, 2.0, None)));

    h.resolver.settle().await;
    assert_eq!(h.current(), Some(loc(2.0, 2.0, Some("Label B"))));
    assert!(h.selected().iter().all(|l| l.label() != Some("Label A")));
}

#[tokio::test(start_paused = true)]
async fn test_late_enrichment_for_earlier_click_is_discarded() {
    // A's label arrives last, after B has been labelled.
    let geocoder = FakeGeocoder::default()
        .with_reverse(1.0, 1.0, ms(500), Reverse::Label("Label A"))
        .with_reverse(2.0, 2.0, ms(100), Reverse::Label("Label B"));
    let mut h = mount(geocoder, FakeLocator::default());

    h.resolver.click(Coordinates::new(1.0, 1.0));
    h.resolver.click(Coordinates::new(2.0, 2.0));
    h.resolver.settle().await;

    assert_eq!(h.current(), Some(loc(2.0, 2.0, Some("Label B"))));
}

#[tokio::test(start_paused = true)]
async fn test_click_supersedes_in_flight_search() {
    let geocoder = FakeGeocoder::default()
        .with_forward(
            "Main Street",
            ms(1000),
            Forward::Found(vec![loc(40.0, -73.0, Some("123 Main Street"))]),
        )
        .with_reverse(10.5, 20.5, ms(50), Reverse::Label("Harbour Road"));
    let mut h = mount(geocoder, FakeLocator::default());

    h.resolver.type_search("Main Street");
    // Debounce fires and the lookup goes out.
    assert!(h.resolver.next_completion().await);
    assert!(h.resolver.state().busy.searching);

    h.resolver.click(Coordinates::new(10.5, 20.5));
    h.resolver.settle().await;

    assert_eq!(h.current(), Some(loc(10.5, 20.5, Some("Harbour Road"))));
    assert_eq!(h.resolver.map().marker(), Some(Coordinates::new(10.5, 20.5)));
    assert!(!h.resolver.state().busy.searching);
    assert_eq!(h.resolver.state().pending_search_text, "Main Street");
}

#[tokio::test(start_paused = true)]
async fn test_newer_search_wins_over_slower_older_search() {
    let geocoder = FakeGeocoder::default()
        .with_forward("Old Town", ms(2000), Forward::Found(vec![loc(1.0, 1.0, Some("Old Town"))]))
        .with_forward("New Town", ms(100), Forward::Found(vec![loc(2.0, 2.0, Some("New Town"))]));
    let mut h = mount(geocoder, FakeLocator::default());

    h.resolver.type_search("Old Town");
    assert!(h.resolver.next_completion().await);
    h.resolver.type_search("New Town");
    h.resolver.settle().await;

    assert_eq!(h.geocoder.forward_calls(), vec!["Old Town", "New Town"]);
    assert_eq!(h.current(), Some(loc(2.0, 2.0, Some("New Town"))));
    assert!(!h.resolver.state().busy.searching);
}

#[tokio::test(start_paused = true)]
async fn test_older_search_still_searching_while_newer_pending() {
    let geocoder = FakeGeocoder::default()
        .with_forward("Old Town", ms(800), Forward::Found(vec![loc(1.0, 1.0, Some("Old Town"))]))
        .with_forward("New Town", ms(2000), Forward::Found(vec![loc(2.0, 2.0, Some("New Town"))]));
    let mut h = mount(geocoder, FakeLocator::default());

    h.resolver.type_search("Old Town");
    assert!(h.resolver.next_completion().await);
    h.resolver.type_search("New Town");
    // Second debounce fires, then the old result lands and is discarded.
    assert!(h.resolver.next_completion().await);
    assert!(h.resolver.next_completion().await);

    assert!(h.current().is_none());
    assert!(h.resolver.state().busy.searching);

    h.resolver.settle().await;
    assert_eq!(h.current(), Some(loc(2.0, 2.0, Some("New Town"))));
    assert!(!h.resolver.state().busy.searching);
}

#[tokio::test(start_paused = true)]
async fn test_text_typed_during_lookup_is_kept() {
    let geocoder = FakeGeocoder::default().with_forward(
        "Main Street",
        ms(100),
        Forward::Found(vec![loc(40.0, -73.0, Some("123 Main Street"))]),
    );
    let mut h = mount(geocoder, FakeLocator::default());

    h.resolver.type_search("Main Street");
    assert!(h.resolver.next_completion().await);
    h.resolver.type_search("Main Street 12");
    assert!(h.resolver.next_completion().await);

    assert_eq!(h.current(), Some(loc(40.0, -73.0, Some("123 Main Street"))));
    assert_eq!(h.resolver.state().pending_search_text, "Main Street 12");
}

#[tokio::test(start_paused = true)]
async fn test_geolocate_applies_and_enriches() {
    let geocoder =
        FakeGeocoder::default().with_reverse(52.52, 13.405, ms(50), Reverse::Label("Alexanderplatz"));
    let locator = FakeLocator::default().then(ms(300), Fix::At(loc(52.52, 13.405, Some("Berlin"))));
    let mut h = mount(geocoder, locator);

    h.resolver.geolocate();
    assert!(h.resolver.state().busy.locating);

    assert!(h.resolver.next_completion().await);
    assert_eq!(h.current(), Some(loc(52.52, 13.405, Some("Berlin"))));
    assert_eq!(h.resolver.map().marker(), Some(Coordinates::new(52.52, 13.405)));
    assert!(!h.resolver.state().busy.locating);

    h.resolver.settle().await;
    assert_eq!(h.current(), Some(loc(52.52, 13.405, Some("Alexanderplatz"))));

    let calls = h.locator.calls.lock().unwrap().clone();
    assert_eq!(calls, vec![(ms(5000), true)]);
}

#[tokio::test(start_paused = true)]
async fn test_geolocate_keeps_device_label_when_reverse_fails() {
    let geocoder = FakeGeocoder::default().with_reverse(52.52, 13.405, ms(50), Reverse::Unavailable);
    let locator = FakeLocator::default().then(ms(100), Fix::At(loc(52.52, 13.405, Some("Berlin"))));
    let mut h = mount(geocoder, locator);

    h.resolver.geolocate();
    h.resolver.settle().await;

    assert_eq!(h.current(), Some(loc(52.52, 13.405, Some("Berlin"))));
    assert!(h.resolver.state().notice.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_geolocation_timeout_leaves_selection_unchanged() {
    let seed = loc(40.0, -73.0, Some("123 Main Street"));
    let locator = FakeLocator::default().then(ms(0), Fix::Hang);
    let options = ResolverOptions::default().with_initial_location(Some(seed.clone()));
    let mut h = mount_with(FakeGeocoder::default(), locator, options);

    let started = tokio::time::Instant::now();
    h.resolver.geolocate();
    h.resolver.settle().await;

    let waited = started.elapsed();
    assert!(waited >= ms(5000) && waited < ms(5100), "waited {:?}", waited);
    assert_eq!(h.current(), Some(seed));
    assert_eq!(
        h.resolver.state().notice.as_ref().map(|n| n.kind),
        Some(NoticeKind::GeolocationTimeout)
    );
    assert!(!h.resolver.state().busy.locating);
    assert!(h.selected().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_geolocation_denied_raises_notice() {
    let locator = FakeLocator::default().then(ms(20), Fix::Denied);
    let mut h = mount(FakeGeocoder::default(), locator);

    h.resolver.geolocate();
    h.resolver.settle().await;

    assert!(h.current().is_none());
    assert_eq!(
        h.resolver.state().notice.as_ref().map(|n| n.kind),
        Some(NoticeKind::GeolocationDenied)
    );
}

#[tokio::test(start_paused = true)]
async fn test_newer_geolocate_supersedes_pending_one() {
    let locator = FakeLocator::default()
        .then(ms(1000), Fix::At(loc(1.0, 1.0, None)))
        .then(ms(100), Fix::At(loc(2.0, 2.0, None)));
    let mut h = mount(FakeGeocoder::default(), locator);

    h.resolver.geolocate();
    h.resolver.geolocate();
    h.resolver.settle().await;

    assert_eq!(h.current(), Some(loc(2.0, 2.0, None)));
    assert!(!h.resolver.state().busy.locating);
}

#[tokio::test(start_paused = true)]
async fn test_geolocate_beats_older_slow_search() {
    let geocoder = FakeGeocoder::default().with_forward(
        "Main Street",
        ms(1500),
        Forward::Found(vec![loc(40.0, -73.0, Some("123 Main Street"))]),
    );
    let locator = FakeLocator::default().then(ms(100), Fix::At(loc(52.52, 13.405, Some("Berlin"))));
    let mut h = mount(geocoder, locator);

    h.resolver.type_search("Main Street");
    assert!(h.resolver.next_completion().await);
    h.resolver.geolocate();
    h.resolver.settle().await;

    assert_eq!(h.current(), Some(loc(52.52, 13.405, Some("Berlin"))));
    assert_eq!(h.resolver.state().busy, BusyFlags::default());
}

#[tokio::test(start_paused = true)]
async fn test_older_search_applies_when_newer_geolocate_fails() {
    let geocoder = FakeGeocoder::default().with_forward(
        "Main Street",
        ms(1500),
        Forward::Found(vec![loc(40.0, -73.0, Some("123 Main Street"))]),
    );
    let locator = FakeLocator::default().then(ms(100), Fix::Denied);
    let mut h = mount(geocoder, locator);

    h.resolver.type_search("Main Street");
    assert!(h.resolver.next_completion().await);
    h.resolver.geolocate();
    h.resolver.settle().await;

    assert_eq!(h.current(), Some(loc(40.0, -73.0, Some("123 Main Street"))));
    assert_eq!(
        h.resolver.state().notice.as_ref().map(|n| n.kind),
        Some(NoticeKind::GeolocationDenied)
    );
}

#[tokio::test(start_paused = true)]
async fn test_interleaved_requests_settle_on_highest_sequence() {
    let geocoder = FakeGeocoder::default()
        .with_forward("Far Away", ms(3000), Forward::Found(vec![loc(-33.0, 151.0, Some("Far Away"))]))
        .with_reverse(3.0, 3.0, ms(2500), Reverse::Label("Third"));
    let locator = FakeLocator::default()
        .then(ms(4000), Fix::At(loc(5.0, 5.0, None)))
        .then(ms(200), Fix::Denied);
    let mut h = mount(geocoder, locator);

    h.resolver.type_search("Far Away");
    assert!(h.resolver.next_completion().await); // #1, slow search
    h.resolver.click(Coordinates::new(1.0, 1.0)); // #2
    h.resolver.geolocate(); // #3, slow success
    h.resolver.click(Coordinates::new(3.0, 3.0)); // #4
    h.resolver.geolocate(); // #5, fails
    h.resolver.settle().await;

    // #5 failed, so #4 is the newest surviving request.
    assert_eq!(h.current(), Some(loc(3.0, 3.0, Some("Third"))));
    assert_eq!(h.resolver.state().last_applied_sequence.value(), 4);
    assert_eq!(h.resolver.map().marker(), Some(Coordinates::new(3.0, 3.0)));
    assert_eq!(h.resolver.state().busy, BusyFlags::default());
}

#[tokio::test(start_paused = true)]
async fn test_select_with_label_skips_enrichment() {
    let mut h = mount(FakeGeocoder::default(), FakeLocator::default());

    h.resolver.select(loc(40.0, -73.0, Some("Draft address")));
    h.resolver.settle().await;

    assert!(h.geocoder.reverse_calls().is_empty());
    assert_eq!(h.current(), Some(loc(40.0, -73.0, Some("Draft address"))));

    h.resolver.select(loc(41.0, -72.0, None));
    h.resolver.settle().await;
    assert_eq!(h.geocoder.reverse_calls(), vec![Coordinates::new(41.0, -72.0)]);
}

#[tokio::test(start_paused = true)]
async fn test_clear_selection_invalidates_pending_results() {
    let geocoder =
        FakeGeocoder::default().with_reverse(10.5, 20.5, ms(300), Reverse::Label("Harbour Road"));
    let mut h = mount(geocoder, FakeLocator::default());

    h.resolver.click(Coordinates::new(10.5, 20.5));
    h.resolver.dispatch(Intent::ClearSelection);
    h.resolver.settle().await;

    assert!(h.current().is_none());
    assert_eq!(h.resolver.map().marker(), None);
}

#[tokio::test(start_paused = true)]
async fn test_initial_location_seeds_map() {
    let seed = loc(40.0, -73.0, Some("123 Main Street"));
    let options = ResolverOptions::default().with_initial_location(Some(seed.clone()));
    let h = mount_with(FakeGeocoder::default(), FakeLocator::default(), options);

    assert_eq!(h.current(), Some(seed));
    assert!(h.resolver.map().is_initialized());
    assert_eq!(h.resolver.map().marker(), Some(Coordinates::new(40.0, -73.0)));
    assert_eq!(h.resolver.map().center(), Some(Coordinates::new(40.0, -73.0)));
    assert!(h.selected().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_mount_without_selection_uses_default_viewport() {
    let h = mount(FakeGeocoder::default(), FakeLocator::default());

    assert_eq!(h.resolver.map().container(), Some("map"));
    assert_eq!(h.resolver.map().center(), Some(Coordinates::new(0.0, 0.0)));
    assert_eq!(h.resolver.map().zoom(), 2.0);
    assert_eq!(h.resolver.map().marker(), None);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_destroys_map_and_ignores_completions() {
    let geocoder =
        FakeGeocoder::default().with_reverse(10.5, 20.5, ms(300), Reverse::Label("Harbour Road"));
    let mut h = mount(geocoder, FakeLocator::default());

    h.resolver.click(Coordinates::new(10.5, 20.5));
    h.resolver.type_search("Main Street");
    h.resolver.teardown();

    assert!(h.resolver.map().is_destroyed());
    assert!(h.resolver.is_idle());
    assert!(!h.resolver.next_completion().await);

    h.resolver.click(Coordinates::new(1.0, 1.0));
    h.resolver.geolocate();

    assert_eq!(h.current(), Some(loc(10.5, 20.5, None)));
    assert_eq!(h.resolver.state().busy, BusyFlags::default());
    assert!(h.geocoder.forward_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_routes_intents() {
    let locator = FakeLocator::default().then(ms(10), Fix::Denied);
    let mut h = mount(FakeGeocoder::default(), locator);

    h.resolver.dispatch(Intent::MapClick(Coordinates::new(1.0, 2.0)));
    h.resolver.dispatch(Intent::SearchInput("typed".to_string()));
    h.resolver.dispatch(Intent::Geolocate);
    h.resolver.settle().await;

    assert!(h.resolver.state().notice.is_some());
    h.resolver.dispatch(Intent::DismissNotice);
    assert!(h.resolver.state().notice.is_none());
}
