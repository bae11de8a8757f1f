use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use map_provider::{MapSurface, MapSurfaceEvent, MarkerHandle, MarkerOptions};
use shared::{
    catalog::ReefCatalog,
    domain::{GeoPoint, ReefName, ReefRecord, ReefStatus},
};
use tokio::sync::broadcast;

use crate::{marker_style_for_status, MapLifecycle, ReefMapController, DETAIL_ZOOM};

struct RecordingMarker {
    name: ReefName,
    removed: AtomicBool,
}

impl MarkerHandle for RecordingMarker {
    fn remove(&self) {
        self.removed.store(true, Ordering::SeqCst);
    }
}

struct RecordingSurface {
    markers: Mutex<Vec<Arc<RecordingMarker>>>,
    camera_calls: Mutex<Vec<(GeoPoint, f64)>>,
    events: broadcast::Sender<MapSurfaceEvent>,
}

impl RecordingSurface {
    fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(32);
        Arc::new(Self {
            markers: Mutex::new(Vec::new()),
            camera_calls: Mutex::new(Vec::new()),
            events,
        })
    }

    fn live_marker_names(&self) -> HashSet<ReefName> {
        self.markers
            .lock()
            .expect("markers lock")
            .iter()
            .filter(|marker| !marker.removed.load(Ordering::SeqCst))
            .map(|marker| marker.name.clone())
            .collect()
    }

    fn camera_calls(&self) -> Vec<(GeoPoint, f64)> {
        self.camera_calls.lock().expect("camera lock").clone()
    }

    fn click(&self, name: &str) {
        self.events
            .send(MapSurfaceEvent::MarkerClicked {
                name: ReefName::from(name),
            })
            .expect("at least one event subscriber");
    }
}

impl MapSurface for RecordingSurface {
    fn create_marker(&self, options: MarkerOptions) -> anyhow::Result<Arc<dyn MarkerHandle>> {
        let marker = Arc::new(RecordingMarker {
            name: options.name,
            removed: AtomicBool::new(false),
        });
        self.markers.lock().expect("markers lock").push(marker.clone());
        Ok(marker)
    }

    fn pan_and_zoom_to(&self, target: GeoPoint, zoom: f64) {
        self.camera_calls
            .lock()
            .expect("camera lock")
            .push((target, zoom));
    }

    fn subscribe_events(&self) -> broadcast::Receiver<MapSurfaceEvent> {
        self.events.subscribe()
    }
}

fn catalog_names(catalog: &ReefCatalog) -> HashSet<ReefName> {
    catalog.iter().map(|record| record.name.clone()).collect()
}

fn tiny_catalog() -> ReefCatalog {
    ReefCatalog::from_records(vec![ReefRecord {
        name: ReefName::from("Lone Reef"),
        coordinates: GeoPoint { lon: 1.0, lat: 2.0 },
        country: "Nowhere".to_string(),
        status: ReefStatus::Stable,
        description: "a single test reef".to_string(),
    }])
    .expect("valid catalog")
}

#[test]
fn attach_creates_exactly_one_marker_per_reef() {
    let catalog = ReefCatalog::builtin();
    let mut controller = ReefMapController::new(catalog.clone());
    let surface = RecordingSurface::new();

    controller.attach_surface(surface.clone());

    assert_eq!(controller.lifecycle(), &MapLifecycle::Ready);
    assert_eq!(controller.marker_count(), catalog.len());
    assert_eq!(surface.live_marker_names(), catalog_names(&catalog));
}

#[test]
fn marker_click_selects_and_issues_single_camera_move() {
    let mut controller = ReefMapController::new(ReefCatalog::builtin());
    let surface = RecordingSurface::new();
    controller.attach_surface(surface.clone());
    assert!(surface.camera_calls().is_empty());

    surface.click("Great Barrier Reef");
    controller.poll_surface_events();

    let selected = controller.selected().expect("selection after click");
    assert_eq!(selected.name, ReefName::from("Great Barrier Reef"));

    let calls = surface.camera_calls();
    assert_eq!(
        calls,
        vec![(
            GeoPoint {
                lon: 145.7781,
                lat: -16.2839,
            },
            DETAIL_ZOOM,
        )]
    );
}

#[test]
fn reselecting_the_same_reef_is_idempotent() {
    let mut controller = ReefMapController::new(ReefCatalog::builtin());
    let surface = RecordingSurface::new();
    controller.attach_surface(surface.clone());

    let name = ReefName::from("Coral Triangle");
    assert!(controller.select(&name));
    assert!(controller.select(&name));

    let selected = controller.selected().expect("selection");
    assert_eq!(selected.name, name);

    // Both moves target the same destination; a repeat is a harmless no-op.
    let calls = surface.camera_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
}

#[test]
fn selecting_an_unknown_reef_is_rejected() {
    let mut controller = ReefMapController::new(ReefCatalog::builtin());
    let surface = RecordingSurface::new();
    controller.attach_surface(surface.clone());

    assert!(!controller.select(&ReefName::from("Atlantis Reef")));
    assert!(controller.selected().is_none());
    assert!(surface.camera_calls().is_empty());
}

#[test]
fn selection_made_while_loading_focuses_once_the_surface_attaches() {
    let mut controller = ReefMapController::new(ReefCatalog::builtin());

    assert!(controller.select(&ReefName::from("Florida Keys Reef")));
    assert!(controller.selected().is_some());

    let surface = RecordingSurface::new();
    controller.attach_surface(surface.clone());

    let calls = surface.camera_calls();
    assert_eq!(
        calls,
        vec![(
            GeoPoint {
                lon: -80.5,
                lat: 24.7,
            },
            DETAIL_ZOOM,
        )]
    );
}

#[test]
fn remount_leaves_no_residual_markers() {
    let catalog = ReefCatalog::builtin();
    let mut controller = ReefMapController::new(catalog.clone());
    let first = RecordingSurface::new();
    controller.attach_surface(first.clone());
    assert!(controller.select(&ReefName::from("Red Sea Coral Reef")));

    controller.detach();
    assert!(first.live_marker_names().is_empty());
    assert_eq!(controller.marker_count(), 0);
    assert!(controller.selected().is_none());
    assert_eq!(controller.lifecycle(), &MapLifecycle::Loading);

    let second = RecordingSurface::new();
    controller.attach_surface(second.clone());
    assert_eq!(controller.marker_count(), catalog.len());
    assert_eq!(second.live_marker_names().len(), catalog.len());
}

#[test]
fn duplicate_attach_is_suppressed() {
    let catalog = ReefCatalog::builtin();
    let mut controller = ReefMapController::new(catalog.clone());
    let first = RecordingSurface::new();
    let second = RecordingSurface::new();

    controller.attach_surface(first.clone());
    controller.attach_surface(second.clone());

    assert_eq!(controller.marker_count(), catalog.len());
    assert_eq!(first.live_marker_names().len(), catalog.len());
    assert!(second.live_marker_names().is_empty());
}

#[test]
fn capability_failure_is_sticky() {
    let mut controller = ReefMapController::new(ReefCatalog::builtin());
    controller.capability_failed("script failed to load");

    assert_eq!(
        controller.lifecycle(),
        &MapLifecycle::Failed("script failed to load".to_string())
    );

    // A surface arriving after the recorded failure is ignored.
    let surface = RecordingSurface::new();
    controller.attach_surface(surface.clone());
    assert_eq!(controller.marker_count(), 0);
    assert!(surface.live_marker_names().is_empty());
}

#[test]
fn replacing_the_catalog_rebuilds_the_marker_set() {
    let mut controller = ReefMapController::new(ReefCatalog::builtin());
    let surface = RecordingSurface::new();
    controller.attach_surface(surface.clone());
    assert!(controller.select(&ReefName::from("Great Barrier Reef")));

    let replacement = tiny_catalog();
    controller.set_catalog(replacement.clone());

    assert_eq!(controller.marker_count(), 1);
    assert_eq!(surface.live_marker_names(), catalog_names(&replacement));
    // The prior selection no longer exists in the catalog.
    assert!(controller.selected().is_none());
}

#[test]
fn marker_styles_key_off_status_with_a_default() {
    assert_eq!(
        marker_style_for_status(&ReefStatus::Critical).fill_rgb,
        [239, 68, 68]
    );
    assert_eq!(
        marker_style_for_status(&ReefStatus::Threatened).fill_rgb,
        [249, 115, 22]
    );
    assert_eq!(
        marker_style_for_status(&ReefStatus::Vulnerable).fill_rgb,
        [234, 179, 8]
    );
    assert_eq!(
        marker_style_for_status(&ReefStatus::Protected).fill_rgb,
        [34, 197, 94]
    );
    assert_eq!(
        marker_style_for_status(&ReefStatus::Other("Bleached".to_string())).fill_rgb,
        [34, 197, 94]
    );
}
