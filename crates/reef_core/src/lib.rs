use std::{collections::HashMap, sync::Arc};

use map_provider::{MapSurface, MapSurfaceEvent, MarkerHandle, MarkerOptions, MarkerStyle};
use shared::{
    catalog::ReefCatalog,
    domain::{GeoPoint, ReefName, ReefRecord, ReefStatus},
};
use tokio::sync::broadcast;
use tracing::warn;

pub mod capability;

/// Initial camera for the world overview.
pub const OVERVIEW_CENTER: GeoPoint = GeoPoint {
    lon: 30.0,
    lat: 15.0,
};
pub const OVERVIEW_ZOOM: f64 = 3.0;
/// Zoom level used when focusing a single reef.
pub const DETAIL_ZOOM: f64 = 8.0;

/// Marker fill color keyed off conservation status. Unrecognized statuses
/// fall back to the default (green) style.
pub fn marker_style_for_status(status: &ReefStatus) -> MarkerStyle {
    let fill_rgb = match status {
        ReefStatus::Critical => [239, 68, 68],
        ReefStatus::Threatened => [249, 115, 22],
        ReefStatus::Vulnerable => [234, 179, 8],
        _ => [34, 197, 94],
    };
    MarkerStyle { fill_rgb }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapLifecycle {
    /// Waiting for the map capability; the view shows a placeholder.
    Loading,
    Ready,
    /// Capability acquisition failed. Sticky: the view stays on the
    /// placeholder until the process restarts.
    Failed(String),
}

/// Owns the map surface lifecycle, keeps the marker set consistent with the
/// reef catalog, and holds the shared selection.
///
/// Markers are correlated to records by reef name, never by position in a
/// list. Marker clicks and info-panel selections both route through
/// [`ReefMapController::select`], which performs the single camera move for a
/// selection change.
pub struct ReefMapController {
    catalog: ReefCatalog,
    lifecycle: MapLifecycle,
    surface: Option<Arc<dyn MapSurface>>,
    events: Option<broadcast::Receiver<MapSurfaceEvent>>,
    markers: HashMap<ReefName, Arc<dyn MarkerHandle>>,
    selected: Option<ReefRecord>,
}

impl ReefMapController {
    pub fn new(catalog: ReefCatalog) -> Self {
        Self {
            catalog,
            lifecycle: MapLifecycle::Loading,
            surface: None,
            events: None,
            markers: HashMap::new(),
            selected: None,
        }
    }

    pub fn catalog(&self) -> &ReefCatalog {
        &self.catalog
    }

    pub fn lifecycle(&self) -> &MapLifecycle {
        &self.lifecycle
    }

    pub fn selected(&self) -> Option<&ReefRecord> {
        self.selected.as_ref()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Adopts a freshly created map surface. At most one surface is live per
    /// mount: a second attach (or an attach after a recorded failure) is
    /// suppressed.
    pub fn attach_surface(&mut self, surface: Arc<dyn MapSurface>) {
        if self.lifecycle != MapLifecycle::Loading {
            warn!(lifecycle = ?self.lifecycle, "ignoring map surface attach");
            return;
        }
        self.events = Some(surface.subscribe_events());
        self.surface = Some(surface);
        self.lifecycle = MapLifecycle::Ready;
        self.sync_markers();
        if let Some(record) = self.selected.clone() {
            self.focus(&record);
        }
    }

    /// Records a capability bootstrap failure. The map view degrades to its
    /// placeholder state; there is no automatic retry.
    pub fn capability_failed(&mut self, reason: impl Into<String>) {
        if self.lifecycle == MapLifecycle::Ready {
            warn!("ignoring capability failure reported after surface attach");
            return;
        }
        self.lifecycle = MapLifecycle::Failed(reason.into());
    }

    /// Replaces the catalog and rebuilds the marker set from scratch.
    pub fn set_catalog(&mut self, catalog: ReefCatalog) {
        self.catalog = catalog;
        if self
            .selected
            .as_ref()
            .is_some_and(|record| self.catalog.get(&record.name).is_none())
        {
            self.selected = None;
        }
        self.sync_markers();
    }

    /// Selects a reef by name and focuses the camera on it. Selecting the
    /// currently selected reef again is a harmless same-target camera move.
    /// Returns false if the name is not in the catalog.
    pub fn select(&mut self, name: &ReefName) -> bool {
        let Some(record) = self.catalog.get(name).cloned() else {
            warn!(reef = %name, "ignoring selection of reef not present in catalog");
            return false;
        };
        self.focus(&record);
        self.selected = Some(record);
        true
    }

    /// Drains pending surface events and applies marker clicks as selections.
    /// Called once per UI frame.
    pub fn poll_surface_events(&mut self) {
        use tokio::sync::broadcast::error::TryRecvError;

        let mut clicked = Vec::new();
        let mut closed = false;
        if let Some(events) = &mut self.events {
            loop {
                match events.try_recv() {
                    Ok(MapSurfaceEvent::MarkerClicked { name }) => clicked.push(name),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Lagged(skipped)) => {
                        warn!(skipped, "map surface event stream lagged");
                    }
                    Err(TryRecvError::Closed) => {
                        closed = true;
                        break;
                    }
                }
            }
        }
        if closed {
            self.events = None;
        }
        for name in clicked {
            self.select(&name);
        }
    }

    /// Releases every marker and the surface itself. The controller is back
    /// in its initial state afterwards; a remount starts clean.
    pub fn detach(&mut self) {
        for (_, marker) in self.markers.drain() {
            marker.remove();
        }
        self.surface = None;
        self.events = None;
        self.selected = None;
        self.lifecycle = MapLifecycle::Loading;
    }

    fn sync_markers(&mut self) {
        for (_, marker) in self.markers.drain() {
            marker.remove();
        }
        let Some(surface) = &self.surface else {
            return;
        };
        for record in self.catalog.iter() {
            let options = MarkerOptions {
                name: record.name.clone(),
                position: record.coordinates,
                style: marker_style_for_status(&record.status),
            };
            match surface.create_marker(options) {
                Ok(handle) => {
                    self.markers.insert(record.name.clone(), handle);
                }
                Err(err) => {
                    // Catalog records are static and validated, so this is a
                    // programming-error class: loud in debug, skipped in release.
                    debug_assert!(false, "marker creation failed for {}: {err:#}", record.name);
                    tracing::error!(reef = %record.name, "skipping marker: {err:#}");
                }
            }
        }
    }

    fn focus(&self, record: &ReefRecord) {
        if let Some(surface) = &self.surface {
            surface.pan_and_zoom_to(record.coordinates, DETAIL_ZOOM);
        }
    }
}

#[cfg(test)]
mod tests;
