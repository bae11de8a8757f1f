use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, TextureHandle, TextureOptions};
use map_provider::{MapSurface, MapSurfaceEvent, MarkerHandle, MarkerOptions, MapViewOptions};
use shared::domain::{GeoPoint, ReefName};
use tokio::sync::broadcast;

const MARKER_RADIUS: f32 = 7.0;
const CAMERA_RATE: f64 = 0.15;
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Decoded basemap imagery in equirectangular projection: x spans
/// [-180, 180] degrees of longitude, y spans [90, -90] degrees of latitude.
pub struct BasemapBitmap {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
struct Camera {
    center: GeoPoint,
    zoom: f64,
    target_center: GeoPoint,
    target_zoom: f64,
}

impl Camera {
    fn new(options: MapViewOptions) -> Self {
        Self {
            center: options.center,
            zoom: options.zoom,
            target_center: options.center,
            target_zoom: options.zoom,
        }
    }

    fn retarget(&mut self, center: GeoPoint, zoom: f64) {
        self.target_center = center;
        self.target_zoom = zoom;
    }

    /// Advances the animation one frame. Returns true while still moving.
    fn step(&mut self) -> bool {
        let settled = (self.center.lon - self.target_center.lon).abs() < 1e-4
            && (self.center.lat - self.target_center.lat).abs() < 1e-4
            && (self.zoom - self.target_zoom).abs() < 1e-3;
        if settled {
            self.center = self.target_center;
            self.zoom = self.target_zoom;
            return false;
        }
        self.center.lon += (self.target_center.lon - self.center.lon) * CAMERA_RATE;
        self.center.lat += (self.target_center.lat - self.center.lat) * CAMERA_RATE;
        self.zoom += (self.target_zoom - self.zoom) * CAMERA_RATE;
        true
    }
}

struct PlacedMarker {
    id: u64,
    name: ReefName,
    position: GeoPoint,
    fill: Color32,
}

struct BasemapMarker {
    id: u64,
    markers: Arc<Mutex<Vec<PlacedMarker>>>,
}

impl MarkerHandle for BasemapMarker {
    fn remove(&self) {
        if let Ok(mut markers) = self.markers.lock() {
            markers.retain(|marker| marker.id != self.id);
        }
    }
}

/// An egui-painted map surface over a fixed world basemap. Camera moves are
/// animated per frame; the latest requested target always wins.
pub struct EguiMapSurface {
    basemap: Arc<BasemapBitmap>,
    camera: Mutex<Camera>,
    markers: Arc<Mutex<Vec<PlacedMarker>>>,
    next_marker_id: AtomicU64,
    events: broadcast::Sender<MapSurfaceEvent>,
    texture: Mutex<Option<TextureHandle>>,
}

impl EguiMapSurface {
    pub fn new(basemap: Arc<BasemapBitmap>, options: MapViewOptions) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            basemap,
            camera: Mutex::new(Camera::new(options)),
            markers: Arc::new(Mutex::new(Vec::new())),
            next_marker_id: AtomicU64::new(1),
            events,
            texture: Mutex::new(None),
        })
    }

    fn basemap_texture(&self, ctx: &egui::Context) -> Option<TextureHandle> {
        let mut slot = self.texture.lock().ok()?;
        if slot.is_none() {
            let image = egui::ColorImage::from_rgba_unmultiplied(
                [self.basemap.width, self.basemap.height],
                &self.basemap.rgba,
            );
            *slot = Some(ctx.load_texture("world-basemap", image, TextureOptions::LINEAR));
        }
        slot.clone()
    }

    /// Paints the map into the given region and reports marker clicks on the
    /// surface's event channel.
    pub fn show(&self, ui: &mut egui::Ui, size: egui::Vec2) {
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        let camera = {
            let Ok(mut camera) = self.camera.lock() else {
                return;
            };
            let animating = camera.step();
            if animating {
                ui.ctx().request_repaint();
            }
            *camera
        };

        let painter = ui.painter().with_clip_rect(rect);
        painter.rect_filled(rect, 8.0, Color32::from_rgb(7, 30, 52));

        if let Some(texture) = self.basemap_texture(ui.ctx()) {
            let top_left = project(camera.center, camera.zoom, rect, GeoPoint { lon: -180.0, lat: 90.0 });
            let bottom_right = project(camera.center, camera.zoom, rect, GeoPoint { lon: 180.0, lat: -90.0 });
            painter.image(
                texture.id(),
                Rect::from_min_max(top_left, bottom_right),
                Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        let pointer = response.hover_pos();
        let mut hovered: Option<(ReefName, Pos2)> = None;
        if let Ok(markers) = self.markers.lock() {
            for marker in markers.iter() {
                let pos = project(camera.center, camera.zoom, rect, marker.position);
                if !rect.expand(MARKER_RADIUS * 2.0).contains(pos) {
                    continue;
                }
                painter.circle(pos, MARKER_RADIUS, marker.fill, Stroke::new(2.0, Color32::WHITE));
                if pointer.is_some_and(|p| p.distance(pos) <= MARKER_RADIUS + 2.0) {
                    hovered = Some((marker.name.clone(), pos));
                }
            }
        }

        if let Some((name, pos)) = &hovered {
            let anchor = *pos + egui::vec2(0.0, -(MARKER_RADIUS + 4.0));
            painter.text(
                anchor + egui::vec2(1.0, 1.0),
                Align2::CENTER_BOTTOM,
                name.as_str(),
                FontId::proportional(12.0),
                Color32::BLACK,
            );
            painter.text(
                anchor,
                Align2::CENTER_BOTTOM,
                name.as_str(),
                FontId::proportional(12.0),
                Color32::WHITE,
            );
        }

        if response.clicked() {
            if let Some(click) = response.interact_pointer_pos() {
                if let Some(name) = self.marker_at(camera, rect, click) {
                    let _ = self.events.send(MapSurfaceEvent::MarkerClicked { name });
                }
            }
        }
    }

    fn marker_at(&self, camera: Camera, rect: Rect, pointer: Pos2) -> Option<ReefName> {
        let markers = self.markers.lock().ok()?;
        markers
            .iter()
            .map(|marker| {
                let pos = project(camera.center, camera.zoom, rect, marker.position);
                (marker.name.clone(), pointer.distance(pos))
            })
            .filter(|(_, distance)| *distance <= MARKER_RADIUS + 2.0)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(name, _)| name)
    }
}

impl MapSurface for EguiMapSurface {
    fn create_marker(&self, options: MarkerOptions) -> anyhow::Result<Arc<dyn MarkerHandle>> {
        if !options.position.is_valid() {
            anyhow::bail!(
                "marker position ({}, {}) is outside valid coordinate ranges",
                options.position.lon,
                options.position.lat
            );
        }
        let id = self.next_marker_id.fetch_add(1, Ordering::Relaxed);
        let [r, g, b] = options.style.fill_rgb;
        let mut markers = self
            .markers
            .lock()
            .map_err(|_| anyhow::anyhow!("marker registry poisoned"))?;
        markers.push(PlacedMarker {
            id,
            name: options.name,
            position: options.position,
            fill: Color32::from_rgb(r, g, b),
        });
        Ok(Arc::new(BasemapMarker {
            id,
            markers: self.markers.clone(),
        }))
    }

    fn pan_and_zoom_to(&self, target: GeoPoint, zoom: f64) {
        if let Ok(mut camera) = self.camera.lock() {
            camera.retarget(target, zoom);
        }
    }

    fn subscribe_events(&self) -> broadcast::Receiver<MapSurfaceEvent> {
        self.events.subscribe()
    }
}

fn pixels_per_degree(zoom: f64, rect_width: f32) -> f64 {
    (rect_width as f64 / 360.0) * 2f64.powf(zoom - 1.0)
}

/// Projects a geographic point into screen space for the given camera. The
/// basemap is equirectangular, so the projection is linear in degrees.
fn project(center: GeoPoint, zoom: f64, rect: Rect, point: GeoPoint) -> Pos2 {
    let ppd = pixels_per_degree(zoom, rect.width());
    let x = rect.center().x + ((point.lon - center.lon) * ppd) as f32;
    let y = rect.center().y + ((center.lat - point.lat) * ppd) as f32;
    Pos2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Rect {
        Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(720.0, 480.0))
    }

    #[test]
    fn camera_center_projects_to_viewport_center() {
        let center = GeoPoint { lon: 30.0, lat: 15.0 };
        let projected = project(center, 3.0, viewport(), center);
        assert_eq!(projected, viewport().center());
    }

    #[test]
    fn each_zoom_level_doubles_the_scale() {
        let rect = viewport();
        assert_eq!(
            pixels_per_degree(4.0, rect.width()),
            2.0 * pixels_per_degree(3.0, rect.width())
        );
    }

    #[test]
    fn east_is_right_and_north_is_up() {
        let rect = viewport();
        let center = GeoPoint { lon: 0.0, lat: 0.0 };
        let east = project(center, 3.0, rect, GeoPoint { lon: 10.0, lat: 0.0 });
        let north = project(center, 3.0, rect, GeoPoint { lon: 0.0, lat: 10.0 });
        assert!(east.x > rect.center().x);
        assert!(north.y < rect.center().y);
    }

    #[test]
    fn camera_animation_converges_on_the_latest_target() {
        let mut camera = Camera::new(MapViewOptions {
            center: GeoPoint { lon: 0.0, lat: 0.0 },
            zoom: 3.0,
        });
        camera.retarget(GeoPoint { lon: 100.0, lat: -20.0 }, 8.0);
        // A later request supersedes the in-flight one.
        camera.retarget(GeoPoint { lon: 145.7781, lat: -16.2839 }, 8.0);

        let mut steps = 0;
        while camera.step() {
            steps += 1;
            assert!(steps < 10_000, "camera animation failed to settle");
        }
        assert_eq!(camera.center.lon, 145.7781);
        assert_eq!(camera.center.lat, -16.2839);
        assert_eq!(camera.zoom, 8.0);
    }
}
