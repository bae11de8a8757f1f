use async_trait::async_trait;
use shared::domain::{GeoPoint, ReefName};
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewOptions {
    pub center: GeoPoint,
    pub zoom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    pub fill_rgb: [u8; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOptions {
    /// Correlation key reported back in click events.
    pub name: ReefName,
    pub position: GeoPoint,
    pub style: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapSurfaceEvent {
    MarkerClicked { name: ReefName },
}

pub trait MarkerHandle: Send + Sync {
    fn remove(&self);
}

pub trait MapSurface: Send + Sync {
    fn create_marker(&self, options: MarkerOptions) -> anyhow::Result<std::sync::Arc<dyn MarkerHandle>>;
    /// Requests a camera move. Later requests supersede in-flight ones;
    /// repeating the current target is a no-op.
    fn pan_and_zoom_to(&self, target: GeoPoint, zoom: f64);
    fn subscribe_events(&self) -> broadcast::Receiver<MapSurfaceEvent>;
}

#[async_trait]
pub trait MapConnector: Send + Sync {
    async fn create_map(
        &self,
        options: MapViewOptions,
    ) -> anyhow::Result<std::sync::Arc<dyn MapSurface>>;
}

pub struct MissingMapConnector;

#[async_trait]
impl MapConnector for MissingMapConnector {
    async fn create_map(
        &self,
        _options: MapViewOptions,
    ) -> anyhow::Result<std::sync::Arc<dyn MapSurface>> {
        Err(anyhow::anyhow!("map provider is unavailable"))
    }
}
