use std::sync::Arc;

use anyhow::Context as _;
use async_trait::async_trait;
use map_provider::{MapConnector, MapSurface, MapViewOptions};
use tracing::info;
use url::Url;

use super::surface::{BasemapBitmap, EguiMapSurface};

/// Map capability backed by a single world basemap image. The image is the
/// capability's backing resource: it is fetched and decoded once, then every
/// created surface shares it.
pub struct BasemapConnector {
    basemap: Arc<BasemapBitmap>,
}

impl BasemapConnector {
    pub async fn acquire(http: &reqwest::Client, basemap_url: &Url) -> anyhow::Result<Self> {
        info!(%basemap_url, "fetching world basemap");
        let response = http
            .get(basemap_url.clone())
            .send()
            .await
            .with_context(|| format!("failed to fetch basemap from {basemap_url}"))?
            .error_for_status()
            .with_context(|| format!("basemap request to {basemap_url} was rejected"))?;
        let bytes = response
            .bytes()
            .await
            .context("failed to read basemap response body")?;

        let decoded = image::load_from_memory(&bytes)
            .context("failed to decode basemap image")?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        info!(width, height, "world basemap ready");

        Ok(Self {
            basemap: Arc::new(BasemapBitmap {
                width: width as usize,
                height: height as usize,
                rgba: decoded.into_raw(),
            }),
        })
    }

    /// Concrete-typed surface creation for the UI, which needs to paint it.
    pub fn create_surface(&self, options: MapViewOptions) -> Arc<EguiMapSurface> {
        EguiMapSurface::new(self.basemap.clone(), options)
    }
}

#[async_trait]
impl MapConnector for BasemapConnector {
    async fn create_map(&self, options: MapViewOptions) -> anyhow::Result<Arc<dyn MapSurface>> {
        Ok(self.create_surface(options))
    }
}
