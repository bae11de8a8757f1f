//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use analysis_client::{AnalysisClient, AnalysisEndpoints, ImageUpload};
use crossbeam_channel::{Receiver, Sender};
use map_provider::MapViewOptions;
use reef_core::capability::CapabilityCell;
use reef_core::{OVERVIEW_CENTER, OVERVIEW_ZOOM};

use crate::backend_bridge::commands::BackendCommand;
use crate::config::Settings;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::map::connector::BasemapConnector;
use crate::ui::app::PreviewImage;

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: Settings) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(worker_loop(cmd_rx, ui_tx, settings));
    });
}

async fn worker_loop(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: Settings) {
    let endpoints = match AnalysisEndpoints::from_urls(
        &settings.coral_health_endpoint,
        &settings.debris_detection_endpoint,
    ) {
        Ok(endpoints) => endpoints,
        Err(err) => {
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("invalid analysis endpoint configuration: {err}"),
            )));
            AnalysisEndpoints::default()
        }
    };
    let analysis = AnalysisClient::with_timeout(endpoints, settings.request_timeout());
    let http = reqwest::Client::new();
    let map_capability: CapabilityCell<Arc<BasemapConnector>> = CapabilityCell::new();

    let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            BackendCommand::InitializeMap => {
                tracing::info!("backend: initialize_map");
                let connector = map_capability
                    .get_or_load(|| async {
                        let basemap_url = settings.basemap()?;
                        let connector = BasemapConnector::acquire(&http, &basemap_url).await?;
                        Ok(Arc::new(connector))
                    })
                    .await;
                match connector {
                    Ok(connector) => {
                        let surface = connector.create_surface(MapViewOptions {
                            center: OVERVIEW_CENTER,
                            zoom: OVERVIEW_ZOOM,
                        });
                        let _ = ui_tx.try_send(UiEvent::MapSurfaceReady(surface));
                    }
                    Err(reason) => {
                        tracing::error!("backend: map capability unavailable: {reason}");
                        let _ = ui_tx.try_send(UiEvent::MapCapabilityFailed(reason));
                    }
                }
            }
            BackendCommand::LoadAnalysisPreview { kind, path } => {
                tracing::info!(%kind, path = %path.display(), "backend: load_analysis_preview");
                match tokio::fs::read(&path).await {
                    Ok(bytes) => match decode_preview_image(&bytes) {
                        Ok(image) => {
                            let _ = ui_tx.try_send(UiEvent::AnalysisPreviewLoaded { kind, image });
                        }
                        Err(reason) => {
                            let _ =
                                ui_tx.try_send(UiEvent::AnalysisPreviewFailed { kind, reason });
                        }
                    },
                    Err(err) => {
                        let _ = ui_tx.try_send(UiEvent::AnalysisPreviewFailed {
                            kind,
                            reason: format!("failed to read {}: {err}", path.display()),
                        });
                    }
                }
            }
            BackendCommand::AnalyzeImage { kind, path } => {
                tracing::info!(%kind, path = %path.display(), "backend: analyze_image");
                let filename = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or("upload.jpg")
                    .to_string();
                match tokio::fs::read(&path).await {
                    Ok(bytes) => {
                        let mime_type = mime_guess::from_path(&path)
                            .first_raw()
                            .map(str::to_string);
                        let upload = ImageUpload {
                            filename,
                            mime_type,
                            bytes,
                        };
                        match analysis.analyze(kind, upload).await {
                            Ok(result) => {
                                let _ =
                                    ui_tx.try_send(UiEvent::AnalysisCompleted { kind, result });
                            }
                            Err(err) => {
                                tracing::error!(%kind, "backend: analyze_image failed: {err}");
                                let _ = ui_tx.try_send(UiEvent::AnalysisFailed {
                                    kind,
                                    reason: err.to_string(),
                                });
                            }
                        }
                    }
                    Err(err) => {
                        let _ = ui_tx.try_send(UiEvent::AnalysisFailed {
                            kind,
                            reason: format!("failed to read {}: {err}", path.display()),
                        });
                    }
                }
            }
        }
    }
}

const PREVIEW_MAX_DIMENSION: f32 = 360.0;

fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|err| format!("failed to decode image: {err}"))?;

    let width = decoded.width();
    let height = decoded.height();
    let scale = (PREVIEW_MAX_DIMENSION / (width.max(height) as f32)).min(1.0);
    let resized = if scale < 1.0 {
        decoded.resize(
            ((width as f32 * scale).max(1.0)) as u32,
            ((height as f32 * scale).max(1.0)) as u32,
            image::imageops::FilterType::Triangle,
        )
    } else {
        decoded
    };

    let rgba = resized.to_rgba8();
    Ok(PreviewImage {
        width: rgba.width() as usize,
        height: rgba.height() as usize,
        rgba: rgba.into_raw(),
    })
}
