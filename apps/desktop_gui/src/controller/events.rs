//! UI/backend events and error modeling for the desktop controller.

use std::sync::Arc;

use analysis_client::AnalysisKind;
use serde_json::Value;

use crate::map::surface::EguiMapSurface;
use crate::ui::app::PreviewImage;

pub enum UiEvent {
    Info(String),
    Error(UiError),
    MapSurfaceReady(Arc<EguiMapSurface>),
    MapCapabilityFailed(String),
    AnalysisPreviewLoaded {
        kind: AnalysisKind,
        image: PreviewImage,
    },
    AnalysisPreviewFailed {
        kind: AnalysisKind,
        reason: String,
    },
    AnalysisCompleted {
        kind: AnalysisKind,
        result: Value,
    },
    AnalysisFailed {
        kind: AnalysisKind,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Capability,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    MapBootstrap,
    Analysis,
    General,
}

pub fn classify_map_bootstrap_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("failed to fetch")
        || lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
    {
        "Basemap service unreachable; check your network connection and restart the app."
            .to_string()
    } else if lower.contains("decode") {
        "Basemap imagery could not be decoded; the map stays unavailable.".to_string()
    } else {
        format!("Map bootstrap error: {message}")
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("basemap")
            || message_lower.contains("map provider")
            || message_lower.contains("capability")
        {
            UiErrorCategory::Capability
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
            || message_lower.contains("unsupported")
            || message_lower.contains("limit is")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("unreachable")
            || message_lower.contains("status 5")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
