use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Largest accepted upload. Matches the limit advertised on the upload pages.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];
const DEFAULT_CORAL_HEALTH_URL: &str =
    "https://degree-checker-01-coral-health-orchestrator.hf.space/process";
const DEFAULT_DEBRIS_DETECTION_URL: &str =
    "https://degree-checker-01-debris-detection-orchestrator.hf.space/process";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    CoralHealth,
    DebrisDetection,
}

impl AnalysisKind {
    pub fn label(self) -> &'static str {
        match self {
            AnalysisKind::CoralHealth => "Coral Health Check",
            AnalysisKind::DebrisDetection => "Detect Debris",
        }
    }
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An image payload bound for an inference endpoint.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("image is {actual} bytes; the limit is {limit} bytes")]
    TooLarge { actual: usize, limit: usize },
    #[error("'{0}' does not look like a supported image (jpg, png, webp)")]
    UnsupportedImage(String),
    #[error("invalid endpoint url '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        source: url::ParseError,
    },
    #[error("analysis request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("analysis service returned status {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Clone)]
pub struct AnalysisEndpoints {
    pub coral_health: Url,
    pub debris_detection: Url,
}

impl AnalysisEndpoints {
    pub fn from_urls(coral_health: &str, debris_detection: &str) -> Result<Self, AnalysisError> {
        Ok(Self {
            coral_health: parse_endpoint(coral_health)?,
            debris_detection: parse_endpoint(debris_detection)?,
        })
    }

    pub fn url_for(&self, kind: AnalysisKind) -> &Url {
        match kind {
            AnalysisKind::CoralHealth => &self.coral_health,
            AnalysisKind::DebrisDetection => &self.debris_detection,
        }
    }
}

impl Default for AnalysisEndpoints {
    fn default() -> Self {
        Self::from_urls(DEFAULT_CORAL_HEALTH_URL, DEFAULT_DEBRIS_DETECTION_URL)
            .expect("default endpoint urls parse")
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, AnalysisError> {
    Url::parse(raw).map_err(|source| AnalysisError::InvalidEndpoint {
        url: raw.to_string(),
        source,
    })
}

/// Validates an upload before any network traffic. The services only accept
/// image payloads, so obvious non-images are rejected locally.
pub fn validate_upload(upload: &ImageUpload) -> Result<(), AnalysisError> {
    if upload.bytes.len() > MAX_IMAGE_BYTES {
        return Err(AnalysisError::TooLarge {
            actual: upload.bytes.len(),
            limit: MAX_IMAGE_BYTES,
        });
    }

    let mime_is_image = upload
        .mime_type
        .as_deref()
        .is_some_and(|mime| mime.starts_with("image/"));
    let extension_is_supported = upload
        .filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()));

    if mime_is_image || extension_is_supported {
        Ok(())
    } else {
        Err(AnalysisError::UnsupportedImage(upload.filename.clone()))
    }
}

/// Thin client for the two inference services. The services are opaque: an
/// image goes in as a multipart form, arbitrary JSON comes back and is
/// rendered verbatim by the caller.
pub struct AnalysisClient {
    http: Client,
    endpoints: AnalysisEndpoints,
}

impl AnalysisClient {
    pub fn new(endpoints: AnalysisEndpoints) -> Self {
        let http = Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { http, endpoints }
    }

    pub fn with_timeout(endpoints: AnalysisEndpoints, timeout: Duration) -> Self {
        let http = Client::builder().timeout(timeout).build().unwrap_or_default();
        Self { http, endpoints }
    }

    pub fn endpoints(&self) -> &AnalysisEndpoints {
        &self.endpoints
    }

    pub async fn analyze(
        &self,
        kind: AnalysisKind,
        upload: ImageUpload,
    ) -> Result<Value, AnalysisError> {
        validate_upload(&upload)?;

        let url = self.endpoints.url_for(kind).clone();
        debug!(%kind, %url, bytes = upload.bytes.len(), "uploading image for analysis");

        let mut part = Part::bytes(upload.bytes).file_name(upload.filename);
        if let Some(mime) = &upload.mime_type {
            part = part.mime_str(mime)?;
        }
        let form = Form::new().part("file", part);

        let response = self.http.post(url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value = response.json::<Value>().await?;
        info!(%kind, "analysis completed");
        Ok(value)
    }
}

#[cfg(test)]
mod tests;
