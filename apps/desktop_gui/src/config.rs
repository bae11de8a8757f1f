use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use url::Url;

/// Default world basemap imagery fetched once per process as the map
/// capability's backing resource.
const DEFAULT_BASEMAP_URL: &str = "https://upload.wikimedia.org/wikipedia/commons/thumb/8/83/Equirectangular_projection_SW.jpg/1280px-Equirectangular_projection_SW.jpg";

const SETTINGS_FILE: &str = "coralwatch.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub basemap_url: String,
    pub coral_health_endpoint: String,
    pub debris_detection_endpoint: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let endpoints = analysis_client::AnalysisEndpoints::default();
        Self {
            basemap_url: DEFAULT_BASEMAP_URL.into(),
            coral_health_endpoint: endpoints.coral_health.to_string(),
            debris_detection_endpoint: endpoints.debris_detection.to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn basemap(&self) -> anyhow::Result<Url> {
        Url::parse(&self.basemap_url)
            .map_err(|err| anyhow::anyhow!("invalid basemap url '{}': {err}", self.basemap_url))
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    basemap_url: Option<String>,
    coral_health_endpoint: Option<String>,
    debris_detection_endpoint: Option<String>,
    request_timeout_secs: Option<u64>,
}

pub fn load_settings(settings_file: Option<&Path>) -> Settings {
    let mut settings = Settings::default();

    let path = settings_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| SETTINGS_FILE.into());
    if let Ok(raw) = fs::read_to_string(&path) {
        apply_file_config(&mut settings, &raw);
    }

    apply_env_overrides(&mut settings);
    settings
}

fn apply_file_config(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<FileConfig>(raw) else {
        tracing::warn!("ignoring malformed settings file");
        return;
    };
    if let Some(v) = file_cfg.basemap_url {
        settings.basemap_url = v;
    }
    if let Some(v) = file_cfg.coral_health_endpoint {
        settings.coral_health_endpoint = v;
    }
    if let Some(v) = file_cfg.debris_detection_endpoint {
        settings.debris_detection_endpoint = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
}

fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(v) = std::env::var("APP__BASEMAP_URL") {
        settings.basemap_url = v;
    }
    if let Ok(v) = std::env::var("APP__CORAL_HEALTH_ENDPOINT") {
        settings.coral_health_endpoint = v;
    }
    if let Ok(v) = std::env::var("APP__DEBRIS_DETECTION_ENDPOINT") {
        settings.debris_detection_endpoint = v;
    }
    if let Ok(v) = std::env::var("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let mut settings = Settings::default();
        apply_file_config(
            &mut settings,
            r#"
basemap_url = "https://tiles.example.org/world.png"
coral_health_endpoint = "https://inference.example.org/coral"
request_timeout_secs = 30
"#,
        );

        assert_eq!(settings.basemap_url, "https://tiles.example.org/world.png");
        assert_eq!(
            settings.coral_health_endpoint,
            "https://inference.example.org/coral"
        );
        assert_eq!(settings.request_timeout_secs, 30);
        // Untouched keys keep their defaults.
        assert_eq!(
            settings.debris_detection_endpoint,
            Settings::default().debris_detection_endpoint
        );
    }

    #[test]
    fn malformed_settings_file_is_ignored() {
        let mut settings = Settings::default();
        apply_file_config(&mut settings, "this is not toml = = =");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn default_basemap_url_parses() {
        assert!(Settings::default().basemap().is_ok());
        let broken = Settings {
            basemap_url: "not a url".into(),
            ..Settings::default()
        };
        assert!(broken.basemap().is_err());
    }

    #[test]
    fn request_timeout_never_collapses_to_zero() {
        let settings = Settings {
            request_timeout_secs: 0,
            ..Settings::default()
        };
        assert_eq!(settings.request_timeout(), Duration::from_secs(1));
    }
}
