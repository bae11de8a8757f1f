use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique reef identifier within the catalog. There is no numeric id; the
/// name is the join key between a record and its on-map marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReefName(pub String);

impl ReefName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReefName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
}

/// A position in decimal degrees, longitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Result<Self, DomainError> {
        if !(-180.0..=180.0).contains(&lon) {
            return Err(DomainError::LongitudeOutOfRange(lon));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::LatitudeOutOfRange(lat));
        }
        Ok(Self { lon, lat })
    }

    pub fn is_valid(&self) -> bool {
        (-180.0..=180.0).contains(&self.lon) && (-90.0..=90.0).contains(&self.lat)
    }

    /// Display form used by the info panel, e.g. `-16.2839°`.
    pub fn formatted_lat(&self) -> String {
        format!("{:.4}\u{b0}", self.lat)
    }

    pub fn formatted_lon(&self) -> String {
        format!("{:.4}\u{b0}", self.lon)
    }
}

/// Conservation status of a reef. The set is open-ended: values outside the
/// known ones survive as `Other` and render with a default style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReefStatus {
    Critical,
    Threatened,
    Vulnerable,
    Stable,
    Protected,
    Recovering,
    Other(String),
}

impl ReefStatus {
    pub fn label(&self) -> &str {
        match self {
            ReefStatus::Critical => "Critical",
            ReefStatus::Threatened => "Threatened",
            ReefStatus::Vulnerable => "Vulnerable",
            ReefStatus::Stable => "Stable",
            ReefStatus::Protected => "Protected",
            ReefStatus::Recovering => "Recovering",
            ReefStatus::Other(label) => label,
        }
    }
}

impl From<String> for ReefStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Critical" => ReefStatus::Critical,
            "Threatened" => ReefStatus::Threatened,
            "Vulnerable" => ReefStatus::Vulnerable,
            "Stable" => ReefStatus::Stable,
            "Protected" => ReefStatus::Protected,
            "Recovering" => ReefStatus::Recovering,
            _ => ReefStatus::Other(value),
        }
    }
}

impl From<&str> for ReefStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ReefStatus> for String {
    fn from(value: ReefStatus) -> Self {
        value.label().to_string()
    }
}

impl std::fmt::Display for ReefStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One catalog entry describing a coral-reef location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReefRecord {
    pub name: ReefName,
    pub coordinates: GeoPoint,
    pub country: String,
    pub status: ReefStatus,
    pub description: String,
}
