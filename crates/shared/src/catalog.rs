use std::collections::HashSet;

use thiserror::Error;

use crate::domain::{GeoPoint, ReefName, ReefRecord, ReefStatus};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("duplicate reef name '{0}' in catalog")]
    DuplicateName(String),
    #[error("reef '{name}' has coordinates outside valid ranges: ({lon}, {lat})")]
    InvalidCoordinates { name: String, lon: f64, lat: f64 },
}

/// Immutable list of reef records, validated at construction. Names are
/// unique and coordinates are in range; the rest of the system relies on
/// both invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct ReefCatalog {
    records: Vec<ReefRecord>,
}

impl ReefCatalog {
    pub fn from_records(records: Vec<ReefRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.name.clone()) {
                return Err(CatalogError::DuplicateName(record.name.0.clone()));
            }
            if !record.coordinates.is_valid() {
                return Err(CatalogError::InvalidCoordinates {
                    name: record.name.0.clone(),
                    lon: record.coordinates.lon,
                    lat: record.coordinates.lat,
                });
            }
        }
        Ok(Self { records })
    }

    /// The reef locations shipped with the application.
    pub fn builtin() -> Self {
        let records = vec![
            reef(
                "Great Barrier Reef",
                145.7781,
                -16.2839,
                "Australia",
                ReefStatus::Vulnerable,
                "The world's largest coral reef system",
            ),
            reef(
                "Mesoamerican Reef",
                -87.5,
                18.0,
                "Caribbean",
                ReefStatus::Threatened,
                "Second largest barrier reef in the world",
            ),
            reef(
                "Coral Triangle",
                120.0,
                -2.0,
                "Southeast Asia",
                ReefStatus::Critical,
                "Marine biodiversity hotspot",
            ),
            reef(
                "Red Sea Coral Reef",
                38.0,
                20.0,
                "Red Sea",
                ReefStatus::Stable,
                "Remarkably resilient coral ecosystem",
            ),
            reef(
                "New Caledonia Barrier Reef",
                165.0,
                -21.0,
                "New Caledonia",
                ReefStatus::Protected,
                "UNESCO World Heritage site",
            ),
            reef(
                "Florida Keys Reef",
                -80.5,
                24.7,
                "USA",
                ReefStatus::Recovering,
                "Third largest barrier reef system",
            ),
        ];
        Self::from_records(records).expect("builtin catalog satisfies its own invariants")
    }

    pub fn get(&self, name: &ReefName) -> Option<&ReefRecord> {
        self.records.iter().find(|record| &record.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReefRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn reef(
    name: &str,
    lon: f64,
    lat: f64,
    country: &str,
    status: ReefStatus,
    description: &str,
) -> ReefRecord {
    ReefRecord {
        name: ReefName::from(name),
        coordinates: GeoPoint { lon, lat },
        country: country.to_string(),
        status,
        description: description.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid_and_has_six_reefs() {
        let catalog = ReefCatalog::builtin();
        assert_eq!(catalog.len(), 6);
        assert!(!catalog.is_empty());

        let gbr = catalog
            .get(&ReefName::from("Great Barrier Reef"))
            .expect("catalog entry");
        assert_eq!(gbr.country, "Australia");
        assert_eq!(gbr.status, ReefStatus::Vulnerable);
        assert_eq!(gbr.coordinates.lon, 145.7781);
        assert_eq!(gbr.coordinates.lat, -16.2839);
    }

    #[test]
    fn lookup_by_unknown_name_is_none() {
        let catalog = ReefCatalog::builtin();
        assert!(catalog.get(&ReefName::from("Atlantis Reef")).is_none());
    }

    #[test]
    fn rejects_duplicate_names() {
        let records = vec![
            reef("Twin Reef", 10.0, 10.0, "A", ReefStatus::Stable, "first"),
            reef("Twin Reef", 20.0, 20.0, "B", ReefStatus::Critical, "second"),
        ];
        assert_eq!(
            ReefCatalog::from_records(records),
            Err(CatalogError::DuplicateName("Twin Reef".to_string()))
        );
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let records = vec![reef(
            "Nowhere Reef",
            200.0,
            10.0,
            "Nowhere",
            ReefStatus::Stable,
            "off the edge of the world",
        )];
        assert_eq!(
            ReefCatalog::from_records(records),
            Err(CatalogError::InvalidCoordinates {
                name: "Nowhere Reef".to_string(),
                lon: 200.0,
                lat: 10.0,
            })
        );
    }
}
