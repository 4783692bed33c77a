use serde::{Deserialize, Serialize};

use crate::facility::FacilityId;
use crate::geo::Coordinate;

/// An administrative district offered as a coarse location filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    pub id: FacilityId,
    /// Display name; not guaranteed unique or stable.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popular_services: Option<String>,
    #[serde(default, alias = "Latitude", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "Longitude", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl District {
    /// Stable key sent to the backend and matched against facility districts.
    #[must_use]
    pub fn key(&self) -> &str {
        self.en_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.name)
    }

    /// Stored reference coordinate, if both halves are present and valid.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Coordinate::new(lat, lon).ok(),
            _ => None,
        }
    }
}
