//! Reference-location resolution from the device or a district.

use std::future::Future;

use petmap_core::{Coordinate, District};
use thiserror::Error;

/// Why the platform could not report a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("timed out waiting for a position")]
    Timeout,
    #[error("geolocation is not supported on this platform")]
    Unsupported,
}

/// Platform geolocation capability.
pub trait Geolocator: Send + Sync {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<Coordinate, GeolocationError>> + Send;
}

/// Where the reference location should come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationMode {
    Device,
    /// District identified by its stable key (see [`District::key`]).
    District(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("device location unavailable: {0}")]
    LocationUnavailable(#[source] GeolocationError),

    #[error("district {district} has no stored coordinate")]
    DistrictCoordinateMissing { district: String },

    #[error("unknown district {district}")]
    UnknownDistrict { district: String },
}

/// Resolves `mode` to a coordinate.
///
/// District lookup matches the stable key exactly. A district without a
/// stored coordinate is an error; no default position is substituted.
///
/// # Errors
///
/// - [`LocationError::LocationUnavailable`] when the geolocator fails.
/// - [`LocationError::DistrictCoordinateMissing`] when the district has no
///   coordinate.
/// - [`LocationError::UnknownDistrict`] when no district has the key.
pub async fn resolve_location<G: Geolocator>(
    mode: &LocationMode,
    districts: &[District],
    geolocator: &G,
) -> Result<Coordinate, LocationError> {
    match mode {
        LocationMode::Device => geolocator.current_position().await.map_err(|e| {
            tracing::warn!(error = %e, "device geolocation failed");
            LocationError::LocationUnavailable(e)
        }),
        LocationMode::District(key) => {
            let district = districts
                .iter()
                .find(|d| d.key() == key)
                .ok_or_else(|| LocationError::UnknownDistrict {
                    district: key.clone(),
                })?;
            district
                .coordinate()
                .ok_or_else(|| LocationError::DistrictCoordinateMissing {
                    district: key.clone(),
                })
        }
    }
}
