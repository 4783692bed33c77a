//! Inputs to the store and the work it asks the runtime to perform.

use petmap_client::{ClientError, FilterRequest};
use petmap_core::{CategoryKey, Coordinate, District, Facility, FacilityId};
use thiserror::Error;

use crate::location::{LocationError, LocationMode};
use crate::state::Notice;

/// Why a facility fetch produced no list.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Search had neither a device position nor a fallback origin.
    #[error("no location to search around")]
    NoSearchOrigin,
}

#[derive(Debug)]
pub enum Action {
    DistrictsLoaded(Result<Vec<District>, ClientError>),
    /// Choose a district by stable key; `None` is the explicit "all" choice.
    SelectDistrict(Option<String>),
    UseDeviceLocation,
    ClearLocation,
    ToggleCategory(CategoryKey),
    ClearCategories,
    /// Local free-text refinement of the loaded list. Never fetches.
    SetQuery(String),
    /// Backend free-text search around the device location.
    Search(String),
    SelectFacility(Option<FacilityId>),
    FacilitiesLoaded {
        seq: u64,
        result: Result<Vec<Facility>, FetchError>,
    },
    LocationResolved {
        seq: u64,
        mode: LocationMode,
        result: Result<Coordinate, LocationError>,
    },
    DetailLoaded {
        id: FacilityId,
        result: Result<Facility, ClientError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadDistricts,
    FetchFiltered {
        seq: u64,
        request: FilterRequest,
    },
    /// Resolve the device position, then search around it (or `fallback`).
    /// Reports back as a `LocationResolved` with `location_seq` followed by
    /// a `FacilitiesLoaded` with `seq`.
    SearchNearDevice {
        seq: u64,
        location_seq: u64,
        query: String,
        fallback: Option<Coordinate>,
    },
    ResolveLocation {
        seq: u64,
        mode: LocationMode,
    },
    LoadDetail(FacilityId),
    /// Visible facilities or the reference location changed.
    Render,
    Notify(Notice),
}
