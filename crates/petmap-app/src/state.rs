//! Application state and the values derived from it.

use petmap_core::{
    CategoryGroups, CompiledFilter, Coordinate, District, Facility, FacilityId, FilterSelection,
};

/// Progressive-disclosure stage. Categories stay inert until a location
/// (a district, "all", or the device) has been chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionStage {
    #[default]
    Unselected,
    LocationChosen,
    CategoryChosen,
}

/// User-facing condition raised by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A backend call failed. Carries the error text.
    Network(String),
    LocationUnavailable,
    /// The session token is missing or was rejected; log in again.
    AuthRequired,
}

impl Notice {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Notice::Network(detail) => format!("요청에 실패했습니다: {detail}"),
            Notice::LocationUnavailable => {
                "위치 정보를 가져오는 데 실패했습니다. 위치 권한을 확인해주세요.".to_string()
            }
            Notice::AuthRequired => "로그인이 필요합니다.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub stage: SelectionStage,
    pub districts: Vec<District>,
    pub selection: FilterSelection,
    /// Center of the device or district location currently in effect.
    pub reference: Option<Coordinate>,
    pub using_device_location: bool,
    /// Last applied backend result.
    pub facilities: Vec<Facility>,
    pub selected: Option<FacilityId>,
    /// Detail record for `selected`, once loaded.
    pub detail: Option<Facility>,
    pub loading: bool,
    pub(crate) fetch_seq: u64,
    pub(crate) location_seq: u64,
}

impl AppState {
    /// Sequence number of the most recently issued facility fetch.
    #[must_use]
    pub fn fetch_seq(&self) -> u64 {
        self.fetch_seq
    }

    #[must_use]
    pub fn location_seq(&self) -> u64 {
        self.location_seq
    }

    #[must_use]
    pub fn district(&self, key: &str) -> Option<&District> {
        self.districts.iter().find(|d| d.key() == key)
    }

    /// Facilities passing the current selection, in backend order. Records
    /// labelled with the selected district's display name count as in it.
    #[must_use]
    pub fn visible<'a>(&'a self, groups: &CategoryGroups) -> Vec<&'a Facility> {
        let name = self
            .selection
            .district
            .as_deref()
            .and_then(|key| self.district(key))
            .map(|d| d.name.as_str());
        let filter = CompiledFilter::new(&self.selection, groups).with_district_name(name);
        self.facilities.iter().filter(|f| filter.matches(f)).collect()
    }

    /// Text for an empty result list, or `None` when there is nothing to
    /// explain yet.
    #[must_use]
    pub fn empty_message(&self, groups: &CategoryGroups) -> Option<String> {
        if self.stage == SelectionStage::Unselected
            || self.loading
            || !self.visible(groups).is_empty()
        {
            return None;
        }
        let message = if let Some(key) = &self.selection.district {
            let name = self.district(key).map_or(key.as_str(), |d| d.name.as_str());
            format!("'{name}'에 해당 시설이 없습니다.")
        } else if self.using_device_location {
            "내 위치 근방에 해당 시설이 없습니다.".to_string()
        } else {
            "검색 또는 필터링 결과가 없습니다.".to_string()
        };
        Some(message)
    }
}
