//! The reducer. Every state change goes through [`Store::dispatch`], which
//! returns the effects the runtime has to carry out.
//!
//! Facility fetches and location resolutions each carry a sequence number.
//! A completion is applied only when its number is still the latest issued,
//! so a slow response can never overwrite the result of a newer request.

use petmap_client::{ClientError, FilterRequest};
use petmap_core::{
    CategoryGroups, CategoryKey, Coordinate, District, Facility, FacilityId, FilterSelection,
};

use crate::action::{Action, Effect, FetchError};
use crate::location::{LocationError, LocationMode};
use crate::state::{AppState, Notice, SelectionStage};

pub struct Store {
    state: AppState,
    groups: CategoryGroups,
    search_origin: Option<Coordinate>,
}

impl Store {
    /// `search_origin` is the last-resort center for free-text search when
    /// neither the device nor a previous reference location is available.
    #[must_use]
    pub fn new(groups: CategoryGroups, search_origin: Option<Coordinate>) -> Self {
        Self {
            state: AppState::default(),
            groups,
            search_origin,
        }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn groups(&self) -> &CategoryGroups {
        &self.groups
    }

    #[must_use]
    pub fn visible(&self) -> Vec<&Facility> {
        self.state.visible(&self.groups)
    }

    #[must_use]
    pub fn empty_message(&self) -> Option<String> {
        self.state.empty_message(&self.groups)
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::DistrictsLoaded(result) => self.districts_loaded(result),
            Action::SelectDistrict(key) => self.select_district(key),
            Action::UseDeviceLocation => self.use_device_location(),
            Action::ClearLocation => self.clear_location(),
            Action::ToggleCategory(key) => self.toggle_category(key),
            Action::ClearCategories => self.clear_categories(),
            Action::SetQuery(query) => self.set_query(query),
            Action::Search(query) => self.search(&query),
            Action::SelectFacility(id) => self.select_facility(id),
            Action::FacilitiesLoaded { seq, result } => self.facilities_loaded(seq, result),
            Action::LocationResolved { seq, mode, result } => {
                self.location_resolved(seq, &mode, result)
            }
            Action::DetailLoaded { id, result } => self.detail_loaded(&id, result),
        }
    }

    fn districts_loaded(&mut self, result: Result<Vec<District>, ClientError>) -> Vec<Effect> {
        match result {
            Ok(districts) => {
                tracing::info!(count = districts.len(), "districts loaded");
                self.state.districts = districts;
                Vec::new()
            }
            Err(e) => vec![Effect::Notify(notice_for(&e))],
        }
    }

    fn select_district(&mut self, key: Option<String>) -> Vec<Effect> {
        if let Some(k) = &key {
            if !self.state.districts.is_empty() && self.state.district(k).is_none() {
                tracing::warn!(district = %k, "ignoring unknown district");
                return Vec::new();
            }
        }

        let was_unselected = self.state.stage == SelectionStage::Unselected;
        if !was_unselected
            && !self.state.using_device_location
            && self.state.selection.district == key
        {
            return Vec::new();
        }

        let changed = self.state.selection.district != key;
        self.state.selection.district.clone_from(&key);
        self.state.using_device_location = false;
        self.state.reference = None;
        self.state.location_seq += 1;
        if was_unselected {
            self.state.stage = SelectionStage::LocationChosen;
        }

        let mut effects = Vec::new();
        if changed || was_unselected {
            effects.push(self.fetch_filtered());
        }
        if let Some(k) = key {
            effects.push(Effect::ResolveLocation {
                seq: self.state.location_seq,
                mode: LocationMode::District(k),
            });
        }
        effects.push(Effect::Render);
        effects
    }

    /// The device request shares the current location sequence number, so a
    /// district resolution still in flight stays valid until the device
    /// actually answers.
    fn use_device_location(&mut self) -> Vec<Effect> {
        vec![Effect::ResolveLocation {
            seq: self.state.location_seq,
            mode: LocationMode::Device,
        }]
    }

    fn clear_location(&mut self) -> Vec<Effect> {
        self.state.stage = SelectionStage::Unselected;
        self.state.selection = FilterSelection::default();
        self.state.reference = None;
        self.state.using_device_location = false;
        self.state.facilities.clear();
        self.state.selected = None;
        self.state.detail = None;
        self.state.loading = false;
        // Anything still in flight belongs to the old selection.
        self.state.fetch_seq += 1;
        self.state.location_seq += 1;
        vec![Effect::Render]
    }

    fn toggle_category(&mut self, key: CategoryKey) -> Vec<Effect> {
        if self.state.stage == SelectionStage::Unselected {
            tracing::debug!(category = %key.as_str(), "category ignored before a location is chosen");
            return Vec::new();
        }
        self.state.selection.toggle_category(key);
        self.state.stage = SelectionStage::CategoryChosen;
        vec![self.fetch_filtered(), Effect::Render]
    }

    fn clear_categories(&mut self) -> Vec<Effect> {
        if self.state.selection.categories.is_empty() {
            return Vec::new();
        }
        self.state.selection.categories.clear();
        if self.state.stage == SelectionStage::CategoryChosen {
            self.state.stage = SelectionStage::LocationChosen;
        }
        vec![self.fetch_filtered(), Effect::Render]
    }

    fn set_query(&mut self, query: String) -> Vec<Effect> {
        if self.state.selection.query == query {
            return Vec::new();
        }
        self.state.selection.query = query;
        vec![Effect::Render]
    }

    fn search(&mut self, query: &str) -> Vec<Effect> {
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("ignoring empty search");
            return Vec::new();
        }

        self.state.selection = FilterSelection::default();
        self.state.stage = SelectionStage::LocationChosen;
        self.state.fetch_seq += 1;
        self.state.location_seq += 1;
        self.state.loading = true;

        vec![
            Effect::SearchNearDevice {
                seq: self.state.fetch_seq,
                location_seq: self.state.location_seq,
                query: query.to_string(),
                fallback: self.state.reference.or(self.search_origin),
            },
            Effect::Render,
        ]
    }

    fn select_facility(&mut self, id: Option<FacilityId>) -> Vec<Effect> {
        self.state.selected.clone_from(&id);
        self.state.detail = None;
        id.map(Effect::LoadDetail).into_iter().collect()
    }

    fn facilities_loaded(
        &mut self,
        seq: u64,
        result: Result<Vec<Facility>, FetchError>,
    ) -> Vec<Effect> {
        if seq != self.state.fetch_seq {
            tracing::debug!(seq, latest = self.state.fetch_seq, "discarding stale facility response");
            return Vec::new();
        }
        self.state.loading = false;

        match result {
            Ok(facilities) => {
                tracing::debug!(seq, count = facilities.len(), "facilities applied");
                if let Some(selected) = &self.state.selected {
                    if !facilities.iter().any(|f| &f.id == selected) {
                        self.state.selected = None;
                        self.state.detail = None;
                    }
                }
                self.state.facilities = facilities;
                vec![Effect::Render]
            }
            Err(FetchError::Client(e)) => {
                tracing::warn!(seq, error = %e, "facility fetch failed");
                vec![Effect::Notify(notice_for(&e))]
            }
            Err(FetchError::NoSearchOrigin) => {
                tracing::info!(seq, "search skipped without a location");
                Vec::new()
            }
        }
    }

    fn location_resolved(
        &mut self,
        seq: u64,
        mode: &LocationMode,
        result: Result<Coordinate, LocationError>,
    ) -> Vec<Effect> {
        if seq != self.state.location_seq {
            tracing::debug!(seq, latest = self.state.location_seq, "discarding stale location");
            return Vec::new();
        }

        match result {
            Ok(at) => {
                self.state.reference = Some(at);
                if *mode != LocationMode::Device {
                    return vec![Effect::Render];
                }
                // Device location and district selection are mutually exclusive.
                self.state.location_seq += 1;
                let district_cleared = self.state.selection.district.take().is_some();
                let was_unselected = self.state.stage == SelectionStage::Unselected;
                self.state.using_device_location = true;
                if was_unselected {
                    self.state.stage = SelectionStage::LocationChosen;
                }
                let mut effects = Vec::new();
                if district_cleared || was_unselected {
                    effects.push(self.fetch_filtered());
                }
                effects.push(Effect::Render);
                effects
            }
            Err(LocationError::LocationUnavailable(e)) => {
                tracing::warn!(error = %e, "keeping previous location");
                vec![Effect::Notify(Notice::LocationUnavailable)]
            }
            Err(e @ (LocationError::DistrictCoordinateMissing { .. }
            | LocationError::UnknownDistrict { .. })) => {
                tracing::warn!(error = %e, "district has no usable location");
                Vec::new()
            }
        }
    }

    fn detail_loaded(&mut self, id: &FacilityId, result: Result<Facility, ClientError>) -> Vec<Effect> {
        if self.state.selected.as_ref() != Some(id) {
            tracing::debug!(id = %id, "discarding detail for deselected facility");
            return Vec::new();
        }
        match result {
            Ok(facility) => {
                self.state.detail = Some(facility);
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "facility detail failed");
                vec![Effect::Notify(notice_for(&e))]
            }
        }
    }

    fn fetch_filtered(&mut self) -> Effect {
        self.state.fetch_seq += 1;
        self.state.loading = true;
        Effect::FetchFiltered {
            seq: self.state.fetch_seq,
            request: FilterRequest::from_selection(&self.state.selection, &self.groups),
        }
    }
}

fn notice_for(error: &ClientError) -> Notice {
    if error.is_auth_failure() {
        Notice::AuthRequired
    } else {
        Notice::Network(error.to_string())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
