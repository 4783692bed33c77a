//! Keeps a [`MapProvider`] consistent with the visible facility list.
//!
//! The controller is the only owner of the provider. Every render goes
//! through [`MapController::reconcile`], which clears the previous facility
//! markers before adding new ones, so markers never accumulate across
//! updates.

use std::collections::{HashMap, HashSet};

use petmap_core::{Bounds, Coordinate, Facility, FacilityId};

use crate::provider::{MapProvider, MarkerKind};

/// Center, zoom and markers currently on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewState<K> {
    pub center: Coordinate,
    pub zoom: u8,
    pub facility_markers: HashMap<FacilityId, K>,
    pub reference: Option<(Coordinate, K)>,
}

/// Counts from one [`MapController::reconcile`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSummary {
    pub removed: usize,
    pub added: usize,
    pub fitted: bool,
}

pub struct MapController<M: MapProvider> {
    provider: M,
    max_zoom: u8,
    view: MapViewState<M::Marker>,
    clicks: HashMap<M::Marker, FacilityId>,
}

impl<M: MapProvider> MapController<M> {
    /// Takes ownership of `provider` and moves it to the initial viewport.
    ///
    /// `zoom` is clamped to `max_zoom`.
    pub fn new(mut provider: M, center: Coordinate, zoom: u8, max_zoom: u8) -> Self {
        let zoom = zoom.min(max_zoom);
        provider.pan_to(center);
        provider.set_zoom(zoom);
        Self {
            provider,
            max_zoom,
            view: MapViewState {
                center,
                zoom,
                facility_markers: HashMap::new(),
                reference: None,
            },
            clicks: HashMap::new(),
        }
    }

    #[must_use]
    pub fn view(&self) -> &MapViewState<M::Marker> {
        &self.view
    }

    #[must_use]
    pub fn provider(&self) -> &M {
        &self.provider
    }

    #[must_use]
    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    /// Facility behind a clicked marker. `None` for the reference marker or
    /// a marker from an earlier render.
    #[must_use]
    pub fn facility_for(&self, marker: M::Marker) -> Option<&FacilityId> {
        self.clicks.get(&marker)
    }

    /// Replaces the rendered markers with `visible` plus the optional
    /// `reference` location and frames them.
    ///
    /// The reference marker is only recreated when the location changed.
    /// With nothing to show the viewport is left where it was.
    pub fn reconcile<'a, I>(&mut self, visible: I, reference: Option<Coordinate>) -> RenderSummary
    where
        I: IntoIterator<Item = &'a Facility>,
    {
        let mut summary = RenderSummary::default();

        for (_, marker) in self.view.facility_markers.drain() {
            self.provider.remove_marker(marker);
            summary.removed += 1;
        }
        self.clicks.clear();

        let reference_changed = self.view.reference.map(|(at, _)| at) != reference;
        if reference_changed {
            if let Some((_, marker)) = self.view.reference.take() {
                self.provider.remove_marker(marker);
                summary.removed += 1;
            }
        }

        let mut bounds = Bounds::empty();
        let mut seen = HashSet::new();
        for facility in visible {
            if !seen.insert(&facility.id) {
                tracing::debug!(id = %facility.id, "duplicate facility in render list");
                continue;
            }
            let marker = self
                .provider
                .add_marker(facility.position, MarkerKind::Facility);
            self.view
                .facility_markers
                .insert(facility.id.clone(), marker);
            self.clicks.insert(marker, facility.id.clone());
            bounds.extend(facility.position);
            summary.added += 1;
        }

        if let Some(at) = reference {
            if self.view.reference.is_none() {
                let marker = self.provider.add_marker(at, MarkerKind::Reference);
                self.view.reference = Some((at, marker));
                summary.added += 1;
            }
            bounds.extend(at);
        }

        if let Some(center) = bounds.center() {
            self.provider.fit_bounds(&bounds);
            if self.provider.zoom() > self.max_zoom {
                self.provider.set_zoom(self.max_zoom);
            }
            self.view.center = center;
            self.view.zoom = self.provider.zoom();
            summary.fitted = true;
        }

        tracing::debug!(
            removed = summary.removed,
            added = summary.added,
            fitted = summary.fitted,
            "map reconciled"
        );
        summary
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
