//! The capability surface a map widget has to offer.

use std::fmt::Debug;
use std::hash::Hash;

use petmap_core::{Bounds, Coordinate};

/// What a marker stands for. Rendered differently by the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Facility,
    /// The user's current reference location (device or district center).
    Reference,
}

/// A map surface that can hold markers and move its viewport.
///
/// Zoom is expressed as closeness: larger values show a smaller area.
pub trait MapProvider {
    /// Handle returned by [`MapProvider::add_marker`]; used to remove the
    /// marker again and to identify clicks.
    type Marker: Copy + Eq + Hash + Debug;

    fn add_marker(&mut self, position: Coordinate, kind: MarkerKind) -> Self::Marker;

    fn remove_marker(&mut self, marker: Self::Marker);

    fn fit_bounds(&mut self, bounds: &Bounds);

    fn zoom(&self) -> u8;

    fn set_zoom(&mut self, zoom: u8);

    fn pan_to(&mut self, center: Coordinate);
}
