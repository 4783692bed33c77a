//! Map marker synchronization.
//!
//! [`MapProvider`] abstracts the map widget; [`MapController`] owns one and
//! projects the visible facility list and reference location onto it.

pub mod controller;
pub mod provider;

pub use controller::{MapController, MapViewState, RenderSummary};
pub use provider::{MapProvider, MarkerKind};
