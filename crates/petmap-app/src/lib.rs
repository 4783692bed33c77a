//! View orchestration for the facility finder.
//!
//! [`Store`] holds the single [`AppState`] and reduces [`Action`]s into
//! [`Effect`]s. [`Runtime`] executes those effects against a
//! [`FacilityBackend`](petmap_client::FacilityBackend), a [`Geolocator`] and
//! the map controller.

pub mod action;
pub mod location;
pub mod runtime;
pub mod state;
pub mod store;

pub use action::{Action, Effect, FetchError};
pub use location::{resolve_location, GeolocationError, Geolocator, LocationError, LocationMode};
pub use runtime::Runtime;
pub use state::{AppState, Notice, SelectionStage};
pub use store::Store;
