//! Headless stand-ins for the map widget and the platform geolocator.

use std::future::Future;

use petmap_app::{GeolocationError, Geolocator};
use petmap_core::{Bounds, Coordinate};
use petmap_map::{MapProvider, MarkerKind};

/// Closest zoom the console map will report after fitting bounds.
const MAX_RENDER_ZOOM: u8 = 21;

/// Map provider that only logs what a real widget would draw.
#[derive(Debug, Default)]
pub struct ConsoleMap {
    next: u64,
    zoom: u8,
    center: Option<Coordinate>,
}

impl ConsoleMap {
    #[must_use]
    pub fn center(&self) -> Option<Coordinate> {
        self.center
    }
}

impl MapProvider for ConsoleMap {
    type Marker = u64;

    fn add_marker(&mut self, position: Coordinate, kind: MarkerKind) -> u64 {
        self.next += 1;
        tracing::debug!(marker = self.next, %position, ?kind, "marker added");
        self.next
    }

    fn remove_marker(&mut self, marker: u64) {
        tracing::debug!(marker, "marker removed");
    }

    fn fit_bounds(&mut self, bounds: &Bounds) {
        let (Some(sw), Some(ne)) = (bounds.south_west(), bounds.north_east()) else {
            return;
        };
        let span = (ne.lat() - sw.lat()).max(ne.lon() - sw.lon());
        self.zoom = zoom_for_span(span);
        self.center = bounds.center();
        tracing::debug!(%sw, %ne, zoom = self.zoom, "bounds fitted");
    }

    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom;
    }

    fn pan_to(&mut self, center: Coordinate) {
        self.center = Some(center);
    }
}

/// Web-mercator style zoom at which `span_deg` degrees fill the view.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn zoom_for_span(span_deg: f64) -> u8 {
    if span_deg <= 0.0 {
        return MAX_RENDER_ZOOM;
    }
    (360.0 / span_deg)
        .log2()
        .floor()
        .clamp(0.0, f64::from(MAX_RENDER_ZOOM)) as u8
}

/// Reports the position configured in `PETMAP_DEVICE_LOCATION`, or
/// [`GeolocationError::Unsupported`] when none is set.
#[derive(Debug, Clone, Copy)]
pub struct ConfigGeolocator {
    position: Option<Coordinate>,
}

impl ConfigGeolocator {
    #[must_use]
    pub fn new(position: Option<Coordinate>) -> Self {
        Self { position }
    }
}

impl Geolocator for ConfigGeolocator {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<Coordinate, GeolocationError>> + Send {
        let result = self.position.ok_or(GeolocationError::Unsupported);
        async move { result }
    }
}
