//! WGS84 coordinates and the bounding boxes built from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
    #[error("expected \"lat,lon\", got \"{0}\"")]
    Format(String),
}

/// A validated WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lon)
    }
}

impl Coordinate {
    /// Builds a coordinate, rejecting non-finite or out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::Latitude`] or [`CoordinateError::Longitude`]
    /// when the value is NaN, infinite, or outside the WGS84 range.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::Latitude(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::Longitude(lon));
        }
        Ok(Self { lat, lon })
    }

    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[must_use]
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

/// Parses the `"lat,lon"` form used by env vars and CLI flags.
impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| CoordinateError::Format(s.to_string()))?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateError::Format(s.to_string()))?;
        let lon = lon
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateError::Format(s.to_string()))?;
        Coordinate::new(lat, lon)
    }
}

/// Axis-aligned lat/lon box. Starts empty and grows with [`Bounds::extend`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    extent: Option<(Coordinate, Coordinate)>,
}

impl Bounds {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, point: Coordinate) {
        self.extent = Some(match self.extent {
            None => (point, point),
            Some((sw, ne)) => (
                Coordinate {
                    lat: sw.lat.min(point.lat),
                    lon: sw.lon.min(point.lon),
                },
                Coordinate {
                    lat: ne.lat.max(point.lat),
                    lon: ne.lon.max(point.lon),
                },
            ),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extent.is_none()
    }

    #[must_use]
    pub fn south_west(&self) -> Option<Coordinate> {
        self.extent.map(|(sw, _)| sw)
    }

    #[must_use]
    pub fn north_east(&self) -> Option<Coordinate> {
        self.extent.map(|(_, ne)| ne)
    }

    #[must_use]
    pub fn center(&self) -> Option<Coordinate> {
        self.extent.map(|(sw, ne)| Coordinate {
            lat: (sw.lat + ne.lat) / 2.0,
            lon: (sw.lon + ne.lon) / 2.0,
        })
    }

    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        self.extent.is_some_and(|(sw, ne)| {
            (sw.lat..=ne.lat).contains(&point.lat) && (sw.lon..=ne.lon).contains(&point.lon)
        })
    }
}

impl FromIterator<Coordinate> for Bounds {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        let mut bounds = Bounds::empty();
        for point in iter {
            bounds.extend(point);
        }
        bounds
    }
}
