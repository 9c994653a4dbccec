//! Geographic value types shared by the request builder and the decoder.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// Renders as `lat,lon` with full float precision.
impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// An origin, destination or waypoint.
///
/// Named locations (place names, addresses, `place_id:` tokens) are passed to
/// the directions service verbatim, so callers can mix them with coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Coordinate(GeoPoint),
    Named(String),
}

impl Location {
    /// The query-parameter form of this location.
    pub fn to_param(&self) -> String {
        match self {
            Location::Coordinate(point) => point.to_string(),
            Location::Named(name) => name.clone(),
        }
    }
}

impl From<GeoPoint> for Location {
    fn from(point: GeoPoint) -> Self {
        Location::Coordinate(point)
    }
}

impl From<(f64, f64)> for Location {
    fn from(pair: (f64, f64)) -> Self {
        Location::Coordinate(pair.into())
    }
}

impl From<&str> for Location {
    fn from(name: &str) -> Self {
        Location::Named(name.to_string())
    }
}

impl From<String> for Location {
    fn from(name: String) -> Self {
        Location::Named(name)
    }
}
