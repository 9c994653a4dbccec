//! Real Las Vegas landmarks for route fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

use route_directions::{GeoPoint, Location};

/// A named landmark with coordinates.
#[derive(Debug, Clone)]
pub struct Landmark {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Landmark {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    pub fn location(&self) -> Location {
        Location::Coordinate(self.point())
    }
}

pub const WYNN: Landmark = Landmark::new("Wynn Las Vegas", 36.1263781, -115.1658180);
pub const MGM_GRAND: Landmark = Landmark::new("MGM Grand", 36.1023654, -115.1688720);
pub const BELLAGIO: Landmark = Landmark::new("Bellagio", 36.1126, -115.1767);
pub const CAESARS: Landmark = Landmark::new("Caesars Palace", 36.1162, -115.1745);
pub const HARD_ROCK_CAFE: Landmark = Landmark::new("Hard Rock Cafe", 36.1041592, -115.1722166);
pub const BROOKLYN_BOWL: Landmark = Landmark::new("Brooklyn Bowl", 36.1175388, -115.1695094);
