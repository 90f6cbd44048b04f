//! Locations around Hosur used as pickups and destinations.
//!
//! Grouped by where they fall relative to the fixture rings: the inner
//! square around the hub, the band up to the 25 km outer circle, and
//! outstation destinations beyond it.

use fare_engine::Coordinate;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng).unwrap()
    }
}

/// Default dispatch hub and deadhead reference point.
pub const HUB: Location = Location::new("Hosur dispatch hub", 12.74, 77.83);

// ============================================================================
// Inside the inner ring
// ============================================================================

pub const CITY: &[Location] = &[
    Location::new("Hosur bus stand", 12.7357, 77.8295),
    Location::new("Hosur railway station", 12.7456, 77.8226),
    Location::new("SIPCOT phase I", 12.7300, 77.8500),
    Location::new("Rayakottai road junction", 12.7600, 77.8500),
];

// ============================================================================
// Between the inner and outer rings
// ============================================================================

pub const SUBURBS: &[Location] = &[
    Location::new("Bagalur", 12.8333, 77.8667),
    Location::new("Attibele", 12.7792, 77.7720),
    Location::new("Shoolagiri", 12.6667, 78.0167),
];

// ============================================================================
// Beyond the outer ring
// ============================================================================

pub const OUTSTATION: &[Location] = &[
    Location::new("Krishnagiri", 12.5186, 78.2137),
    Location::new("Bengaluru Majestic", 12.9767, 77.5713),
    Location::new("Dharmapuri", 12.1277, 78.1580),
];
