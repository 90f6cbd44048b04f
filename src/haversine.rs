//! Great-circle distance and the straight-line route estimate used when the
//! route oracle is unavailable.
//!
//! Less accurate than a road network answer (ignores roads) but always
//! available.

use crate::models::{Coordinate, RouteInfo, RouteSource};

/// Average driving speed assumption for time estimation.
pub const DEFAULT_SPEED_KMH: f64 = 30.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let (lat1, lng1) = from.as_tuple();
    let (lat2, lng2) = to.as_tuple();

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Estimates a route from straight-line distance and an assumed speed.
#[derive(Debug, Clone)]
pub struct HaversineEstimator {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineEstimator {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Travel time in minutes for `km` at the assumed speed.
    pub fn minutes_for(&self, km: f64) -> f64 {
        (km / self.speed_kmh) * 60.0
    }

    pub fn estimate(&self, from: Coordinate, to: Coordinate) -> RouteInfo {
        let distance_km = haversine_km(from, to);
        RouteInfo {
            distance_km,
            duration_minutes: self.minutes_for(distance_km),
            source: RouteSource::Haversine,
        }
    }
}
