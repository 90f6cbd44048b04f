//! Repositioning surcharge for destinations between the inner and outer rings.
//!
//! Only one leg of the driver's empty return to the dispatch hub is charged
//! to the rider, hence the halving.

use crate::haversine::haversine_km;
use crate::models::Coordinate;
use crate::zone::ZoneStatus;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeadheadResult {
    pub charge: f64,
    pub distance_km: f64,
}

impl DeadheadResult {
    pub const NONE: DeadheadResult = DeadheadResult {
        charge: 0.0,
        distance_km: 0.0,
    };
}

#[derive(Debug, Clone, Copy)]
pub struct DeadheadCalculator {
    reference_point: Coordinate,
}

impl DeadheadCalculator {
    pub fn new(reference_point: Coordinate) -> Self {
        Self { reference_point }
    }

    pub fn reference_point(&self) -> Coordinate {
        self.reference_point
    }

    pub fn compute(
        &self,
        destination: Coordinate,
        zone_status: ZoneStatus,
        per_km_rate: f64,
    ) -> DeadheadResult {
        if zone_status != ZoneStatus::BetweenRings {
            return DeadheadResult::NONE;
        }
        let distance_km = haversine_km(destination, self.reference_point);
        DeadheadResult {
            charge: (distance_km / 2.0) * per_km_rate,
            distance_km,
        }
    }
}
