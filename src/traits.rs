//! Collaborator seams consumed by the engine.
//!
//! Both are injected at construction time so calculators and the facade can
//! be exercised with in-process fakes.

use std::time::Duration;

use crate::error::{OracleError, StoreError};
use crate::models::{
    Coordinate, OutstationPerKmConfig, OutstationSlabTable, TariffConfig, VehicleType, Zone,
};
use crate::polyline::Polyline;

/// Read-only view of the externally administered tariff configuration.
///
/// `Ok(None)` means the store answered but has no row for the vehicle type;
/// `Err` means the store could not be reached. Implementations must give up
/// once `timeout` has elapsed and return [`StoreError::TimedOut`].
pub trait TariffStore: Send + Sync {
    fn tariff(
        &self,
        vehicle_type: &VehicleType,
        timeout: Duration,
    ) -> Result<Option<TariffConfig>, StoreError>;

    fn outstation_slab_table(
        &self,
        vehicle_type: &VehicleType,
        timeout: Duration,
    ) -> Result<Option<OutstationSlabTable>, StoreError>;

    fn outstation_per_km_config(
        &self,
        vehicle_type: &VehicleType,
        timeout: Duration,
    ) -> Result<Option<OutstationPerKmConfig>, StoreError>;

    fn active_zones(&self, timeout: Duration) -> Result<Vec<Zone>, StoreError>;
}

/// Road-network answer for a single origin/destination pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Directions {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub polyline: Polyline,
}

/// Road routing backend.
///
/// Implementations must give up once `timeout` has elapsed.
pub trait RouteOracle: Send + Sync {
    fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        timeout: Duration,
    ) -> Result<Directions, OracleError>;
}
