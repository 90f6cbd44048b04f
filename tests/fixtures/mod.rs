//! Test fixtures for fare-engine.
//!
//! Provides:
//! - Hosur-area locations around the default dispatch hub
//! - Tariff rows and ring zones matching those locations
//! - In-process store and oracle fakes with call counters

#![allow(dead_code)]

pub mod hosur_locations;

pub use hosur_locations::*;

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fare_engine::error::{OracleError, StoreError};
use fare_engine::models::{OutstationPerKmConfig, OutstationSlabTable, Slab};
use fare_engine::polyline::Polyline;
use fare_engine::store::InMemoryTariffStore;
use fare_engine::{
    Coordinate, Directions, RouteOracle, TariffConfig, TariffStore, VehicleType, Zone,
};

pub fn sedan_tariff() -> TariffConfig {
    TariffConfig {
        vehicle_type: VehicleType::new("sedan"),
        base_fare: 60.0,
        per_km_rate: 15.0,
        per_minute_rate: 2.0,
        minimum_fare: 100.0,
        surge_multiplier: 1.0,
        platform_fee_percent: 8.0,
    }
}

pub fn auto_tariff() -> TariffConfig {
    TariffConfig {
        vehicle_type: VehicleType::new("auto"),
        base_fare: 30.0,
        per_km_rate: 11.0,
        per_minute_rate: 1.0,
        minimum_fare: 40.0,
        surge_multiplier: 1.0,
        platform_fee_percent: 5.0,
    }
}

pub fn sedan_slab_table() -> OutstationSlabTable {
    OutstationSlabTable {
        vehicle_type: VehicleType::new("sedan"),
        use_slab_system: true,
        slabs: vec![
            Slab {
                coverage_km: 80.0,
                fixed_fare: 1800.0,
            },
            Slab {
                coverage_km: 120.0,
                fixed_fare: 2500.0,
            },
            Slab {
                coverage_km: 200.0,
                fixed_fare: 3600.0,
            },
        ],
        extra_km_rate: 13.0,
        driver_allowance_per_day: 300.0,
    }
}

pub fn sedan_per_km() -> OutstationPerKmConfig {
    OutstationPerKmConfig {
        vehicle_type: VehicleType::new("sedan"),
        per_km_rate: 14.0,
        driver_allowance_per_day: 400.0,
        daily_km_limit: 300.0,
    }
}

/// Square inner ring (~4.4 km half-width) and a 25 km circular outer ring,
/// both centred on the hub.
pub fn rings() -> Vec<Zone> {
    let (lat, lng) = (HUB.lat, HUB.lng);
    let half = 0.04;
    let corner = |dlat: f64, dlng: f64| Coordinate::new(lat + dlat, lng + dlng).unwrap();
    vec![
        Zone::polygon(
            "Inner Ring",
            vec![
                corner(-half, -half),
                corner(-half, half),
                corner(half, half),
                corner(half, -half),
            ],
        ),
        Zone::circle("Outer Ring", HUB.coordinate(), 25.0),
    ]
}

pub fn seeded_store() -> InMemoryTariffStore {
    let store = InMemoryTariffStore::new()
        .with_tariff(sedan_tariff())
        .with_tariff(auto_tariff())
        .with_slab_table(sedan_slab_table())
        .with_per_km_config(sedan_per_km());
    rings().into_iter().fold(store, |store, zone| store.with_zone(zone))
}

/// Store fake that can be taken offline or slowed down mid-test.
pub struct SwitchableStore {
    inner: InMemoryTariffStore,
    offline: AtomicBool,
    slabs_offline: AtomicBool,
    delay_ms: AtomicU64,
    pub calls: AtomicUsize,
}

impl SwitchableStore {
    pub fn new(inner: InMemoryTariffStore) -> Arc<Self> {
        Arc::new(Self {
            inner,
            offline: AtomicBool::new(false),
            slabs_offline: AtomicBool::new(false),
            delay_ms: AtomicU64::new(0),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn seeded() -> Arc<Self> {
        Self::new(seeded_store())
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Fails only slab table reads; every other query keeps answering.
    pub fn set_slabs_offline(&self, offline: bool) {
        self.slabs_offline.store(offline, Ordering::SeqCst);
    }

    /// Every call takes `delay`, giving up with `TimedOut` when the
    /// caller's budget is shorter.
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self, timeout: Duration) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        let delay = Duration::from_millis(self.delay_ms.load(Ordering::SeqCst));
        std::thread::sleep(delay.min(timeout));
        if delay > timeout {
            return Err(StoreError::TimedOut(timeout));
        }
        Ok(())
    }
}

impl TariffStore for SwitchableStore {
    fn tariff(
        &self,
        vehicle_type: &VehicleType,
        timeout: Duration,
    ) -> Result<Option<TariffConfig>, StoreError> {
        self.check(timeout)?;
        self.inner.tariff(vehicle_type, timeout)
    }

    fn outstation_slab_table(
        &self,
        vehicle_type: &VehicleType,
        timeout: Duration,
    ) -> Result<Option<OutstationSlabTable>, StoreError> {
        self.check(timeout)?;
        if self.slabs_offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("slab table unavailable".into()));
        }
        self.inner.outstation_slab_table(vehicle_type, timeout)
    }

    fn outstation_per_km_config(
        &self,
        vehicle_type: &VehicleType,
        timeout: Duration,
    ) -> Result<Option<OutstationPerKmConfig>, StoreError> {
        self.check(timeout)?;
        self.inner.outstation_per_km_config(vehicle_type, timeout)
    }

    fn active_zones(&self, timeout: Duration) -> Result<Vec<Zone>, StoreError> {
        self.check(timeout)?;
        self.inner.active_zones(timeout)
    }
}

/// Oracle fake answering every pair with one fixed route, or failing when
/// no route is set.
pub struct FixedOracle {
    answer: Mutex<Option<(f64, f64)>>,
    pub calls: AtomicUsize,
}

impl FixedOracle {
    pub fn route(km: f64, minutes: f64) -> Arc<Self> {
        Arc::new(Self {
            answer: Mutex::new(Some((km * 1000.0, minutes * 60.0))),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn down() -> Arc<Self> {
        Arc::new(Self {
            answer: Mutex::new(None),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set_route(&self, km: f64, minutes: f64) {
        *self.answer.lock().unwrap() = Some((km * 1000.0, minutes * 60.0));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RouteOracle for FixedOracle {
    fn directions(
        &self,
        _origin: Coordinate,
        _destination: Coordinate,
        _timeout: Duration,
    ) -> Result<Directions, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (distance_meters, duration_seconds) =
            (*self.answer.lock().unwrap()).ok_or(OracleError::NoRoute)?;
        Ok(Directions {
            distance_meters,
            duration_seconds,
            polyline: Polyline::default(),
        })
    }
}
