//! TTL-cached view over the tariff store.
//!
//! Fresh entries short-circuit the store. Expired entries are refetched, but
//! stay readable through the `cached_*` accessors so the facade can price
//! from last-known-good data while the store is unreachable.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::cache::{TtlCache, remaining_budget};
use crate::config::EngineConfig;
use crate::error::{ConfigKind, QuoteError, StoreError};
use crate::models::{OutstationPerKmConfig, OutstationSlabTable, TariffConfig, VehicleType, Zone};
use crate::traits::TariffStore;

pub struct TariffCache {
    store: Arc<dyn TariffStore>,
    timeout: Duration,
    tariffs: TtlCache<VehicleType, TariffConfig>,
    slab_tables: TtlCache<VehicleType, OutstationSlabTable>,
    per_km_configs: TtlCache<VehicleType, OutstationPerKmConfig>,
    zones: TtlCache<(), Arc<[Zone]>>,
}

impl TariffCache {
    pub fn new(store: Arc<dyn TariffStore>, config: &EngineConfig) -> Self {
        let ttl = config.tariff_cache_ttl();
        let (shards, capacity) = (config.cache_shards, config.cache_capacity);
        Self {
            store,
            timeout: config.store_timeout(),
            tariffs: TtlCache::new(ttl, shards, capacity),
            slab_tables: TtlCache::new(ttl, shards, capacity),
            per_km_configs: TtlCache::new(ttl, shards, capacity),
            zones: TtlCache::new(ttl, 1, 1),
        }
    }

    /// Tariff row for `vehicle_type`, from cache while fresh, else from the store.
    pub fn tariff(
        &self,
        vehicle_type: &VehicleType,
        deadline: Option<Instant>,
    ) -> Result<TariffConfig, QuoteError> {
        if let Some(tariff) = self.tariffs.get_fresh(vehicle_type) {
            debug!(vehicle_type = %vehicle_type, "tariff cache hit");
            return Ok(tariff);
        }
        let fetched = guarded(deadline, self.timeout, |timeout| {
            self.store.tariff(vehicle_type, timeout)
        })?;
        let tariff = fetched
            .filter(TariffConfig::is_usable)
            .ok_or_else(|| QuoteError::config_missing(vehicle_type.as_str(), ConfigKind::Tariff))?;
        self.tariffs.insert(vehicle_type.clone(), tariff.clone());
        Ok(tariff)
    }

    /// Slab table for `vehicle_type`. A missing or malformed table is `Ok(None)`.
    pub fn slab_table(
        &self,
        vehicle_type: &VehicleType,
        deadline: Option<Instant>,
    ) -> Result<Option<OutstationSlabTable>, QuoteError> {
        if let Some(table) = self.slab_tables.get_fresh(vehicle_type) {
            return Ok(Some(table));
        }
        let fetched = guarded(deadline, self.timeout, |timeout| {
            self.store.outstation_slab_table(vehicle_type, timeout)
        })?;
        match fetched {
            Some(table) if table.is_well_formed() => {
                self.slab_tables.insert(vehicle_type.clone(), table.clone());
                Ok(Some(table))
            }
            Some(_) => {
                warn!(vehicle_type = %vehicle_type, "ignoring malformed outstation slab table");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub fn per_km_config(
        &self,
        vehicle_type: &VehicleType,
        deadline: Option<Instant>,
    ) -> Result<OutstationPerKmConfig, QuoteError> {
        if let Some(config) = self.per_km_configs.get_fresh(vehicle_type) {
            return Ok(config);
        }
        let fetched = guarded(deadline, self.timeout, |timeout| {
            self.store.outstation_per_km_config(vehicle_type, timeout)
        })?;
        let config = fetched.filter(OutstationPerKmConfig::is_usable).ok_or_else(|| {
            QuoteError::config_missing(vehicle_type.as_str(), ConfigKind::PerKmConfig)
        })?;
        self.per_km_configs.insert(vehicle_type.clone(), config.clone());
        Ok(config)
    }

    /// Active zones. Store failures surface as `ZoneDataUnavailable`.
    pub fn zones(&self, deadline: Option<Instant>) -> Result<Arc<[Zone]>, QuoteError> {
        if let Some(zones) = self.zones.get_fresh(&()) {
            return Ok(zones);
        }
        let zones: Arc<[Zone]> =
            guarded(deadline, self.timeout, |timeout| self.store.active_zones(timeout))
                .map_err(|err| QuoteError::ZoneDataUnavailable(err.to_string()))?
                .into();
        self.zones.insert((), Arc::clone(&zones));
        Ok(zones)
    }

    pub fn cached_tariff(&self, vehicle_type: &VehicleType) -> Option<TariffConfig> {
        self.tariffs.get_any(vehicle_type)
    }

    pub fn cached_slab_table(&self, vehicle_type: &VehicleType) -> Option<OutstationSlabTable> {
        self.slab_tables.get_any(vehicle_type)
    }

    pub fn cached_per_km_config(&self, vehicle_type: &VehicleType) -> Option<OutstationPerKmConfig> {
        self.per_km_configs.get_any(vehicle_type)
    }

    /// Zones fetched within the TTL, without consulting the store.
    pub fn fresh_zones(&self) -> Option<Arc<[Zone]>> {
        self.zones.get_fresh(&())
    }

    pub fn cached_zones(&self) -> Option<Arc<[Zone]>> {
        self.zones.get_any(&())
    }

    pub fn clear(&self) {
        self.tariffs.clear();
        self.slab_tables.clear();
        self.per_km_configs.clear();
        self.zones.clear();
    }
}

/// Runs a store call with whatever is left of the deadline, capped at `limit`.
fn guarded<T>(
    deadline: Option<Instant>,
    limit: Duration,
    call: impl FnOnce(Duration) -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    let timeout = remaining_budget(deadline, limit);
    if timeout.is_zero() {
        return Err(StoreError::DeadlineExceeded);
    }
    call(timeout).inspect_err(|err| warn!(error = %err, "tariff store call failed"))
}
