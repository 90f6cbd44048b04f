//! In-memory [`TariffStore`] loaded from a JSON snapshot.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::error::StoreError;
use crate::models::{OutstationPerKmConfig, OutstationSlabTable, TariffConfig, VehicleType, Zone};
use crate::traits::TariffStore;

/// Serialized shape of a tariff store export.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreSnapshot {
    pub tariffs: Vec<TariffConfig>,
    pub slab_tables: Vec<OutstationSlabTable>,
    pub per_km_configs: Vec<OutstationPerKmConfig>,
    pub zones: Vec<Zone>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTariffStore {
    tariffs: HashMap<VehicleType, TariffConfig>,
    slab_tables: HashMap<VehicleType, OutstationSlabTable>,
    per_km_configs: HashMap<VehicleType, OutstationPerKmConfig>,
    zones: Vec<Zone>,
}

impl InMemoryTariffStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut store = Self::new();
        for tariff in snapshot.tariffs {
            store = store.with_tariff(tariff);
        }
        for table in snapshot.slab_tables {
            store = store.with_slab_table(table);
        }
        for config in snapshot.per_km_configs {
            store = store.with_per_km_config(config);
        }
        store.zones = snapshot.zones;
        store
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let snapshot: StoreSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn with_tariff(mut self, tariff: TariffConfig) -> Self {
        self.tariffs.insert(tariff.vehicle_type.clone(), tariff);
        self
    }

    pub fn with_slab_table(mut self, table: OutstationSlabTable) -> Self {
        self.slab_tables.insert(table.vehicle_type.clone(), table);
        self
    }

    pub fn with_per_km_config(mut self, config: OutstationPerKmConfig) -> Self {
        self.per_km_configs.insert(config.vehicle_type.clone(), config);
        self
    }

    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zones.push(zone);
        self
    }
}

/// Answers from memory, so the time budget never binds.
impl TariffStore for InMemoryTariffStore {
    fn tariff(
        &self,
        vehicle_type: &VehicleType,
        _timeout: Duration,
    ) -> Result<Option<TariffConfig>, StoreError> {
        Ok(self.tariffs.get(vehicle_type).cloned())
    }

    fn outstation_slab_table(
        &self,
        vehicle_type: &VehicleType,
        _timeout: Duration,
    ) -> Result<Option<OutstationSlabTable>, StoreError> {
        Ok(self.slab_tables.get(vehicle_type).cloned())
    }

    fn outstation_per_km_config(
        &self,
        vehicle_type: &VehicleType,
        _timeout: Duration,
    ) -> Result<Option<OutstationPerKmConfig>, StoreError> {
        Ok(self.per_km_configs.get(vehicle_type).cloned())
    }

    fn active_zones(&self, _timeout: Duration) -> Result<Vec<Zone>, StoreError> {
        Ok(self.zones.iter().filter(|z| z.is_active).cloned().collect())
    }
}
