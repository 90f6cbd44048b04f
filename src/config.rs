//! Engine configuration: business constants and cache/timeout settings.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::Coordinate;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Zone name of the core city geofence.
    pub inner_zone_name: String,
    /// Zone name of the service boundary.
    pub outer_zone_name: String,
    /// Dispatch hub used as the deadhead reference point.
    pub reference_point: Coordinate,
    /// Distance covered by the base fare on regular trips.
    pub included_km: f64,
    /// Largest round-trip distance eligible for slab pricing.
    pub outstation_slab_max_km: f64,
    pub outstation_call_out_fee: f64,
    /// Average speed assumed when the route oracle is unavailable.
    pub fallback_speed_kmh: f64,
    pub route_cache_ttl_secs: u64,
    pub tariff_cache_ttl_secs: u64,
    pub oracle_timeout_secs: u64,
    /// Upper bound on a single tariff store call.
    pub store_timeout_secs: u64,
    /// Entries per cache shard.
    pub cache_capacity: usize,
    pub cache_shards: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inner_zone_name: "Inner Ring".to_string(),
            outer_zone_name: "Outer Ring".to_string(),
            reference_point: Coordinate::new_unchecked(12.74, 77.83),
            included_km: 4.0,
            outstation_slab_max_km: 300.0,
            outstation_call_out_fee: 500.0,
            fallback_speed_kmh: 30.0,
            route_cache_ttl_secs: 120,
            tariff_cache_ttl_secs: 600,
            oracle_timeout_secs: 10,
            store_timeout_secs: 5,
            cache_capacity: 1024,
            cache_shards: 16,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("included_km", self.included_km),
            ("outstation_slab_max_km", self.outstation_slab_max_km),
            ("outstation_call_out_fee", self.outstation_call_out_fee),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if !self.fallback_speed_kmh.is_finite() || self.fallback_speed_kmh <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "fallback_speed_kmh must be positive, got {}",
                self.fallback_speed_kmh
            )));
        }
        if self.cache_capacity == 0 || self.cache_shards == 0 {
            return Err(ConfigError::Invalid(
                "cache_capacity and cache_shards must be non-zero".to_string(),
            ));
        }
        if self.oracle_timeout_secs == 0 || self.store_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "oracle_timeout_secs and store_timeout_secs must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn route_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.route_cache_ttl_secs)
    }

    pub fn tariff_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.tariff_cache_ttl_secs)
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_secs(self.oracle_timeout_secs)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}
