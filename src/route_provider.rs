//! Road distance/duration lookups with a short-lived cache and a haversine
//! degrade path.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::cache::{TtlCache, remaining_budget};
use crate::config::EngineConfig;
use crate::error::OracleError;
use crate::haversine::HaversineEstimator;
use crate::models::{Coordinate, RouteInfo, RouteSource};
use crate::traits::RouteOracle;

/// Coordinates rounded to 6 decimals (~0.1 m), pickup then destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteKey([i64; 4]);

impl RouteKey {
    pub fn new(pickup: Coordinate, destination: Coordinate) -> Self {
        let micro = |v: f64| (v * 1e6).round() as i64;
        Self([
            micro(pickup.latitude()),
            micro(pickup.longitude()),
            micro(destination.latitude()),
            micro(destination.longitude()),
        ])
    }
}

pub struct RouteProvider {
    oracle: Arc<dyn RouteOracle>,
    cache: TtlCache<RouteKey, RouteInfo>,
    fallback: HaversineEstimator,
    timeout: Duration,
}

impl RouteProvider {
    pub fn new(oracle: Arc<dyn RouteOracle>, config: &EngineConfig) -> Self {
        Self {
            oracle,
            cache: TtlCache::new(
                config.route_cache_ttl(),
                config.cache_shards,
                config.cache_capacity,
            ),
            fallback: HaversineEstimator::new(config.fallback_speed_kmh),
            timeout: config.oracle_timeout(),
        }
    }

    /// Road route between two points. Never fails: oracle errors degrade to
    /// a great-circle estimate flagged with [`RouteSource::Haversine`].
    pub fn route(
        &self,
        pickup: Coordinate,
        destination: Coordinate,
        deadline: Option<Instant>,
    ) -> RouteInfo {
        let key = RouteKey::new(pickup, destination);
        if let Some(route) = self.cache.get_fresh(&key) {
            debug!(%pickup, %destination, "route cache hit");
            return route;
        }

        match self.query_oracle(pickup, destination, deadline) {
            Ok(route) => {
                self.cache.insert(key, route);
                route
            }
            Err(err) => {
                warn!(%pickup, %destination, error = %err, "route oracle unavailable, using haversine estimate");
                self.fallback.estimate(pickup, destination)
            }
        }
    }

    /// Straight-line estimate, bypassing the oracle and the cache.
    pub fn estimate(&self, pickup: Coordinate, destination: Coordinate) -> RouteInfo {
        self.fallback.estimate(pickup, destination)
    }

    fn query_oracle(
        &self,
        pickup: Coordinate,
        destination: Coordinate,
        deadline: Option<Instant>,
    ) -> Result<RouteInfo, OracleError> {
        let timeout = remaining_budget(deadline, self.timeout);
        if timeout.is_zero() {
            return Err(OracleError::DeadlineExceeded);
        }

        let directions = self.oracle.directions(pickup, destination, timeout)?;
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if !valid(directions.distance_meters) || !valid(directions.duration_seconds) {
            return Err(OracleError::Malformed(format!(
                "distance {} m, duration {} s",
                directions.distance_meters, directions.duration_seconds
            )));
        }

        Ok(RouteInfo {
            distance_km: directions.distance_meters / 1000.0,
            duration_minutes: directions.duration_seconds / 60.0,
            source: RouteSource::Oracle,
        })
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}
