//! Quotation facade: the engine's public entry point.
//!
//! Owns the shared caches and runs every request through the fallback chain:
//! live tariffs, then last-known tariffs, then built-in tariffs, then an
//! emergency straight-line minimum.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::deadhead::DeadheadCalculator;
use crate::defaults;
use crate::error::{ConfigError, ConfigKind, QuoteError};
use crate::fallback::{FallbackChain, FareStrategy};
use crate::models::{
    CalculationMethod, Coordinate, FareBreakdown, FareComponents, OutstationPerKmConfig,
    OutstationSlabTable, Provenance, QuoteRequest, ServiceAreaStatus, TariffConfig,
    TripFlags, VehicleType, Zone,
};
use crate::outstation::OutstationFareCalculator;
use crate::regular::RegularFareCalculator;
use crate::route_provider::RouteProvider;
use crate::tariff_cache::TariffCache;
use crate::traits::{RouteOracle, TariffStore};
use crate::zone::{ZoneClassifier, ZoneStatus};

/// A request plus the caller's time budget, as seen by each fallback tier.
#[derive(Debug, Clone)]
pub struct QuoteJob {
    pub request: QuoteRequest,
    pub deadline: Option<Instant>,
}

/// Tariff rows a tier prices with.
enum PricingInputs {
    Regular(TariffConfig),
    Outstation {
        slab_table: Option<OutstationSlabTable>,
        per_km: OutstationPerKmConfig,
    },
}

/// Zone-aware pricing pipeline shared by the fallback tiers.
struct Pipeline {
    tariffs: TariffCache,
    routes: RouteProvider,
    classifier: ZoneClassifier,
    deadhead: DeadheadCalculator,
    regular: RegularFareCalculator,
    outstation: OutstationFareCalculator,
}

impl Pipeline {
    /// Zones for pricing. Without current zone data the zone surcharges are
    /// disabled rather than priced from an old geofence.
    fn pricing_zones(&self, deadline: Option<Instant>) -> Option<Arc<[Zone]>> {
        self.tariffs
            .zones(deadline)
            .inspect_err(|err| warn!(error = %err, "zones unavailable, deadhead disabled"))
            .ok()
    }

    /// Zones for admission checks: the last known set is preferred over
    /// admitting everything while the store is unreachable.
    fn admission_zones(&self) -> Option<Arc<[Zone]>> {
        match self.tariffs.zones(None) {
            Ok(zones) => Some(zones),
            Err(err) => {
                let cached = self.tariffs.cached_zones();
                warn!(error = %err, have_cached = cached.is_some(), "using last known zones");
                cached
            }
        }
    }

    fn zone_status(&self, destination: Coordinate, zones: Option<Arc<[Zone]>>) -> ZoneStatus {
        zones
            .map(|zones| self.classifier.classify(destination, &zones))
            .unwrap_or(ZoneStatus::Unknown)
    }

    /// Route lookup and zone classification run side by side; the zone
    /// source is only consulted for regular trips.
    fn price(
        &self,
        job: &QuoteJob,
        inputs: PricingInputs,
        zones: impl FnOnce() -> Option<Arc<[Zone]>> + Send,
    ) -> Result<FareBreakdown, QuoteError> {
        let request = &job.request;
        match inputs {
            PricingInputs::Regular(tariff) => {
                let (route, zone_status) = rayon::join(
                    || {
                        self.routes
                            .route(request.pickup, request.destination, job.deadline)
                    },
                    || self.zone_status(request.destination, zones()),
                );
                let deadhead =
                    self.deadhead
                        .compute(request.destination, zone_status, tariff.per_km_rate);
                debug!(?zone_status, deadhead_km = deadhead.distance_km, "regular trip");
                self.regular.compute(&route, &tariff, deadhead)
            }
            PricingInputs::Outstation { slab_table, per_km } => {
                let route = self
                    .routes
                    .route(request.pickup, request.destination, job.deadline);
                self.outstation
                    .compute(&route, slab_table.as_ref(), &per_km, &request.flags)
            }
        }
    }
}

/// Tier 1: tariffs and zones as currently held by the store.
struct LiveTariffs(Arc<Pipeline>);

impl FareStrategy<QuoteJob> for LiveTariffs {
    fn provenance(&self) -> Provenance {
        Provenance::Authoritative
    }

    fn attempt(&self, job: &QuoteJob) -> Result<FareBreakdown, QuoteError> {
        let pipeline = &self.0;
        let vehicle = &job.request.vehicle_type;
        let inputs = if job.request.flags.is_outstation {
            let per_km = pipeline.tariffs.per_km_config(vehicle, job.deadline)?;
            // A missing row disables slab pricing; an unreachable store hands
            // the trip to the cached tier instead.
            let slab_table = pipeline.tariffs.slab_table(vehicle, job.deadline)?;
            PricingInputs::Outstation { slab_table, per_km }
        } else {
            PricingInputs::Regular(pipeline.tariffs.tariff(vehicle, job.deadline)?)
        };
        pipeline.price(job, inputs, || pipeline.pricing_zones(job.deadline))
    }
}

/// Tier 2: whatever the cache last fetched, however old. Zones only count
/// while still fresh.
struct CachedTariffs(Arc<Pipeline>);

impl FareStrategy<QuoteJob> for CachedTariffs {
    fn provenance(&self) -> Provenance {
        Provenance::CachedTariffs
    }

    fn attempt(&self, job: &QuoteJob) -> Result<FareBreakdown, QuoteError> {
        let pipeline = &self.0;
        let vehicle = &job.request.vehicle_type;
        let inputs = if job.request.flags.is_outstation {
            let per_km = pipeline
                .tariffs
                .cached_per_km_config(vehicle)
                .ok_or_else(|| QuoteError::config_missing(vehicle.as_str(), ConfigKind::PerKmConfig))?;
            PricingInputs::Outstation {
                slab_table: pipeline.tariffs.cached_slab_table(vehicle),
                per_km,
            }
        } else {
            let tariff = pipeline
                .tariffs
                .cached_tariff(vehicle)
                .ok_or_else(|| QuoteError::config_missing(vehicle.as_str(), ConfigKind::Tariff))?;
            PricingInputs::Regular(tariff)
        };
        pipeline.price(job, inputs, || pipeline.tariffs.fresh_zones())
    }
}

/// Tier 3: built-in tariffs, with zone surcharges disabled.
struct BuiltInTariffs(Arc<Pipeline>);

impl FareStrategy<QuoteJob> for BuiltInTariffs {
    fn provenance(&self) -> Provenance {
        Provenance::DefaultTariffs
    }

    fn attempt(&self, job: &QuoteJob) -> Result<FareBreakdown, QuoteError> {
        let vehicle = &job.request.vehicle_type;
        let missing = || QuoteError::config_missing(vehicle.as_str(), ConfigKind::DefaultTariff);
        let inputs = if job.request.flags.is_outstation {
            PricingInputs::Outstation {
                slab_table: defaults::default_slab_table(vehicle),
                per_km: defaults::default_per_km_config(vehicle).ok_or_else(missing)?,
            }
        } else {
            PricingInputs::Regular(defaults::default_tariff(vehicle).ok_or_else(missing)?)
        };
        self.0.price(job, inputs, || None)
    }
}

/// Tier 4: straight-line distance at built-in rates, floored at the
/// built-in minimum. Touches neither the store nor the oracle.
struct EmergencyMinimum(Arc<Pipeline>);

impl FareStrategy<QuoteJob> for EmergencyMinimum {
    fn provenance(&self) -> Provenance {
        Provenance::EmergencyMinimum
    }

    fn attempt(&self, job: &QuoteJob) -> Result<FareBreakdown, QuoteError> {
        let request = &job.request;
        let tariff = defaults::default_tariff(&request.vehicle_type).ok_or_else(|| {
            QuoteError::config_missing(request.vehicle_type.as_str(), ConfigKind::DefaultTariff)
        })?;
        let route = self.0.routes.estimate(request.pickup, request.destination);

        Ok(FareComponents {
            base_fare: tariff.base_fare,
            distance_fare: route.distance_km * tariff.per_km_rate,
            minimum_fare: tariff.minimum_fare,
            ..FareComponents::default()
        }
        .into_breakdown(&route, 0.0, CalculationMethod::Regular))
    }
}

/// Public entry point for fare quotations and service-area checks.
pub struct QuoteEngine {
    pipeline: Arc<Pipeline>,
    chain: FallbackChain<QuoteJob>,
    config: EngineConfig,
}

impl QuoteEngine {
    pub fn new(
        store: Arc<dyn TariffStore>,
        oracle: Arc<dyn RouteOracle>,
        config: EngineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let pipeline = Arc::new(Pipeline {
            tariffs: TariffCache::new(store, &config),
            routes: RouteProvider::new(oracle, &config),
            classifier: ZoneClassifier::new(&config.inner_zone_name, &config.outer_zone_name),
            deadhead: DeadheadCalculator::new(config.reference_point),
            regular: RegularFareCalculator::new(config.included_km),
            outstation: OutstationFareCalculator::new(
                config.outstation_slab_max_km,
                config.outstation_call_out_fee,
            ),
        });

        let chain = FallbackChain::new()
            .then(LiveTariffs(Arc::clone(&pipeline)))
            .then(CachedTariffs(Arc::clone(&pipeline)))
            .then(BuiltInTariffs(Arc::clone(&pipeline)))
            .then(EmergencyMinimum(Arc::clone(&pipeline)));

        Ok(Self {
            pipeline,
            chain,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fallback tiers in the order they are tried.
    pub fn tiers(&self) -> Vec<Provenance> {
        self.chain.tiers()
    }

    pub fn quote(&self, request: &QuoteRequest) -> Result<FareBreakdown, QuoteError> {
        self.run(request.clone(), None)
    }

    /// Like [`quote`](Self::quote), but gives up on the store and the oracle
    /// once `deadline` passes and prices from the lower tiers instead.
    pub fn quote_with_deadline(
        &self,
        request: &QuoteRequest,
        deadline: Instant,
    ) -> Result<FareBreakdown, QuoteError> {
        self.run(request.clone(), Some(deadline))
    }

    /// Prices the same trip for several vehicle classes in parallel.
    pub fn quote_all_vehicles(
        &self,
        pickup: Coordinate,
        destination: Coordinate,
        flags: TripFlags,
        vehicles: &[VehicleType],
    ) -> Vec<(VehicleType, Result<FareBreakdown, QuoteError>)> {
        vehicles
            .par_iter()
            .map(|vehicle| {
                let request = QuoteRequest::new(pickup, destination, vehicle.clone(), flags);
                (vehicle.clone(), self.run(request, None))
            })
            .collect()
    }

    fn run(&self, request: QuoteRequest, deadline: Option<Instant>) -> Result<FareBreakdown, QuoteError> {
        debug!(
            vehicle_type = %request.vehicle_type,
            pickup = %request.pickup,
            destination = %request.destination,
            outstation = request.flags.is_outstation,
            "quoting"
        );
        self.chain.run(&QuoteJob { request, deadline })
    }

    /// Pickup/destination admission: inside the outer ring. Unknown when
    /// zone data is missing, which admits the point.
    pub fn classify_service_area(&self, coordinate: Coordinate) -> ServiceAreaStatus {
        let inside_service_area = self
            .pipeline
            .admission_zones()
            .map(|zones| self.pipeline.classifier.inside_service_area(coordinate, &zones))
            .unwrap_or(true);
        ServiceAreaStatus {
            inside_service_area,
        }
    }

    pub fn classify_zone(&self, coordinate: Coordinate) -> ZoneStatus {
        let zones = self.pipeline.admission_zones();
        self.pipeline.zone_status(coordinate, zones)
    }

    /// Drops cached tariffs, zones and routes, e.g. after a tariff update.
    pub fn clear_caches(&self) {
        self.pipeline.tariffs.clear();
        self.pipeline.routes.clear();
    }
}
