//! Long-distance ("outstation") pricing.
//!
//! Slabs are round-trip packages, so the one-way route distance is always
//! doubled before any decision, even for one-way trips: the vehicle has to
//! come back. Short same-day trips use the slab table when one is enabled;
//! everything else is priced per kilometre with a daily driver allowance.

use crate::error::{ConfigKind, QuoteError};
use crate::models::{
    CalculationMethod, FareBreakdown, FareComponents, OutstationPerKmConfig, OutstationSlabTable,
    RouteInfo, TripFlags,
};

#[derive(Debug, Clone, Copy)]
pub struct OutstationFareCalculator {
    /// Largest round-trip distance eligible for slab pricing.
    slab_max_km: f64,
    call_out_fee: f64,
}

impl Default for OutstationFareCalculator {
    fn default() -> Self {
        Self {
            slab_max_km: 300.0,
            call_out_fee: 500.0,
        }
    }
}

impl OutstationFareCalculator {
    pub fn new(slab_max_km: f64, call_out_fee: f64) -> Self {
        Self {
            slab_max_km,
            call_out_fee,
        }
    }

    /// `slab_table` may be absent; that only disables slab pricing. An
    /// unusable per-km config is fatal.
    pub fn compute(
        &self,
        route: &RouteInfo,
        slab_table: Option<&OutstationSlabTable>,
        per_km: &OutstationPerKmConfig,
        flags: &TripFlags,
    ) -> Result<FareBreakdown, QuoteError> {
        if !per_km.is_usable() {
            return Err(QuoteError::config_missing(
                per_km.vehicle_type.as_str(),
                ConfigKind::PerKmConfig,
            ));
        }

        let total_km = route.distance_km * 2.0;
        let slab_table = slab_table.filter(|table| {
            table.use_slab_system
                && table.is_well_formed()
                && total_km <= self.slab_max_km
                && flags.is_same_day
        });

        Ok(match slab_table {
            Some(table) => self.slab_fare(route, table, total_km),
            None => self.per_km_fare(route, per_km, flags, total_km),
        })
    }

    fn slab_fare(&self, route: &RouteInfo, table: &OutstationSlabTable, total_km: f64) -> FareBreakdown {
        let components = match table.slabs.iter().find(|slab| slab.coverage_km >= total_km) {
            Some(slab) => FareComponents {
                base_fare: slab.fixed_fare,
                ..FareComponents::default()
            },
            None => {
                // Beyond the largest slab: its fixed fare plus the excess at the extra-km rate.
                let largest = table.slabs[table.slabs.len() - 1];
                FareComponents {
                    base_fare: largest.fixed_fare,
                    distance_fare: (total_km - largest.coverage_km) * table.extra_km_rate,
                    ..FareComponents::default()
                }
            }
        };
        components.into_breakdown(route, 0.0, CalculationMethod::Slab)
    }

    fn per_km_fare(
        &self,
        route: &RouteInfo,
        config: &OutstationPerKmConfig,
        flags: &TripFlags,
        total_km: f64,
    ) -> FareBreakdown {
        let days = f64::from(flags.billable_days());
        let allowance = config.driver_allowance_per_day * days;

        let components = if flags.is_round_trip {
            let km_allowance = config.daily_km_limit * days;
            let billed_km = if total_km <= km_allowance {
                km_allowance
            } else {
                total_km
            };
            FareComponents {
                base_fare: self.call_out_fee,
                distance_fare: billed_km * config.per_km_rate,
                driver_allowance: allowance,
                ..FareComponents::default()
            }
        } else if total_km > self.slab_max_km {
            FareComponents {
                base_fare: self.call_out_fee,
                distance_fare: total_km * config.per_km_rate,
                driver_allowance: allowance,
                ..FareComponents::default()
            }
        } else {
            FareComponents {
                distance_fare: total_km * config.per_km_rate,
                ..FareComponents::default()
            }
        };
        components.into_breakdown(route, 0.0, CalculationMethod::PerKm)
    }
}
