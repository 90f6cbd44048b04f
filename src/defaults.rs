//! Built-in tariffs used when the store has never answered for a vehicle.

use crate::models::{OutstationPerKmConfig, OutstationSlabTable, Slab, TariffConfig, VehicleType};

struct DefaultRates {
    vehicle: &'static str,
    base_fare: f64,
    per_km_rate: f64,
    per_minute_rate: f64,
    minimum_fare: f64,
    outstation_per_km_rate: f64,
    driver_allowance_per_day: f64,
}

const DEFAULT_RATES: &[DefaultRates] = &[
    DefaultRates {
        vehicle: "bike",
        base_fare: 25.0,
        per_km_rate: 6.0,
        per_minute_rate: 0.5,
        minimum_fare: 30.0,
        outstation_per_km_rate: 6.0,
        driver_allowance_per_day: 200.0,
    },
    DefaultRates {
        vehicle: "auto",
        base_fare: 35.0,
        per_km_rate: 10.0,
        per_minute_rate: 1.0,
        minimum_fare: 50.0,
        outstation_per_km_rate: 9.0,
        driver_allowance_per_day: 250.0,
    },
    DefaultRates {
        vehicle: "hatchback",
        base_fare: 50.0,
        per_km_rate: 12.0,
        per_minute_rate: 1.5,
        minimum_fare: 80.0,
        outstation_per_km_rate: 11.0,
        driver_allowance_per_day: 300.0,
    },
    DefaultRates {
        vehicle: "sedan",
        base_fare: 60.0,
        per_km_rate: 15.0,
        per_minute_rate: 2.0,
        minimum_fare: 100.0,
        outstation_per_km_rate: 14.0,
        driver_allowance_per_day: 400.0,
    },
    DefaultRates {
        vehicle: "suv",
        base_fare: 80.0,
        per_km_rate: 18.0,
        per_minute_rate: 2.5,
        minimum_fare: 150.0,
        outstation_per_km_rate: 18.0,
        driver_allowance_per_day: 500.0,
    },
];

const DEFAULT_PLATFORM_FEE_PERCENT: f64 = 8.0;
const DEFAULT_DAILY_KM_LIMIT: f64 = 300.0;

fn rates_for(vehicle_type: &VehicleType) -> Option<&'static DefaultRates> {
    DEFAULT_RATES
        .iter()
        .find(|rates| rates.vehicle == vehicle_type.as_str())
}

/// Vehicle types with built-in tariffs.
pub fn known_vehicle_types() -> Vec<VehicleType> {
    DEFAULT_RATES.iter().map(|r| VehicleType::new(r.vehicle)).collect()
}

pub fn default_tariff(vehicle_type: &VehicleType) -> Option<TariffConfig> {
    rates_for(vehicle_type).map(|rates| TariffConfig {
        vehicle_type: vehicle_type.clone(),
        base_fare: rates.base_fare,
        per_km_rate: rates.per_km_rate,
        per_minute_rate: rates.per_minute_rate,
        minimum_fare: rates.minimum_fare,
        surge_multiplier: 1.0,
        platform_fee_percent: DEFAULT_PLATFORM_FEE_PERCENT,
    })
}

pub fn default_per_km_config(vehicle_type: &VehicleType) -> Option<OutstationPerKmConfig> {
    rates_for(vehicle_type).map(|rates| OutstationPerKmConfig {
        vehicle_type: vehicle_type.clone(),
        per_km_rate: rates.outstation_per_km_rate,
        driver_allowance_per_day: rates.driver_allowance_per_day,
        daily_km_limit: DEFAULT_DAILY_KM_LIMIT,
    })
}

/// Slab table scaled from the per-km rate: 80/120/200/300 km packages priced
/// a little under the plain per-km cost.
pub fn default_slab_table(vehicle_type: &VehicleType) -> Option<OutstationSlabTable> {
    rates_for(vehicle_type).map(|rates| OutstationSlabTable {
        vehicle_type: vehicle_type.clone(),
        use_slab_system: true,
        slabs: [80.0, 120.0, 200.0, 300.0]
            .into_iter()
            .map(|coverage_km| Slab {
                coverage_km,
                fixed_fare: (coverage_km * rates.outstation_per_km_rate * 0.9).round(),
            })
            .collect(),
        extra_km_rate: rates.outstation_per_km_rate,
        driver_allowance_per_day: rates.driver_allowance_per_day,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_vehicle_has_usable_defaults() {
        for vehicle in known_vehicle_types() {
            assert!(default_tariff(&vehicle).is_some_and(|t| t.is_usable()), "{vehicle}");
            assert!(default_per_km_config(&vehicle).is_some_and(|c| c.is_usable()), "{vehicle}");
            assert!(default_slab_table(&vehicle).is_some_and(|t| t.is_well_formed()), "{vehicle}");
        }
    }

    #[test]
    fn lookup_is_case_insensitive_through_vehicle_type() {
        assert!(default_tariff(&VehicleType::new("SEDAN")).is_some());
    }

    #[test]
    fn unknown_vehicle_has_no_defaults() {
        assert!(default_tariff(&VehicleType::new("hovercraft")).is_none());
        assert!(default_per_km_config(&VehicleType::new("")).is_none());
    }
}
