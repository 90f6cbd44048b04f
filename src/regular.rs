//! Regular (in-city) fare: base fare covering the first few kilometres, then
//! per-km and per-minute charges, surge, a minimum-fare floor, a platform
//! fee and any deadhead surcharge.

use crate::deadhead::DeadheadResult;
use crate::error::{ConfigKind, QuoteError};
use crate::models::{CalculationMethod, FareBreakdown, FareComponents, RouteInfo, TariffConfig};

#[derive(Debug, Clone, Copy)]
pub struct RegularFareCalculator {
    /// Distance covered by the base fare.
    included_km: f64,
}

impl Default for RegularFareCalculator {
    fn default() -> Self {
        Self { included_km: 4.0 }
    }
}

impl RegularFareCalculator {
    pub fn new(included_km: f64) -> Self {
        Self { included_km }
    }

    pub fn compute(
        &self,
        route: &RouteInfo,
        tariff: &TariffConfig,
        deadhead: DeadheadResult,
    ) -> Result<FareBreakdown, QuoteError> {
        if !tariff.is_usable() {
            return Err(QuoteError::config_missing(
                tariff.vehicle_type.as_str(),
                ConfigKind::Tariff,
            ));
        }

        let base_fare = tariff.base_fare;
        let distance_fare = if route.distance_km > self.included_km {
            (route.distance_km - self.included_km) * tariff.per_km_rate
        } else {
            0.0
        };
        let time_fare = route.duration_minutes * tariff.per_minute_rate;

        let subtotal = base_fare + distance_fare + time_fare;
        let surge_fare = subtotal * (tariff.surge_multiplier - 1.0);
        let floored = (subtotal + surge_fare).max(tariff.minimum_fare);
        let platform_fee = floored * tariff.platform_fee_percent / 100.0;

        Ok(FareComponents {
            base_fare,
            distance_fare,
            time_fare,
            surge_fare,
            platform_fee,
            deadhead_charge: deadhead.charge,
            driver_allowance: 0.0,
            minimum_fare: tariff.minimum_fare,
        }
        .into_breakdown(route, deadhead.distance_km, CalculationMethod::Regular))
    }
}
