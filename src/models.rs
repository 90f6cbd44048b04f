//! Value types shared by the calculators and the quotation facade.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::QuoteError;

/// A validated WGS84 position.
///
/// Construction rejects out-of-range or non-finite values, so every
/// `Coordinate` inside the engine is known to be valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = QuoteError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, QuoteError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(QuoteError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// For literals known to be in range.
    pub(crate) const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// (lat, lng) tuple, the shape used by the geometry helpers.
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Vehicle class key, normalized to trimmed lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct VehicleType(String);

impl VehicleType {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for VehicleType {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for VehicleType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    Circle,
    Polygon,
}

/// A named geofence, as administered by the tariff store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub kind: ZoneKind,
    #[serde(default)]
    pub center: Option<Coordinate>,
    #[serde(default)]
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub polygon_points: Vec<Coordinate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Zone {
    pub fn circle(name: impl Into<String>, center: Coordinate, radius_km: f64) -> Self {
        Self {
            name: name.into(),
            kind: ZoneKind::Circle,
            center: Some(center),
            radius_km: Some(radius_km),
            polygon_points: Vec::new(),
            is_active: true,
        }
    }

    pub fn polygon(name: impl Into<String>, points: Vec<Coordinate>) -> Self {
        Self {
            name: name.into(),
            kind: ZoneKind::Polygon,
            center: None,
            radius_km: None,
            polygon_points: points,
            is_active: true,
        }
    }

    /// Attach a center/radius to a polygon zone, used when the ring is absent.
    pub fn with_circle_fallback(mut self, center: Coordinate, radius_km: f64) -> Self {
        self.center = Some(center);
        self.radius_km = Some(radius_km);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Per-vehicle tariff row for regular (in-city) trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffConfig {
    pub vehicle_type: VehicleType,
    pub base_fare: f64,
    pub per_km_rate: f64,
    pub per_minute_rate: f64,
    pub minimum_fare: f64,
    pub surge_multiplier: f64,
    pub platform_fee_percent: f64,
}

impl TariffConfig {
    /// A row is usable when every field is finite and non-negative, the
    /// surge multiplier is positive, and it prices something.
    pub fn is_usable(&self) -> bool {
        let fields = [
            self.base_fare,
            self.per_km_rate,
            self.per_minute_rate,
            self.minimum_fare,
            self.surge_multiplier,
            self.platform_fee_percent,
        ];
        let well_formed = fields.iter().all(|v| v.is_finite() && *v >= 0.0);
        let prices_something =
            self.base_fare > 0.0 || self.per_km_rate > 0.0 || self.minimum_fare > 0.0;
        well_formed && self.surge_multiplier > 0.0 && prices_something
    }
}

/// Fixed-price bracket covering up to `coverage_km` of round-trip distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slab {
    pub coverage_km: f64,
    pub fixed_fare: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutstationSlabTable {
    pub vehicle_type: VehicleType,
    pub use_slab_system: bool,
    pub slabs: Vec<Slab>,
    pub extra_km_rate: f64,
    pub driver_allowance_per_day: f64,
}

impl OutstationSlabTable {
    /// Slabs must be non-empty and strictly ascending by coverage.
    pub fn is_well_formed(&self) -> bool {
        let values_ok = self.slabs.iter().all(|s| {
            s.coverage_km.is_finite()
                && s.coverage_km > 0.0
                && s.fixed_fare.is_finite()
                && s.fixed_fare >= 0.0
        });
        let ascending = self
            .slabs
            .windows(2)
            .all(|pair| pair[0].coverage_km < pair[1].coverage_km);
        !self.slabs.is_empty()
            && values_ok
            && ascending
            && self.extra_km_rate.is_finite()
            && self.extra_km_rate >= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutstationPerKmConfig {
    pub vehicle_type: VehicleType,
    pub per_km_rate: f64,
    pub driver_allowance_per_day: f64,
    pub daily_km_limit: f64,
}

impl OutstationPerKmConfig {
    pub fn is_usable(&self) -> bool {
        let fields = [
            self.per_km_rate,
            self.driver_allowance_per_day,
            self.daily_km_limit,
        ];
        fields.iter().all(|v| v.is_finite() && *v >= 0.0) && self.per_km_rate > 0.0
    }
}

/// Where a route's distance and duration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    /// Road network answer from the route oracle (fresh or cached).
    Oracle,
    /// Great-circle estimate at an assumed average speed.
    Haversine,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub source: RouteSource,
}

impl RouteInfo {
    pub fn new(distance_km: f64, duration_minutes: f64) -> Self {
        Self {
            distance_km,
            duration_minutes,
            source: RouteSource::Oracle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    Regular,
    Slab,
    PerKm,
}

/// Which fallback tier produced a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Authoritative,
    CachedTariffs,
    DefaultTariffs,
    EmergencyMinimum,
}

impl Provenance {
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Provenance::Authoritative)
    }
}

/// Itemized, rounded fare. Monetary fields are whole currency units and
/// `total_fare` is exactly their sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareBreakdown {
    pub base_fare: i64,
    pub distance_fare: i64,
    pub time_fare: i64,
    pub surge_fare: i64,
    pub minimum_fare_adjustment: i64,
    pub platform_fee: i64,
    pub deadhead_charge: i64,
    pub driver_allowance: i64,
    pub total_fare: i64,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub deadhead_distance_km: f64,
    pub calculation_method: CalculationMethod,
    pub provenance: Provenance,
    pub route_source: RouteSource,
}

/// Unrounded monetary components, turned into a [`FareBreakdown`] in one step.
#[derive(Debug, Clone, Default)]
pub(crate) struct FareComponents {
    pub base_fare: f64,
    pub distance_fare: f64,
    pub time_fare: f64,
    pub surge_fare: f64,
    pub platform_fee: f64,
    pub deadhead_charge: f64,
    pub driver_allowance: f64,
    /// Floor applied to base + distance + time + surge.
    pub minimum_fare: f64,
}

pub(crate) fn whole(amount: f64) -> i64 {
    amount.round() as i64
}

impl FareComponents {
    pub(crate) fn into_breakdown(
        self,
        route: &RouteInfo,
        deadhead_distance_km: f64,
        calculation_method: CalculationMethod,
    ) -> FareBreakdown {
        let base_fare = whole(self.base_fare);
        let distance_fare = whole(self.distance_fare);
        let time_fare = whole(self.time_fare);
        let surge_fare = whole(self.surge_fare);
        let pre_floor = base_fare + distance_fare + time_fare + surge_fare;
        let floor = whole(self.minimum_fare);
        let minimum_fare_adjustment = (floor - pre_floor).max(0);
        let platform_fee = whole(self.platform_fee);
        let deadhead_charge = whole(self.deadhead_charge);
        let driver_allowance = whole(self.driver_allowance);

        FareBreakdown {
            base_fare,
            distance_fare,
            time_fare,
            surge_fare,
            minimum_fare_adjustment,
            platform_fee,
            deadhead_charge,
            driver_allowance,
            total_fare: pre_floor
                + minimum_fare_adjustment
                + platform_fee
                + deadhead_charge
                + driver_allowance,
            distance_km: route.distance_km,
            duration_minutes: route.duration_minutes,
            deadhead_distance_km,
            calculation_method,
            provenance: Provenance::Authoritative,
            route_source: route.source,
        }
    }
}

/// Trip-shape flags supplied by the booking workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripFlags {
    pub is_outstation: bool,
    pub is_round_trip: bool,
    pub number_of_days: u32,
    pub is_same_day: bool,
}

impl Default for TripFlags {
    fn default() -> Self {
        Self {
            is_outstation: false,
            is_round_trip: false,
            number_of_days: 1,
            is_same_day: true,
        }
    }
}

impl TripFlags {
    pub fn outstation(is_round_trip: bool, number_of_days: u32, is_same_day: bool) -> Self {
        Self {
            is_outstation: true,
            is_round_trip,
            number_of_days,
            is_same_day,
        }
    }

    /// Day count used for pricing; a zero from the caller means one day.
    pub fn billable_days(&self) -> u32 {
        self.number_of_days.max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub pickup: Coordinate,
    pub destination: Coordinate,
    pub vehicle_type: VehicleType,
    #[serde(default)]
    pub flags: TripFlags,
}

impl QuoteRequest {
    pub fn new(
        pickup: Coordinate,
        destination: Coordinate,
        vehicle_type: impl Into<VehicleType>,
        flags: TripFlags,
    ) -> Self {
        Self {
            pickup,
            destination,
            vehicle_type: vehicle_type.into(),
            flags,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAreaStatus {
    pub inside_service_area: bool,
}
