//! fare-engine: ride-hailing fare quotation and service-area checks.
//!
//! Prices regular in-city trips and long-distance outstation trips from an
//! injected tariff store and road-routing oracle, degrading through cached
//! and built-in tariffs when either collaborator is unavailable.

pub mod error;
pub mod models;
pub mod config;
pub mod traits;
pub mod haversine;
pub mod polyline;
pub mod osrm;
pub mod store;
pub mod cache;
pub mod tariff_cache;
pub mod route_provider;
pub mod zone;
pub mod deadhead;
pub mod regular;
pub mod outstation;
pub mod defaults;
pub mod fallback;
pub mod quote;

pub use config::EngineConfig;
pub use error::{ConfigError, ConfigKind, OracleError, QuoteError, StoreError};
pub use models::{
    CalculationMethod, Coordinate, FareBreakdown, Provenance, QuoteRequest, RouteInfo,
    RouteSource, ServiceAreaStatus, TariffConfig, TripFlags, VehicleType, Zone,
};
pub use quote::QuoteEngine;
pub use traits::{Directions, RouteOracle, TariffStore};
pub use zone::ZoneStatus;
