//! Error taxonomy for the quotation engine.

use std::time::Duration;

use thiserror::Error;

/// Which piece of configuration a calculation could not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    Tariff,
    SlabTable,
    PerKmConfig,
    DefaultTariff,
}

impl std::fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConfigKind::Tariff => "tariff",
            ConfigKind::SlabTable => "outstation slab table",
            ConfigKind::PerKmConfig => "outstation per-km config",
            ConfigKind::DefaultTariff => "built-in default tariff",
        };
        f.write_str(name)
    }
}

/// Errors raised by a [`crate::traits::TariffStore`].
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("tariff store unavailable: {0}")]
    Unavailable(String),

    #[error("tariff store did not answer within {0:?}")]
    TimedOut(Duration),

    #[error("deadline expired before the tariff store was queried")]
    DeadlineExceeded,
}

/// Errors raised by a [`crate::traits::RouteOracle`].
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("route oracle request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("route oracle returned {0}")]
    Api(String),

    #[error("route oracle found no route")]
    NoRoute,

    #[error("malformed route oracle response: {0}")]
    Malformed(String),

    #[error("deadline expired before the route oracle answered")]
    DeadlineExceeded,
}

/// Errors raised while loading [`crate::config::EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid engine config: {0}")]
    Invalid(String),
}

/// Errors surfaced by calculators and by the quotation facade.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// No usable configuration row for the requested vehicle type.
    #[error("no {what} configured for vehicle type '{vehicle_type}'")]
    ConfigMissing {
        vehicle_type: String,
        what: ConfigKind,
    },

    #[error(transparent)]
    RouteUnavailable(#[from] OracleError),

    #[error("invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("zone data unavailable: {0}")]
    ZoneDataUnavailable(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A tier produced a total that cannot be shown to a rider.
    #[error("computed fare {0} is not a usable price")]
    InvalidFare(i64),

    #[error("fare service temporarily unavailable")]
    ServiceUnavailable,
}

impl QuoteError {
    pub fn config_missing(vehicle_type: impl Into<String>, what: ConfigKind) -> Self {
        QuoteError::ConfigMissing {
            vehicle_type: vehicle_type.into(),
            what,
        }
    }

    /// Whether a later fallback tier may still produce a quote.
    ///
    /// Invalid coordinates are rejected outright; everything else is a
    /// reason to degrade.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, QuoteError::InvalidCoordinates { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_missing_names_vehicle_and_kind() {
        let err = QuoteError::config_missing("sedan", ConfigKind::PerKmConfig);
        assert_eq!(
            err.to_string(),
            "no outstation per-km config configured for vehicle type 'sedan'"
        );
    }

    #[test]
    fn invalid_coordinates_are_not_recoverable() {
        let err = QuoteError::InvalidCoordinates {
            latitude: 91.0,
            longitude: 0.0,
        };
        assert!(!err.is_recoverable());
        assert!(QuoteError::Store(StoreError::DeadlineExceeded).is_recoverable());
    }
}
