//! OSRM HTTP adapter for point-to-point routes.

use std::time::Duration;

use serde::Deserialize;

use crate::error::OracleError;
use crate::models::Coordinate;
use crate::polyline::Polyline;
use crate::traits::{Directions, RouteOracle};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmRouteOracle {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmRouteOracle {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=polyline",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            origin.longitude(),
            origin.latitude(),
            destination.longitude(),
            destination.latitude(),
        )
    }
}

impl RouteOracle for OsrmRouteOracle {
    fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        timeout: Duration,
    ) -> Result<Directions, OracleError> {
        let body = self
            .client
            .get(self.route_url(origin, destination))
            .timeout(timeout)
            .send()
            .and_then(|resp| resp.error_for_status())?
            .json::<OsrmRouteResponse>()
            .map_err(|err| OracleError::Malformed(err.to_string()))?;

        parse_route_response(body)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    routes: Option<Vec<OsrmRoute>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64, // metres
    duration: f64, // seconds
    #[serde(default)]
    geometry: Option<String>,
}

fn parse_route_response(resp: OsrmRouteResponse) -> Result<Directions, OracleError> {
    if resp.code != "Ok" {
        return Err(OracleError::Api(resp.code));
    }

    let route = resp
        .routes
        .and_then(|routes| routes.into_iter().next())
        .ok_or(OracleError::NoRoute)?;

    let polyline = match route.geometry.as_deref() {
        Some(encoded) => {
            Polyline::decode(encoded).map_err(|err| OracleError::Malformed(err.to_string()))?
        }
        None => Polyline::default(),
    };

    Ok(Directions {
        distance_meters: route.distance,
        duration_seconds: route.duration,
        polyline,
    })
}
