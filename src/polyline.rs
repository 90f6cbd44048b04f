//! Polyline representation for route geometries.
//!
//! The route oracle returns geometry in the compact encoded polyline format
//! (precision 5). Decoding happens once at the oracle boundary; the engine
//! only ever sees decoded points.

use serde::{Deserialize, Serialize};

/// A route geometry as decoded (latitude, longitude) points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

/// Error returned for truncated or overlong encoded polylines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid encoded polyline at byte {position}")]
pub struct PolylineDecodeError {
    pub position: usize,
}

const PRECISION: f64 = 1e5;

impl Polyline {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Decodes an encoded polyline string.
    pub fn decode(encoded: &str) -> Result<Self, PolylineDecodeError> {
        let bytes = encoded.as_bytes();
        let mut index = 0;
        let mut lat = 0i64;
        let mut lng = 0i64;
        let mut points = Vec::new();

        while index < bytes.len() {
            lat += decode_value(bytes, &mut index)?;
            lng += decode_value(bytes, &mut index)?;
            points.push((lat as f64 / PRECISION, lng as f64 / PRECISION));
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn decode_value(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineDecodeError> {
    let mut result = 0i64;
    let mut shift = 0u32;

    loop {
        let byte = *bytes
            .get(*index)
            .ok_or(PolylineDecodeError { position: *index })?;
        if !(63..=126).contains(&byte) || shift > 30 {
            return Err(PolylineDecodeError { position: *index });
        }
        *index += 1;

        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 == 1 { !(result >> 1) } else { result >> 1 })
}
