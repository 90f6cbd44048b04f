//! Geofence containment and inner/outer ring classification.

use geo::{Contains, Intersects, Line, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::haversine::haversine_km;
use crate::models::{Coordinate, Zone, ZoneKind};

/// Where a point sits relative to the two nested service rings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneStatus {
    InsideInner,
    BetweenRings,
    OutsideOuter,
    /// A ring needed to decide is missing; zone rules do not apply.
    Unknown,
}

impl Zone {
    /// Geometry invariants: circles need a positive radius, polygons at
    /// least three points forming a simple ring.
    pub fn is_valid(&self) -> bool {
        match self.kind {
            ZoneKind::Circle => self.circle_geometry().is_some(),
            ZoneKind::Polygon => self.simple_polygon().is_some(),
        }
    }

    /// Containment test, or `None` if the zone has no usable geometry.
    ///
    /// Polygon zones without a usable ring fall back to their center/radius.
    pub fn contains(&self, point: Coordinate) -> Option<bool> {
        if self.kind == ZoneKind::Polygon {
            if let Some(polygon) = self.simple_polygon() {
                return Some(polygon.contains(&to_point(point)));
            }
        }
        self.circle_geometry()
            .map(|(center, radius_km)| haversine_km(point, center) <= radius_km)
    }

    fn circle_geometry(&self) -> Option<(Coordinate, f64)> {
        let center = self.center?;
        let radius_km = self.radius_km.filter(|r| r.is_finite() && *r > 0.0)?;
        Some((center, radius_km))
    }

    fn simple_polygon(&self) -> Option<Polygon<f64>> {
        let points = ring_without_closing_point(&self.polygon_points);
        if points.len() < 3 {
            return None;
        }
        Some(to_polygon(points)).filter(is_simple)
    }
}

fn ring_without_closing_point(points: &[Coordinate]) -> &[Coordinate] {
    match points {
        [first, .., last] if points.len() > 3 && first == last => &points[..points.len() - 1],
        _ => points,
    }
}

/// Longitude is x, latitude is y.
fn to_point(point: Coordinate) -> Point<f64> {
    Point::new(point.longitude(), point.latitude())
}

fn to_polygon(ring: &[Coordinate]) -> Polygon<f64> {
    let exterior: Vec<(f64, f64)> = ring
        .iter()
        .map(|c| (c.longitude(), c.latitude()))
        .collect();
    Polygon::new(LineString::from(exterior), vec![])
}

/// Whether `point` lies strictly inside the ring. The closing edge from the
/// last point back to the first is implied.
pub fn point_in_polygon(point: Coordinate, ring: &[Coordinate]) -> bool {
    ring.len() >= 3 && to_polygon(ring).contains(&to_point(point))
}

/// No two non-adjacent edges of the exterior may touch.
fn is_simple(polygon: &Polygon<f64>) -> bool {
    let edges: Vec<Line<f64>> = polygon.exterior().lines().collect();
    let n = edges.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if !adjacent && edges[i].intersects(&edges[j]) {
                return false;
            }
        }
    }
    true
}

/// Classifies points against the named inner and outer rings.
#[derive(Debug, Clone)]
pub struct ZoneClassifier {
    inner_name: String,
    outer_name: String,
}

impl ZoneClassifier {
    pub fn new(inner_name: impl Into<String>, outer_name: impl Into<String>) -> Self {
        Self {
            inner_name: inner_name.into(),
            outer_name: outer_name.into(),
        }
    }

    fn find<'z>(&self, zones: &'z [Zone], name: &str) -> Option<&'z Zone> {
        zones
            .iter()
            .find(|zone| zone.is_active && zone.name == name)
    }

    /// Both rings are tested independently before the status is decided.
    pub fn classify(&self, point: Coordinate, zones: &[Zone]) -> ZoneStatus {
        let in_inner = self
            .find(zones, &self.inner_name)
            .and_then(|zone| zone.contains(point));
        let in_outer = self
            .find(zones, &self.outer_name)
            .and_then(|zone| zone.contains(point));

        match (in_inner, in_outer) {
            (Some(true), _) => ZoneStatus::InsideInner,
            (Some(false), Some(true)) => ZoneStatus::BetweenRings,
            (_, Some(false)) => ZoneStatus::OutsideOuter,
            _ => ZoneStatus::Unknown,
        }
    }

    /// Service-area admission: membership in the outer ring only. Without a
    /// usable outer ring the check does not reject anything.
    pub fn inside_service_area(&self, point: Coordinate, zones: &[Zone]) -> bool {
        self.find(zones, &self.outer_name)
            .and_then(|zone| zone.contains(point))
            .unwrap_or(true)
    }
}
