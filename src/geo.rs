//! GeoJSON point/polygon shapes and the bounding-box region query.

use serde::{Deserialize, Serialize};

/// A `[longitude, latitude]` pair, in GeoJSON order.
pub type Position = [f64; 2];

/// Tolerance used when deciding whether a point sits on a ring edge.
const EDGE_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointKind {
    Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolygonKind {
    Polygon,
}

/// A GeoJSON point: `{"type": "Point", "coordinates": [lon, lat]}`.
///
/// Any other geometry type is rejected during deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(rename = "type")]
    pub kind: PointKind,
    pub coordinates: Position,
}

impl Point {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            kind: PointKind::Point,
            coordinates: [lon, lat],
        }
    }

    pub fn lon(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn lat(&self) -> f64 {
        self.coordinates[1]
    }
}

/// A GeoJSON polygon with a single exterior ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(rename = "type")]
    pub kind: PolygonKind,
    pub coordinates: Vec<Vec<Position>>,
}

impl Polygon {
    pub fn from_ring(ring: Vec<Position>) -> Self {
        Self {
            kind: PolygonKind::Polygon,
            coordinates: vec![ring],
        }
    }

    pub fn exterior(&self) -> &[Position] {
        self.coordinates.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `point` lies inside the exterior ring. Points on an edge or
    /// vertex count as inside.
    pub fn contains(&self, point: &Point) -> bool {
        let ring = self.exterior();
        let [px, py] = point.coordinates;

        if ring.windows(2).any(|edge| on_segment(edge[0], edge[1], point.coordinates)) {
            return true;
        }

        // Even-odd ray cast towards +x.
        let mut inside = false;
        for edge in ring.windows(2) {
            let [x1, y1] = edge[0];
            let [x2, y2] = edge[1];
            if (y1 > py) != (y2 > py) {
                let cross_x = x1 + (py - y1) * (x2 - x1) / (y2 - y1);
                if px < cross_x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Postgres `polygon` literal for the exterior ring, e.g. `((30,10),(30,20),...)`.
    pub fn to_pg_literal(&self) -> String {
        let points: Vec<String> = self
            .exterior()
            .iter()
            .map(|[x, y]| format!("({x},{y})"))
            .collect();
        format!("({})", points.join(","))
    }
}

fn on_segment(a: Position, b: Position, p: Position) -> bool {
    let cross = (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0]);
    if cross.abs() > EDGE_EPSILON {
        return false;
    }
    p[0] >= a[0].min(b[0])
        && p[0] <= a[0].max(b[0])
        && p[1] >= a[1].min(b[1])
        && p[1] <= a[1].max(b[1])
}

/// Rectangular lat/lon region, as read from the `minLat`/`maxLat`/`minLon`/`maxLon`
/// query parameters.
///
/// Ordering of min/max is not checked: an inverted box still produces a ring
/// and the store decides what it contains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Closed ring traversed (minLon,minLat) → (minLon,maxLat) → (maxLon,maxLat)
    /// → (maxLon,minLat) → (minLon,minLat).
    pub fn ring(&self) -> [Position; 5] {
        [
            [self.min_lon, self.min_lat],
            [self.min_lon, self.max_lat],
            [self.max_lon, self.max_lat],
            [self.max_lon, self.min_lat],
            [self.min_lon, self.min_lat],
        ]
    }

    pub fn to_polygon(&self) -> Polygon {
        Polygon::from_ring(self.ring().to_vec())
    }
}
