//! Minimal geometry model carried by spatial filters.
//!
//! Coordinates are kept exactly as the parser delivered them; interpretation depends
//! on the CRS attached to the enclosing spatial node.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box given by its lower and upper corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub lower: Coordinate,
    pub upper: Coordinate,
}

impl Envelope {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            lower: Coordinate::new(min_x, min_y),
            upper: Coordinate::new(max_x, max_y),
        }
    }

    pub fn contains(&self, c: &Coordinate) -> bool {
        c.x >= self.lower.x && c.x <= self.upper.x && c.y >= self.lower.y && c.y <= self.upper.y
    }

    pub fn intersects(&self, other: &Envelope) -> bool {
        self.lower.x <= other.upper.x
            && self.upper.x >= other.lower.x
            && self.lower.y <= other.upper.y
            && self.upper.y >= other.lower.y
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Point(Coordinate),
    LineString { coordinates: Vec<Coordinate> },
    /// Exterior ring followed by optional interior rings.
    Polygon { rings: Vec<Vec<Coordinate>> },
    Envelope(Envelope),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString { .. } => GeometryKind::LineString,
            Geometry::Polygon { .. } => GeometryKind::Polygon,
            Geometry::Envelope(_) => GeometryKind::Envelope,
        }
    }

    /// Bounding envelope of the geometry, `None` for empty line strings or polygons.
    pub fn envelope(&self) -> Option<Envelope> {
        let coords: Vec<&Coordinate> = match self {
            Geometry::Point(c) => vec![c],
            Geometry::LineString { coordinates } => coordinates.iter().collect(),
            Geometry::Polygon { rings } => rings.first().map(|r| r.iter().collect())?,
            Geometry::Envelope(env) => return Some(*env),
        };

        let first = coords.first()?;
        let mut env = Envelope {
            lower: **first,
            upper: **first,
        };
        for c in coords.iter().skip(1) {
            env.lower.x = env.lower.x.min(c.x);
            env.lower.y = env.lower.y.min(c.y);
            env.upper.x = env.upper.x.max(c.x);
            env.upper.y = env.upper.y.max(c.y);
        }
        Some(env)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    Envelope,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryKind::Point => write!(f, "Point"),
            GeometryKind::LineString => write!(f, "LineString"),
            GeometryKind::Polygon => write!(f, "Polygon"),
            GeometryKind::Envelope => write!(f, "Envelope"),
        }
    }
}
