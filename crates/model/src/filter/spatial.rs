use crate::geometry::Geometry;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpatialOperator {
    BBox,
    DWithin,
    Beyond,
    Contains,
    Crosses,
    Disjoint,
    Equals,
    Intersects,
    Overlaps,
    Touches,
    Within,
}

impl SpatialOperator {
    pub fn is_distance(&self) -> bool {
        matches!(self, SpatialOperator::DWithin | SpatialOperator::Beyond)
    }
}

impl fmt::Display for SpatialOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpatialOperator::BBox => "BBOX",
            SpatialOperator::DWithin => "DWithin",
            SpatialOperator::Beyond => "Beyond",
            SpatialOperator::Contains => "Contains",
            SpatialOperator::Crosses => "Crosses",
            SpatialOperator::Disjoint => "Disjoint",
            SpatialOperator::Equals => "Equals",
            SpatialOperator::Intersects => "Intersects",
            SpatialOperator::Overlaps => "Overlaps",
            SpatialOperator::Touches => "Touches",
            SpatialOperator::Within => "Within",
        };
        write!(f, "{name}")
    }
}

/// A spatial leaf: `<op>(property, geometry [, distance units])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spatial {
    pub operator: SpatialOperator,
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub crs: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub units: Option<String>,
}

impl Spatial {
    pub fn new(operator: SpatialOperator, property: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            operator,
            property: Some(property.into()),
            geometry: Some(geometry),
            crs: None,
            distance: None,
            units: None,
        }
    }

    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = Some(crs.into());
        self
    }

    pub fn with_distance(mut self, distance: f64, units: impl Into<String>) -> Self {
        self.distance = Some(distance);
        self.units = Some(units.into());
        self
    }
}
