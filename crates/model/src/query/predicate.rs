use crate::{filter::SpatialOperator, geometry::Geometry};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Spatial reference system identified by its EPSG code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpatialReference {
    pub srid: u32,
}

impl SpatialReference {
    pub const WGS84: SpatialReference = SpatialReference { srid: 4326 };

    pub fn new(srid: u32) -> Self {
        Self { srid }
    }
}

impl fmt::Display for SpatialReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.srid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceUnit {
    Meters,
    Kilometers,
    Miles,
    Feet,
    NauticalMiles,
}

impl DistanceUnit {
    pub fn meters_per_unit(&self) -> f64 {
        match self {
            DistanceUnit::Meters => 1.0,
            DistanceUnit::Kilometers => 1_000.0,
            DistanceUnit::Miles => 1_609.344,
            DistanceUnit::Feet => 0.3048,
            DistanceUnit::NauticalMiles => 1_852.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub value: f64,
    pub unit: DistanceUnit,
}

impl Distance {
    pub fn in_meters(&self) -> f64 {
        self.value * self.unit.meters_per_unit()
    }
}

/// Backend-neutral geometry predicate evaluated by the execution engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryPredicate {
    pub operator: SpatialOperator,
    pub property: Option<String>,
    pub geometry: Geometry,
    pub reference: SpatialReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<Distance>,
}

impl fmt::Display for GeometryPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.operator)?;
        if let Some(property) = &self.property {
            write!(f, "{property}, ")?;
        }
        write!(f, "{} {}", self.geometry.kind(), self.reference)?;
        if let Some(distance) = &self.distance {
            write!(f, ", {}m", distance.in_meters())?;
        }
        write!(f, ")")
    }
}
