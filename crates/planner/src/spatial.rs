//! Turns spatial leaves into backend-neutral geometry predicates.

use model::{
    error::FilterError,
    filter::{Spatial, SpatialOperator},
    geometry::{Geometry, GeometryKind},
    query::{Distance, DistanceUnit, GeometryPredicate, SpatialReference},
};
use tracing::trace;

#[derive(Debug, Clone)]
pub struct SpatialPredicateBuilder {
    /// Reference assumed when a distance or topological operator names no CRS.
    default_reference: SpatialReference,
}

impl Default for SpatialPredicateBuilder {
    fn default() -> Self {
        Self {
            default_reference: SpatialReference::WGS84,
        }
    }
}

impl SpatialPredicateBuilder {
    pub fn new(default_reference: SpatialReference) -> Self {
        Self { default_reference }
    }

    pub fn build(&self, spatial: &Spatial) -> Result<GeometryPredicate, FilterError> {
        let operator = spatial.operator.to_string();
        let geometry = spatial
            .geometry
            .clone()
            .ok_or_else(|| FilterError::malformed(&operator, "missing geometry"))?;

        let predicate = match spatial.operator {
            SpatialOperator::BBox => {
                let property = spatial
                    .property
                    .as_deref()
                    .filter(|p| p.contains("BoundingBox"))
                    .ok_or_else(|| {
                        FilterError::malformed(&operator, "propertyName must be BoundingBox")
                    })?;
                if !matches!(geometry, Geometry::Envelope(_)) {
                    return Err(FilterError::malformed(
                        &operator,
                        format!("expected an Envelope, found {}", geometry.kind()),
                    ));
                }
                let crs = spatial
                    .crs
                    .as_deref()
                    .ok_or_else(|| FilterError::malformed(&operator, "missing CRS"))?;

                GeometryPredicate {
                    operator: spatial.operator,
                    property: Some(property.to_string()),
                    geometry,
                    reference: parse_crs(&operator, crs)?,
                    distance: None,
                }
            }
            SpatialOperator::DWithin | SpatialOperator::Beyond => {
                if geometry.kind() == GeometryKind::Polygon {
                    return Err(FilterError::malformed(
                        &operator,
                        "expected a Point, LineString or Envelope",
                    ));
                }
                let value = spatial
                    .distance
                    .ok_or_else(|| FilterError::malformed(&operator, "missing distance"))?;
                if !value.is_finite() || value < 0.0 {
                    return Err(FilterError::malformed(
                        &operator,
                        format!("invalid distance {value}"),
                    ));
                }
                let units = spatial
                    .units
                    .as_deref()
                    .ok_or_else(|| FilterError::malformed(&operator, "missing distance units"))?;

                GeometryPredicate {
                    operator: spatial.operator,
                    property: spatial.property.clone(),
                    geometry,
                    reference: self.reference(&operator, spatial)?,
                    distance: Some(Distance {
                        value,
                        unit: parse_units(&operator, units)?,
                    }),
                }
            }
            SpatialOperator::Contains
            | SpatialOperator::Crosses
            | SpatialOperator::Disjoint
            | SpatialOperator::Equals
            | SpatialOperator::Intersects
            | SpatialOperator::Overlaps
            | SpatialOperator::Touches
            | SpatialOperator::Within => {
                let property = spatial
                    .property
                    .as_deref()
                    .filter(|p| !p.trim().is_empty())
                    .ok_or_else(|| FilterError::malformed(&operator, "missing propertyName"))?;

                GeometryPredicate {
                    operator: spatial.operator,
                    property: Some(property.to_string()),
                    geometry,
                    reference: self.reference(&operator, spatial)?,
                    distance: None,
                }
            }
        };

        trace!("Built geometry predicate {predicate}");
        Ok(predicate)
    }

    fn reference(&self, operator: &str, spatial: &Spatial) -> Result<SpatialReference, FilterError> {
        match spatial.crs.as_deref() {
            Some(crs) => parse_crs(operator, crs),
            None => Ok(self.default_reference),
        }
    }
}

/// Resolves the usual spellings of an EPSG reference to its code.
pub fn parse_crs(operator: &str, crs: &str) -> Result<SpatialReference, FilterError> {
    let crs = crs.trim();
    if crs.eq_ignore_ascii_case("CRS:84") || crs.eq_ignore_ascii_case("urn:ogc:def:crs:OGC:1.3:CRS84") {
        return Ok(SpatialReference::WGS84);
    }

    let upper = crs.to_ascii_uppercase();
    let code = if upper.starts_with("EPSG:") && !upper.starts_with("EPSG::") {
        crs.get(5..)
    } else if upper.starts_with("URN:OGC:DEF:CRS:EPSG:") || upper.starts_with("URN:X-OGC:DEF:CRS:EPSG:") {
        // urn:ogc:def:crs:EPSG:[version]:code
        crs.rsplit(':').next()
    } else if upper.starts_with("HTTP://WWW.OPENGIS.NET/GML/SRS/EPSG.XML#") {
        crs.rsplit('#').next()
    } else if upper.starts_with("HTTP://WWW.OPENGIS.NET/DEF/CRS/EPSG/") {
        crs.rsplit('/').next()
    } else {
        None
    };

    code.and_then(|c| c.trim().parse::<u32>().ok())
        .map(SpatialReference::new)
        .ok_or_else(|| FilterError::malformed(operator, format!("unrecognized CRS '{crs}'")))
}

pub fn parse_units(operator: &str, units: &str) -> Result<DistanceUnit, FilterError> {
    match units.trim().to_ascii_lowercase().as_str() {
        "m" | "meter" | "meters" | "metre" | "metres" => Ok(DistanceUnit::Meters),
        "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => {
            Ok(DistanceUnit::Kilometers)
        }
        "mi" | "mile" | "miles" => Ok(DistanceUnit::Miles),
        "ft" | "foot" | "feet" => Ok(DistanceUnit::Feet),
        "nm" | "nmi" | "nautical mile" | "nautical miles" => Ok(DistanceUnit::NauticalMiles),
        other => Err(FilterError::malformed(
            operator,
            format!("unknown distance units '{other}'"),
        )),
    }
}
