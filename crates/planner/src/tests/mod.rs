mod index_backend;
mod sql_backend;

use model::{
    filter::{Spatial, SpatialOperator},
    geometry::{Coordinate, Envelope, Geometry},
};

fn intersects_box() -> Spatial {
    Spatial::new(
        SpatialOperator::Intersects,
        "ows:BoundingBox",
        Geometry::Envelope(Envelope::new(1.1, 1.2, 3.4, 5.6)),
    )
    .with_crs("EPSG:4326")
}

fn dwithin_point(distance: f64) -> Spatial {
    Spatial::new(
        SpatialOperator::DWithin,
        "ows:BoundingBox",
        Geometry::Point(Coordinate::new(3.4, 2.5)),
    )
    .with_distance(distance, "m")
}
