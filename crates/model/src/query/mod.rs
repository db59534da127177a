//! Compiler output handed to the execution engine.

pub mod chain;
pub mod composite;
pub mod predicate;

pub use chain::{ChainFilter, SpatialFilter};
pub use composite::{CompositeQuery, MATCH_ALL};
pub use predicate::{Distance, DistanceUnit, GeometryPredicate, SpatialReference};
