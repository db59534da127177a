//! Predicate tree handed over by the request parser.

use serde::{Deserialize, Serialize};

pub mod comparison;
pub mod logical;
pub mod spatial;

pub use comparison::{Comparison, ComparisonOperator, LikePattern};
pub use logical::{Logical, LogicalOperator, Operand};
pub use spatial::{Spatial, SpatialOperator};

/// Root of a parsed filter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateTree {
    Comparison(Comparison),
    Spatial(Spatial),
    Logical(Logical),
    /// Identifier-based selection (`FeatureId`, `GmlObjectId`); never compiled.
    Identifiers(Vec<String>),
}

impl From<Comparison> for PredicateTree {
    fn from(value: Comparison) -> Self {
        PredicateTree::Comparison(value)
    }
}

impl From<Spatial> for PredicateTree {
    fn from(value: Spatial) -> Self {
        PredicateTree::Spatial(value)
    }
}

impl From<Logical> for PredicateTree {
    fn from(value: Logical) -> Self {
        PredicateTree::Logical(value)
    }
}
