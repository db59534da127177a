use serde::{Deserialize, Serialize};
use std::fmt;

/// Wildcard conventions of a `PropertyIsLike` pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikePattern {
    pub wildcard: char,
    pub single: char,
    pub escape: char,
}

impl Default for LikePattern {
    fn default() -> Self {
        Self {
            wildcard: '*',
            single: '?',
            escape: '\\',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    Like(LikePattern),
    IsNull,
    Between {
        lower: Option<String>,
        upper: Option<String>,
    },
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl ComparisonOperator {
    /// Whether the operator is one of the four ordered range comparisons.
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            ComparisonOperator::GreaterThan
                | ComparisonOperator::GreaterOrEqual
                | ComparisonOperator::LessThan
                | ComparisonOperator::LessOrEqual
        )
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOperator::Equal => write!(f, "PropertyIsEqualTo"),
            ComparisonOperator::NotEqual => write!(f, "PropertyIsNotEqualTo"),
            ComparisonOperator::Like(_) => write!(f, "PropertyIsLike"),
            ComparisonOperator::IsNull => write!(f, "PropertyIsNull"),
            ComparisonOperator::Between { .. } => write!(f, "PropertyIsBetween"),
            ComparisonOperator::GreaterThan => write!(f, "PropertyIsGreaterThan"),
            ComparisonOperator::GreaterOrEqual => write!(f, "PropertyIsGreaterThanOrEqualTo"),
            ComparisonOperator::LessThan => write!(f, "PropertyIsLessThan"),
            ComparisonOperator::LessOrEqual => write!(f, "PropertyIsLessThanOrEqualTo"),
        }
    }
}

/// A comparison leaf: `property <op> literal`.
///
/// `property` and `literal` stay optional because the upstream parser hands over
/// whatever the request contained; the compiler reports what is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub operator: ComparisonOperator,
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub literal: Option<String>,
}

impl Comparison {
    pub fn new(
        operator: ComparisonOperator,
        property: impl Into<String>,
        literal: impl Into<String>,
    ) -> Self {
        Self {
            operator,
            property: Some(property.into()),
            literal: Some(literal.into()),
        }
    }

    pub fn equal(property: impl Into<String>, literal: impl Into<String>) -> Self {
        Self::new(ComparisonOperator::Equal, property, literal)
    }

    pub fn not_equal(property: impl Into<String>, literal: impl Into<String>) -> Self {
        Self::new(ComparisonOperator::NotEqual, property, literal)
    }

    pub fn like(property: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(
            ComparisonOperator::Like(LikePattern::default()),
            property,
            pattern,
        )
    }

    pub fn is_null(property: impl Into<String>) -> Self {
        Self {
            operator: ComparisonOperator::IsNull,
            property: Some(property.into()),
            literal: None,
        }
    }

    pub fn between(
        property: impl Into<String>,
        lower: impl Into<String>,
        upper: impl Into<String>,
    ) -> Self {
        Self {
            operator: ComparisonOperator::Between {
                lower: Some(lower.into()),
                upper: Some(upper.into()),
            },
            property: Some(property.into()),
            literal: None,
        }
    }
}
