//! Comparison symbols of the EAV SQL backend.

use model::filter::ComparisonOperator;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlComparator {
    Equal,
    NotEqual,
    Like,
    NotLike,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl SqlComparator {
    /// Comparator for a binary comparison, `None` for `IsNull` and `Between`.
    pub fn for_operator(operator: &ComparisonOperator) -> Option<Self> {
        match operator {
            ComparisonOperator::Equal => Some(SqlComparator::Equal),
            ComparisonOperator::NotEqual => Some(SqlComparator::NotEqual),
            ComparisonOperator::Like(_) => Some(SqlComparator::Like),
            ComparisonOperator::GreaterThan => Some(SqlComparator::GreaterThan),
            ComparisonOperator::GreaterOrEqual => Some(SqlComparator::GreaterOrEqual),
            ComparisonOperator::LessThan => Some(SqlComparator::LessThan),
            ComparisonOperator::LessOrEqual => Some(SqlComparator::LessOrEqual),
            ComparisonOperator::IsNull | ComparisonOperator::Between { .. } => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            SqlComparator::Equal => "=",
            SqlComparator::NotEqual => "!=",
            SqlComparator::Like => "LIKE",
            SqlComparator::NotLike => "NOT LIKE",
            SqlComparator::GreaterThan => ">",
            SqlComparator::GreaterOrEqual => ">=",
            SqlComparator::LessThan => "<",
            SqlComparator::LessOrEqual => "<=",
        }
    }

    /// The comparator selecting exactly the rows this one rejects.
    pub fn inverted(&self) -> Self {
        match self {
            SqlComparator::Equal => SqlComparator::NotEqual,
            SqlComparator::NotEqual => SqlComparator::Equal,
            SqlComparator::Like => SqlComparator::NotLike,
            SqlComparator::NotLike => SqlComparator::Like,
            SqlComparator::GreaterThan => SqlComparator::LessOrEqual,
            SqlComparator::GreaterOrEqual => SqlComparator::LessThan,
            SqlComparator::LessThan => SqlComparator::GreaterOrEqual,
            SqlComparator::LessOrEqual => SqlComparator::GreaterThan,
        }
    }
}

impl fmt::Display for SqlComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
