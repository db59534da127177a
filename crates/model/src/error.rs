use thiserror::Error;

/// Errors raised while compiling a filter tree into a backend query.
///
/// Every error is local to a single compile call. Compilation is deterministic, so
/// none of them is worth retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// A required sub-element (property name, literal, boundary, geometry, CRS,
    /// distance units) is missing or unusable.
    #[error("Malformed {operator} filter: {reason}")]
    MalformedFilter { operator: String, reason: String },

    /// The comparison cannot be expressed against this property in this backend.
    #[error("Unsupported comparison {operator} on property '{property}'")]
    UnsupportedComparison { operator: String, property: String },

    #[error("Unable to parse date literal '{0}'")]
    UnparsableDate(String),

    #[error("Unable to parse numeric literal '{0}'")]
    UnparsableNumber(String),

    /// Identifier-based filters and similar features that are not implemented.
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// A search carried both a structured filter and CQL text, or neither.
    #[error("Conflicting constraint: {0}")]
    ConflictingConstraint(String),
}

impl FilterError {
    pub fn malformed(operator: impl Into<String>, reason: impl Into<String>) -> Self {
        FilterError::MalformedFilter {
            operator: operator.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported_comparison(operator: impl Into<String>, property: impl Into<String>) -> Self {
        FilterError::UnsupportedComparison {
            operator: operator.into(),
            property: property.into(),
        }
    }
}
