use super::predicate::GeometryPredicate;
use crate::filter::LogicalOperator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One element of a chain: a geometry predicate or a nested chain folded in from a
/// child group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialFilter {
    Predicate(GeometryPredicate),
    Chain(ChainFilter),
}

impl SpatialFilter {
    pub fn evaluate<F>(&self, test: &F) -> bool
    where
        F: Fn(&GeometryPredicate) -> bool,
    {
        match self {
            SpatialFilter::Predicate(p) => test(p),
            SpatialFilter::Chain(c) => c.evaluate(test),
        }
    }
}

impl From<GeometryPredicate> for SpatialFilter {
    fn from(value: GeometryPredicate) -> Self {
        SpatialFilter::Predicate(value)
    }
}

/// Ordered geometry filters joined by pairwise connectors.
///
/// `connectors.len() == filters.len() - 1`, except for the negated singleton whose
/// connectors are exactly `[Not]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawChain")]
pub struct ChainFilter {
    filters: Vec<SpatialFilter>,
    connectors: Vec<LogicalOperator>,
}

/// Unchecked wire form of a [`ChainFilter`].
#[derive(Deserialize)]
struct RawChain {
    filters: Vec<SpatialFilter>,
    #[serde(default)]
    connectors: Vec<LogicalOperator>,
}

impl TryFrom<RawChain> for ChainFilter {
    type Error = String;

    fn try_from(raw: RawChain) -> Result<Self, Self::Error> {
        let negated_singleton =
            raw.filters.len() == 1 && raw.connectors == [LogicalOperator::Not];
        let expected = raw.filters.len().saturating_sub(1);
        if raw.connectors.len() != expected && !negated_singleton {
            return Err(format!(
                "chain of {} filter(s) needs {expected} connector(s), found {}",
                raw.filters.len(),
                raw.connectors.len()
            ));
        }

        Ok(Self {
            filters: raw.filters,
            connectors: raw.connectors,
        })
    }
}

impl ChainFilter {
    pub fn single(filter: impl Into<SpatialFilter>) -> Self {
        Self {
            filters: vec![filter.into()],
            connectors: Vec::new(),
        }
    }

    pub fn negated(filter: impl Into<SpatialFilter>) -> Self {
        Self {
            filters: vec![filter.into()],
            connectors: vec![LogicalOperator::Not],
        }
    }

    /// Builds the chain of one grouping level, `None` when no filter was collected.
    ///
    /// A lone filter under `And`/`Or` is returned as-is (unwrapping a nested chain);
    /// under `Not` it becomes the negated singleton.
    pub fn from_filters(operator: LogicalOperator, mut filters: Vec<SpatialFilter>) -> Option<Self> {
        match filters.len() {
            0 => None,
            1 => {
                let filter = filters.remove(0);
                match (operator, filter) {
                    (LogicalOperator::Not, filter) => Some(Self::negated(filter)),
                    (_, SpatialFilter::Chain(chain)) => Some(chain),
                    (_, filter) => Some(Self::single(filter)),
                }
            }
            n => Some(Self {
                filters,
                connectors: vec![operator; n - 1],
            }),
        }
    }

    pub fn filters(&self) -> &[SpatialFilter] {
        &self.filters
    }

    pub fn connectors(&self) -> &[LogicalOperator] {
        &self.connectors
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn is_negation(&self) -> bool {
        self.filters.len() == 1 && self.connectors == [LogicalOperator::Not]
    }

    /// The chain without its singleton negation, or a clone of itself.
    pub fn without_negation(&self) -> ChainFilter {
        if self.is_negation() {
            Self {
                filters: self.filters.clone(),
                connectors: Vec::new(),
            }
        } else {
            self.clone()
        }
    }

    /// Converts the chain into a filter that can be folded into a parent level.
    pub fn into_filter(mut self) -> SpatialFilter {
        if self.filters.len() == 1 && self.connectors.is_empty() {
            self.filters.remove(0)
        } else {
            SpatialFilter::Chain(self)
        }
    }

    /// Every geometry predicate of the chain, depth first.
    pub fn predicates(&self) -> Vec<&GeometryPredicate> {
        let mut out = Vec::new();
        for filter in &self.filters {
            match filter {
                SpatialFilter::Predicate(p) => out.push(p),
                SpatialFilter::Chain(c) => out.extend(c.predicates()),
            }
        }
        out
    }

    /// Evaluates the chain for one record, applying connectors left to right.
    /// `Not` between two filters reads as "and not".
    pub fn evaluate<F>(&self, test: &F) -> bool
    where
        F: Fn(&GeometryPredicate) -> bool,
    {
        let Some(first) = self.filters.first() else {
            return true;
        };

        if self.is_negation() {
            return !first.evaluate(test);
        }

        let mut result = first.evaluate(test);
        for (filter, connector) in self.filters.iter().skip(1).zip(&self.connectors) {
            result = match connector {
                LogicalOperator::And => result && filter.evaluate(test),
                LogicalOperator::Or => result || filter.evaluate(test),
                LogicalOperator::Not => result && !filter.evaluate(test),
            };
        }
        result
    }
}

impl fmt::Display for ChainFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negation() {
            write!(f, "NOT ")?;
        }
        write!(f, "[")?;
        if let Some(first) = self.filters.first() {
            write!(f, "{first}")?;
        }
        for (filter, connector) in self.filters.iter().skip(1).zip(&self.connectors) {
            write!(f, " {connector} {filter}")?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for SpatialFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpatialFilter::Predicate(p) => write!(f, "{p}"),
            SpatialFilter::Chain(c) => write!(f, "{c}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        filter::SpatialOperator,
        geometry::{Envelope, Geometry},
        query::predicate::SpatialReference,
    };

    fn predicate(operator: SpatialOperator) -> GeometryPredicate {
        GeometryPredicate {
            operator,
            property: Some("BoundingBox".to_string()),
            geometry: Geometry::Envelope(Envelope::new(0.0, 0.0, 1.0, 1.0)),
            reference: SpatialReference::WGS84,
            distance: None,
        }
    }

    #[test]
    fn test_from_filters_connector_count() {
        let chain = ChainFilter::from_filters(
            LogicalOperator::Or,
            vec![
                predicate(SpatialOperator::Intersects).into(),
                predicate(SpatialOperator::Within).into(),
                predicate(SpatialOperator::Touches).into(),
            ],
        )
        .unwrap();

        assert_eq!(chain.len(), 3);
        assert_eq!(chain.connectors(), &[LogicalOperator::Or, LogicalOperator::Or]);
    }

    #[test]
    fn test_from_filters_single_not() {
        let chain = ChainFilter::from_filters(
            LogicalOperator::Not,
            vec![predicate(SpatialOperator::Intersects).into()],
        )
        .unwrap();

        assert!(chain.is_negation());
        assert!(!chain.without_negation().is_negation());
        assert!(ChainFilter::from_filters(LogicalOperator::And, vec![]).is_none());
    }

    #[test]
    fn test_from_filters_unwraps_nested_chain() {
        let inner = ChainFilter::negated(predicate(SpatialOperator::Within));
        let chain = ChainFilter::from_filters(
            LogicalOperator::And,
            vec![SpatialFilter::Chain(inner.clone())],
        )
        .unwrap();

        assert_eq!(chain, inner);
    }

    #[test]
    fn test_evaluate_left_to_right() {
        let chain = ChainFilter::from_filters(
            LogicalOperator::And,
            vec![
                predicate(SpatialOperator::Intersects).into(),
                predicate(SpatialOperator::Within).into(),
            ],
        )
        .unwrap();

        let only_intersects = |p: &GeometryPredicate| p.operator == SpatialOperator::Intersects;
        assert!(!chain.evaluate(&only_intersects));

        let negated = ChainFilter::negated(SpatialFilter::Chain(chain));
        assert!(negated.evaluate(&only_intersects));
        assert_eq!(negated.predicates().len(), 2);
    }

    #[test]
    fn test_deserialize_rejects_mismatched_connectors() {
        let chain = ChainFilter::from_filters(
            LogicalOperator::And,
            vec![
                predicate(SpatialOperator::Intersects).into(),
                predicate(SpatialOperator::Within).into(),
            ],
        )
        .unwrap();

        let json = serde_json::to_value(&chain).unwrap();
        let parsed: ChainFilter = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(parsed, chain);
        assert_eq!(parsed.to_string(), chain.to_string());

        let mut broken = json;
        broken["connectors"] = serde_json::json!([]);
        let err = serde_json::from_value::<ChainFilter>(broken).unwrap_err();
        assert!(err.to_string().contains("needs 1 connector(s), found 0"));

        let negated = serde_json::to_value(ChainFilter::negated(predicate(SpatialOperator::Within)))
            .unwrap();
        assert!(
            serde_json::from_value::<ChainFilter>(negated)
                .unwrap()
                .is_negation()
        );
    }
}
