//! Resolution of a search request's constraint into one predicate tree.

use model::{error::FilterError, filter::PredicateTree};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parser for the CQL text form of a constraint.
pub trait CqlParser {
    fn parse(&self, cql: &str) -> Result<PredicateTree, FilterError>;
}

impl<F> CqlParser for F
where
    F: Fn(&str) -> Result<PredicateTree, FilterError>,
{
    fn parse(&self, cql: &str) -> Result<PredicateTree, FilterError> {
        self(cql)
    }
}

/// The constraint of a search request: a structured filter or CQL text, never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConstraint {
    #[serde(default)]
    pub filter: Option<PredicateTree>,
    #[serde(default)]
    pub cql: Option<String>,
}

impl SearchConstraint {
    pub fn from_filter(filter: PredicateTree) -> Self {
        Self {
            filter: Some(filter),
            cql: None,
        }
    }

    pub fn from_cql(cql: impl Into<String>) -> Self {
        Self {
            filter: None,
            cql: Some(cql.into()),
        }
    }

    pub fn resolve<P: CqlParser>(self, parser: &P) -> Result<PredicateTree, FilterError> {
        let cql = self.cql.filter(|text| !text.trim().is_empty());

        match (self.filter, cql) {
            (Some(filter), None) => Ok(filter),
            (None, Some(cql)) => {
                debug!("Parsing CQL constraint '{cql}'");
                parser.parse(&cql)
            }
            (Some(_), Some(_)) => Err(FilterError::ConflictingConstraint(
                "both a filter and a CQL text were supplied".to_string(),
            )),
            (None, None) => Err(FilterError::ConflictingConstraint(
                "neither a filter nor a CQL text was supplied".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::filter::Comparison;

    fn title_parser(cql: &str) -> Result<PredicateTree, FilterError> {
        match cql.split_once('=') {
            Some((property, literal)) => Ok(Comparison::equal(property.trim(), literal.trim()).into()),
            None => Err(FilterError::malformed("CQL", format!("cannot parse '{cql}'"))),
        }
    }

    #[test]
    fn test_filter_wins_alone() {
        let tree: PredicateTree = Comparison::equal("Title", "VM").into();
        let resolved = SearchConstraint::from_filter(tree.clone())
            .resolve(&title_parser)
            .unwrap();
        assert_eq!(resolved, tree);
    }

    #[test]
    fn test_cql_is_parsed() {
        let resolved = SearchConstraint::from_cql("Title = VM")
            .resolve(&title_parser)
            .unwrap();
        assert_eq!(resolved, Comparison::equal("Title", "VM").into());
    }

    #[test]
    fn test_conflicts() {
        let both = SearchConstraint {
            filter: Some(Comparison::equal("Title", "VM").into()),
            cql: Some("Title = VM".to_string()),
        };
        assert!(matches!(
            both.resolve(&title_parser),
            Err(FilterError::ConflictingConstraint(_))
        ));
        assert!(matches!(
            SearchConstraint::default().resolve(&title_parser),
            Err(FilterError::ConflictingConstraint(_))
        ));
        assert!(matches!(
            SearchConstraint::from_cql("   ").resolve(&title_parser),
            Err(FilterError::ConflictingConstraint(_))
        ));
    }
}
