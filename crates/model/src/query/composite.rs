use super::chain::ChainFilter;
use crate::filter::LogicalOperator;
use serde::{Deserialize, Serialize};

/// Index field matching every document; stands for "no term constraint".
pub const MATCH_ALL: &str = "metafile:doc";

/// Compiled form of one grouping level of a filter.
///
/// The execution engine evaluates `text` and `predicate_chain` for this level, then
/// combines the result with every entry of `sub_queries` using `combinator`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeQuery {
    pub text: String,
    #[serde(default)]
    pub predicate_chain: Option<ChainFilter>,
    #[serde(default)]
    pub sub_queries: Vec<CompositeQuery>,
    pub combinator: LogicalOperator,
}

impl CompositeQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            predicate_chain: None,
            sub_queries: Vec::new(),
            combinator: LogicalOperator::And,
        }
    }

    /// True when `text` actually restricts the result (neither empty nor the
    /// match-all sentinel).
    pub fn has_term_constraint(&self) -> bool {
        is_term_constraint(&self.text)
    }

    /// Number of grouping levels, this one included.
    pub fn depth(&self) -> usize {
        1 + self
            .sub_queries
            .iter()
            .map(CompositeQuery::depth)
            .max()
            .unwrap_or(0)
    }
}

pub fn is_term_constraint(text: &str) -> bool {
    !text.is_empty() && text != MATCH_ALL
}
