//! Reference evaluation of a [`CompositeQuery`] against a record store.
//!
//! The store answers three primitive questions; every grouping level is then combined
//! from identifier sets according to its combinator.

use model::{
    filter::LogicalOperator,
    query::{ChainFilter, CompositeQuery},
};
use std::collections::BTreeSet;
use tracing::trace;

pub type IdSet = BTreeSet<String>;

/// The store a compiled query runs against.
pub trait QueryEngine {
    type Error;

    fn all_identifiers(&self) -> Result<IdSet, Self::Error>;

    /// Records matching a term query of the backend.
    fn match_text(&self, text: &str) -> Result<IdSet, Self::Error>;

    /// Records whose geometry satisfies the chain.
    fn match_chain(&self, chain: &ChainFilter) -> Result<IdSet, Self::Error>;
}

/// Identifiers selected by `query`.
///
/// Levels without a term constraint, chain or subquery select everything, except under
/// `Not` where they select nothing.
pub fn resolve<E: QueryEngine>(query: &CompositeQuery, engine: &E) -> Result<IdSet, E::Error> {
    let mut operands = Vec::with_capacity(2 + query.sub_queries.len());

    if query.has_term_constraint() {
        operands.push(engine.match_text(&query.text)?);
    }
    if let Some(chain) = &query.predicate_chain {
        // A Not level already negates its operand; its chain tag marks the same negation.
        let chain = match query.combinator {
            LogicalOperator::Not => chain.without_negation(),
            _ => chain.clone(),
        };
        operands.push(engine.match_chain(&chain)?);
    }
    for sub in &query.sub_queries {
        operands.push(resolve(sub, engine)?);
    }

    let result = match query.combinator {
        LogicalOperator::And => match intersection(operands) {
            Some(ids) => ids,
            None => engine.all_identifiers()?,
        },
        LogicalOperator::Or => match union(operands) {
            Some(ids) => ids,
            None => engine.all_identifiers()?,
        },
        LogicalOperator::Not => match intersection(operands) {
            Some(selected) => engine
                .all_identifiers()?
                .difference(&selected)
                .cloned()
                .collect(),
            None => IdSet::new(),
        },
    };

    trace!(
        "Level '{}' ({}) selected {} record(s)",
        query.text,
        query.combinator,
        result.len()
    );
    Ok(result)
}

fn intersection(operands: Vec<IdSet>) -> Option<IdSet> {
    operands
        .into_iter()
        .reduce(|acc, ids| acc.intersection(&ids).cloned().collect())
}

fn union(operands: Vec<IdSet>) -> Option<IdSet> {
    operands.into_iter().reduce(|mut acc, ids| {
        acc.extend(ids);
        acc
    })
}
