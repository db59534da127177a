//! Backend-independent translation of a predicate tree into a [`CompositeQuery`].
//!
//! The compiler walks the tree once. Each logical node yields a [`Grouping`]: the
//! backend text of the node, the chain of geometry predicates collected at its level,
//! and the child groups that had to be demoted to subqueries because the flat backend
//! syntax cannot express them together with the rest of the level.

use crate::spatial::SpatialPredicateBuilder;
use model::{
    error::FilterError,
    filter::{Comparison, LogicalOperator, PredicateTree},
    query::{ChainFilter, CompositeQuery},
};
use std::{borrow::Cow, fmt::Debug};
use tracing::debug;

mod logical;

/// A query backend the compiler can target.
///
/// `Text` is the backend's own representation of a level's term constraint; it only
/// becomes a string in [`QueryBackend::render`], once the whole tree is translated.
pub trait QueryBackend {
    type Text: Clone + Debug;

    fn empty_text(&self) -> Self::Text;

    /// Whether the text leaves the result unconstrained.
    fn is_trivial(&self, text: &Self::Text) -> bool;

    /// Rewrites the tree before translation.
    fn prepare<'a>(&self, tree: &'a PredicateTree) -> Result<Cow<'a, PredicateTree>, FilterError> {
        Ok(Cow::Borrowed(tree))
    }

    fn comparison(&self, comparison: &Comparison) -> Result<Self::Text, FilterError>;

    /// Renders `NOT comparison` directly, or `None` to leave the negation to the
    /// level's combinator.
    fn negated_comparison(&self, _comparison: &Comparison) -> Result<Option<Self::Text>, FilterError> {
        Ok(None)
    }

    /// Joins the operand texts of one `And`/`Or` level.
    fn group(&self, operator: LogicalOperator, operands: Vec<Self::Text>) -> Self::Text;

    /// Whether a child's text cannot be inlined into a parent joined by `parent`.
    fn must_demote(&self, _child: &Self::Text, _parent: LogicalOperator) -> bool {
        false
    }

    /// Produces the final string of a level.
    fn render(&self, text: Self::Text) -> String;

    /// Term query standing for "no term constraint", if the backend needs one.
    fn match_all(&self) -> Option<&'static str> {
        None
    }
}

/// One translated level, before its text is rendered.
#[derive(Debug, Clone)]
pub struct Grouping<T> {
    pub text: T,
    pub chain: Option<ChainFilter>,
    pub sub_queries: Vec<Grouping<T>>,
    pub combinator: LogicalOperator,
}

impl<T> Grouping<T> {
    fn leaf(text: T) -> Self {
        Self {
            text,
            chain: None,
            sub_queries: Vec::new(),
            combinator: LogicalOperator::And,
        }
    }
}

/// Compiles predicate trees for one backend.
///
/// The compiler keeps no state between calls and can be shared across threads when
/// its backend can.
#[derive(Debug, Clone)]
pub struct FilterCompiler<B> {
    backend: B,
    spatial: SpatialPredicateBuilder,
}

impl<B: QueryBackend> FilterCompiler<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            spatial: SpatialPredicateBuilder::default(),
        }
    }

    pub fn with_spatial_builder(mut self, spatial: SpatialPredicateBuilder) -> Self {
        self.spatial = spatial;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn compile(&self, tree: &PredicateTree) -> Result<CompositeQuery, FilterError> {
        let tree = self.backend.prepare(tree)?;

        let grouping = match tree.as_ref() {
            PredicateTree::Comparison(comparison) => {
                Grouping::leaf(self.backend.comparison(comparison)?)
            }
            PredicateTree::Spatial(spatial) => {
                let predicate = self.spatial.build(spatial)?;
                Grouping {
                    chain: Some(ChainFilter::single(predicate)),
                    ..Grouping::leaf(self.backend.empty_text())
                }
            }
            PredicateTree::Logical(logical) => self.logical(logical)?,
            PredicateTree::Identifiers(ids) => {
                return Err(FilterError::UnsupportedFeature(format!(
                    "identifier filters ({} ids)",
                    ids.len()
                )));
            }
        };

        let mut query = self.finish(grouping);
        // A root constrained only by geometry still needs a term query to run.
        if query.text.is_empty()
            && query.predicate_chain.is_some()
            && let Some(all) = self.backend.match_all()
        {
            query.text = all.to_string();
        }
        debug!(
            "Compiled filter into {} level(s), root text '{}'",
            query.depth(),
            query.text
        );
        Ok(query)
    }

    fn finish(&self, grouping: Grouping<B::Text>) -> CompositeQuery {
        CompositeQuery {
            text: self.backend.render(grouping.text),
            predicate_chain: grouping.chain,
            sub_queries: grouping
                .sub_queries
                .into_iter()
                .map(|sub| self.finish(sub))
                .collect(),
            combinator: grouping.combinator,
        }
    }
}
