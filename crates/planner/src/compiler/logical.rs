use super::{FilterCompiler, Grouping, QueryBackend};
use model::{
    error::FilterError,
    filter::{Logical, LogicalOperator, Operand},
    query::{ChainFilter, SpatialFilter},
};
use tracing::debug;

impl<B: QueryBackend> FilterCompiler<B> {
    pub(crate) fn logical(&self, node: &Logical) -> Result<Grouping<B::Text>, FilterError> {
        match node.operator {
            LogicalOperator::Not => self.negation(node),
            operator => self.binary(operator, node),
        }
    }

    fn binary(
        &self,
        operator: LogicalOperator,
        node: &Logical,
    ) -> Result<Grouping<B::Text>, FilterError> {
        let mut operands = Vec::with_capacity(node.comparisons.len() + node.logicals.len());
        let mut filters = Vec::new();
        let mut sub_queries = Vec::new();

        for comparison in &node.comparisons {
            operands.push(self.backend.comparison(comparison)?);
        }

        for child in &node.logicals {
            let grouping = self.logical(child)?;
            if self.demote_under_binary(&grouping, operator) {
                debug!(
                    "Demoting {} group under {operator} to a subquery",
                    grouping.combinator
                );
                sub_queries.push(grouping);
                continue;
            }

            if !self.backend.is_trivial(&grouping.text) {
                operands.push(grouping.text);
            }
            if let Some(chain) = grouping.chain {
                filters.push(chain.into_filter());
            }
        }

        for spatial in &node.spatials {
            filters.push(SpatialFilter::Predicate(self.spatial.build(spatial)?));
        }

        let text = self.backend.group(operator, operands);
        Ok(self.level(operator, text, filters, sub_queries))
    }

    fn negation(&self, node: &Logical) -> Result<Grouping<B::Text>, FilterError> {
        let operand = node.single_operand().ok_or_else(|| {
            FilterError::malformed(
                "Not",
                format!("expected exactly one operand, found {}", node.child_count()),
            )
        })?;

        match operand {
            Operand::Comparison(comparison) => {
                if let Some(text) = self.backend.negated_comparison(comparison)? {
                    return Ok(Grouping::leaf(text));
                }
                Ok(Grouping {
                    combinator: LogicalOperator::Not,
                    ..Grouping::leaf(self.backend.comparison(comparison)?)
                })
            }
            Operand::Spatial(spatial) => {
                let filter = SpatialFilter::Predicate(self.spatial.build(spatial)?);
                Ok(self.level(
                    LogicalOperator::Not,
                    self.backend.empty_text(),
                    vec![filter],
                    Vec::new(),
                ))
            }
            Operand::Logical(child) => {
                let grouping = self.logical(child)?;
                if self.demote_under_not(&grouping) {
                    debug!("Demoting {} group under NOT to a subquery", grouping.combinator);
                    return Ok(self.level(
                        LogicalOperator::Not,
                        self.backend.empty_text(),
                        Vec::new(),
                        vec![grouping],
                    ));
                }

                let filters = grouping.chain.map(ChainFilter::into_filter).into_iter().collect();
                Ok(self.level(LogicalOperator::Not, grouping.text, filters, Vec::new()))
            }
        }
    }

    /// Assembles a level from its text and collected filters.
    ///
    /// A `Not` level whose negation lives entirely in the chain reports `And`, so the
    /// negation is not applied a second time.
    fn level(
        &self,
        operator: LogicalOperator,
        text: B::Text,
        filters: Vec<SpatialFilter>,
        sub_queries: Vec<Grouping<B::Text>>,
    ) -> Grouping<B::Text> {
        let chain = ChainFilter::from_filters(operator, filters);
        let combinator = if operator == LogicalOperator::Not
            && chain.is_some()
            && self.backend.is_trivial(&text)
        {
            LogicalOperator::And
        } else {
            operator
        };

        Grouping {
            text,
            chain,
            sub_queries,
            combinator,
        }
    }

    fn demote_under_binary(&self, child: &Grouping<B::Text>, parent: LogicalOperator) -> bool {
        let mixed = child.chain.is_some() && !self.backend.is_trivial(&child.text);
        let textual_negation = child.combinator == LogicalOperator::Not && child.chain.is_none();

        mixed
            || !child.sub_queries.is_empty()
            || textual_negation
            || self.backend.must_demote(&child.text, parent)
    }

    fn demote_under_not(&self, child: &Grouping<B::Text>) -> bool {
        let mixed_disjunction = child.combinator == LogicalOperator::Or
            && child.chain.is_some()
            && !self.backend.is_trivial(&child.text);

        mixed_disjunction
            || child.combinator == LogicalOperator::Not
            || !child.sub_queries.is_empty()
            || self.backend.must_demote(&child.text, LogicalOperator::Not)
    }
}
