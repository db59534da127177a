//! Relational EAV backend.
//!
//! Every comparison joins its own row of the values table. A conjunction stays in one
//! SELECT with one alias per leaf; a disjunction becomes a UNION of independent SELECTs,
//! each numbering its aliases from `v1` again.

use crate::{
    compiler::{FilterCompiler, QueryBackend},
    operators::{
        SQL_PATTERN, date, is_date_property, required_bounds, required_literal,
        required_property, sql::SqlComparator, translate_pattern,
    },
};
use ast::{EavCondition, RenderContext, ValuePredicate, WhereClause};
use dialect::{Dialect, DialectKind};
use model::{
    error::FilterError,
    filter::{Comparison, ComparisonOperator, LogicalOperator, PredicateTree},
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{debug, trace, warn};

pub mod allocator;
pub mod ast;
pub mod bindings;
pub mod dialect;
pub mod negation;

pub use ast::SqlText;
pub use bindings::{BindingError, NamespaceBindings, QualifiedName};

/// Table and column names of the EAV store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SqlSchema {
    pub records_table: String,
    pub values_table: String,
    pub identifier_column: String,
}

impl Default for SqlSchema {
    fn default() -> Self {
        Self {
            records_table: "Records".to_string(),
            values_table: "TextValues".to_string(),
            identifier_column: "identifier".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct SqlQueryRenderer {
    bindings: NamespaceBindings,
    schema: SqlSchema,
    dialect: Box<dyn Dialect>,
}

pub type SqlCompiler = FilterCompiler<SqlQueryRenderer>;

impl SqlCompiler {
    pub fn sql(bindings: NamespaceBindings) -> Self {
        FilterCompiler::new(SqlQueryRenderer::new(bindings))
    }
}

impl SqlQueryRenderer {
    pub fn new(bindings: NamespaceBindings) -> Self {
        Self {
            bindings,
            schema: SqlSchema::default(),
            dialect: DialectKind::default().dialect(),
        }
    }

    pub fn with_schema(mut self, schema: SqlSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_dialect(mut self, kind: DialectKind) -> Self {
        self.dialect = kind.dialect();
        debug!("Rendering EAV queries for {}", self.dialect.name());
        self
    }

    pub fn schema(&self) -> &SqlSchema {
        &self.schema
    }

    pub fn bindings(&self) -> &NamespaceBindings {
        &self.bindings
    }

    fn condition(&self, comparison: &Comparison) -> Result<EavCondition, FilterError> {
        let property = required_property(comparison)?;
        let operator = comparison.operator.to_string();
        let path = self
            .bindings
            .standard_path(property)
            .map_err(|err| FilterError::malformed(&operator, err.to_string()))?;
        let is_date = is_date_property(property);

        let predicate = match &comparison.operator {
            ComparisonOperator::IsNull => ValuePredicate::IsNull { negated: false },
            ComparisonOperator::Between { lower, upper } => {
                let (lower, upper) = required_bounds(comparison, lower, upper)?;
                if !is_date {
                    return Err(FilterError::unsupported_comparison(operator, property));
                }
                ValuePredicate::Between {
                    lower: date::canonical(lower)?,
                    upper: date::canonical(upper)?,
                    negated: false,
                }
            }
            ComparisonOperator::Like(pattern) => ValuePredicate::Compare {
                comparator: SqlComparator::Like,
                literal: translate_pattern(required_literal(comparison)?, pattern, &SQL_PATTERN),
            },
            op => {
                let comparator = SqlComparator::for_operator(op)
                    .ok_or_else(|| FilterError::unsupported_comparison(&operator, property))?;
                let literal = required_literal(comparison)?;
                let literal = if op.is_range() {
                    if !is_date {
                        return Err(FilterError::unsupported_comparison(operator, property));
                    }
                    date::canonical(literal)?
                } else {
                    literal.to_string()
                };
                ValuePredicate::Compare {
                    comparator,
                    literal,
                }
            }
        };

        Ok(EavCondition { path, predicate })
    }

    fn context(&self) -> RenderContext<'_> {
        RenderContext {
            schema: &self.schema,
            dialect: self.dialect.as_ref(),
        }
    }
}

impl QueryBackend for SqlQueryRenderer {
    type Text = SqlText;

    fn empty_text(&self) -> SqlText {
        SqlText::Empty
    }

    fn is_trivial(&self, text: &SqlText) -> bool {
        matches!(text, SqlText::Empty)
    }

    fn prepare<'a>(&self, tree: &'a PredicateTree) -> Result<Cow<'a, PredicateTree>, FilterError> {
        match tree {
            PredicateTree::Logical(logical) => Ok(Cow::Owned(PredicateTree::Logical(
                negation::push_down(logical)?,
            ))),
            _ => Ok(Cow::Borrowed(tree)),
        }
    }

    fn comparison(&self, comparison: &Comparison) -> Result<SqlText, FilterError> {
        let condition = self.condition(comparison)?;
        trace!("Resolved {} on '{}'", comparison.operator, condition.path);
        Ok(SqlText::Where(WhereClause::Condition(condition)))
    }

    fn negated_comparison(&self, comparison: &Comparison) -> Result<Option<SqlText>, FilterError> {
        let EavCondition { path, predicate } = self.condition(comparison)?;
        let condition = EavCondition {
            path,
            predicate: predicate.negate(),
        };
        Ok(Some(SqlText::Where(WhereClause::Condition(condition))))
    }

    fn group(&self, operator: LogicalOperator, operands: Vec<SqlText>) -> SqlText {
        match operator {
            LogicalOperator::Or => {
                let mut branches = Vec::with_capacity(operands.len());
                for operand in operands {
                    match operand {
                        SqlText::Empty => {}
                        SqlText::Where(clause) => branches.push(clause),
                        SqlText::Union(nested) => branches.extend(nested),
                    }
                }
                match branches.len() {
                    0 => SqlText::Empty,
                    1 => SqlText::Where(branches.remove(0)),
                    _ => SqlText::Union(branches),
                }
            }
            _ => conjunction(operands),
        }
    }

    /// A UNION cannot share the aliases of an enclosing SELECT.
    fn must_demote(&self, child: &SqlText, parent: LogicalOperator) -> bool {
        matches!(child, SqlText::Union(_)) && parent != LogicalOperator::Or
    }

    fn render(&self, text: SqlText) -> String {
        self.context().render(&text)
    }
}

/// Joins operands into one WHERE clause.
///
/// UNION operands never get here: `must_demote` turns them into subqueries first.
fn conjunction(operands: Vec<SqlText>) -> SqlText {
    let mut clauses = Vec::with_capacity(operands.len());
    for operand in operands {
        match operand {
            SqlText::Empty => {}
            SqlText::Where(clause) => clauses.push(clause),
            SqlText::Union(branches) => {
                warn!("Dropping a {}-branch UNION from a conjunction", branches.len());
            }
        }
    }

    match clauses.len() {
        0 => SqlText::Empty,
        1 => SqlText::Where(clauses.remove(0)),
        _ => SqlText::Where(WhereClause::All(clauses)),
    }
}
