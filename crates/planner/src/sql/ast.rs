//! Intermediate form of the EAV query, numbered and rendered once per SELECT.

use super::{SqlSchema, allocator::VariableAllocator, dialect::Dialect};
use crate::operators::sql::SqlComparator;

/// Constraint on the value column of one joined attribute row.
#[derive(Debug, Clone, PartialEq)]
pub enum ValuePredicate {
    Compare {
        comparator: SqlComparator,
        literal: String,
    },
    Between {
        lower: String,
        upper: String,
        negated: bool,
    },
    IsNull {
        negated: bool,
    },
}

impl ValuePredicate {
    pub fn negate(self) -> Self {
        match self {
            ValuePredicate::Compare {
                comparator,
                literal,
            } => ValuePredicate::Compare {
                comparator: comparator.inverted(),
                literal,
            },
            ValuePredicate::Between {
                lower,
                upper,
                negated,
            } => ValuePredicate::Between {
                lower,
                upper,
                negated: !negated,
            },
            ValuePredicate::IsNull { negated } => ValuePredicate::IsNull { negated: !negated },
        }
    }

    fn render(&self, alias: &str, dialect: &dyn Dialect) -> String {
        match self {
            ValuePredicate::Compare {
                comparator,
                literal,
            } => format!("{alias}.value {comparator} {}", dialect.quote_literal(literal)),
            ValuePredicate::Between {
                lower,
                upper,
                negated: false,
            } => format!(
                "{alias}.value >= {} AND {alias}.value <= {}",
                dialect.quote_literal(lower),
                dialect.quote_literal(upper)
            ),
            ValuePredicate::Between {
                lower,
                upper,
                negated: true,
            } => format!(
                "({alias}.value < {} OR {alias}.value > {})",
                dialect.quote_literal(lower),
                dialect.quote_literal(upper)
            ),
            ValuePredicate::IsNull { negated: false } => format!("{alias}.value IS NULL"),
            ValuePredicate::IsNull { negated: true } => format!("{alias}.value IS NOT NULL"),
        }
    }
}

/// One comparison leaf: a joined attribute row at `path` whose value satisfies
/// `predicate`.
#[derive(Debug, Clone, PartialEq)]
pub struct EavCondition {
    pub path: String,
    pub predicate: ValuePredicate,
}

impl EavCondition {
    fn render(&self, allocator: &mut VariableAllocator, ctx: &RenderContext<'_>) -> String {
        let alias = allocator.allocate();
        format!(
            "{alias}.path = {} AND {} AND {alias}.form={}",
            ctx.dialect.quote_literal(&self.path),
            self.predicate.render(&alias, ctx.dialect),
            ctx.dialect.quote_identifier(&ctx.schema.identifier_column)
        )
    }
}

/// Conjunction evaluated against one SELECT.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereClause {
    Condition(EavCondition),
    All(Vec<WhereClause>),
}

impl WhereClause {
    fn render(&self, allocator: &mut VariableAllocator, ctx: &RenderContext<'_>) -> String {
        match self {
            WhereClause::Condition(condition) => condition.render(allocator, ctx),
            WhereClause::All(clauses) => {
                let parts: Vec<String> = clauses.iter().map(|c| c.render(allocator, ctx)).collect();
                format!("({})", parts.join(" AND "))
            }
        }
    }
}

/// Text of one compiled level in the SQL backend.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlText {
    Empty,
    Where(WhereClause),
    /// Independent SELECTs joined by `UNION`.
    Union(Vec<WhereClause>),
}

pub(crate) struct RenderContext<'a> {
    pub schema: &'a SqlSchema,
    pub dialect: &'a dyn Dialect,
}

impl RenderContext<'_> {
    /// Wraps a WHERE clause in its SELECT, numbering aliases from `v1`.
    pub fn select(&self, clause: &WhereClause) -> String {
        let mut allocator = VariableAllocator::new();
        let fragment = clause.render(&mut allocator, self);

        let mut from = vec![self.dialect.quote_identifier(&self.schema.records_table)];
        let values_table = self.dialect.quote_identifier(&self.schema.values_table);
        from.extend(allocator.aliases().map(|alias| format!("{values_table} {alias}")));

        format!(
            "SELECT distinct {} FROM {} WHERE {fragment}",
            self.dialect.quote_identifier(&self.schema.identifier_column),
            from.join(", ")
        )
    }

    pub fn render(&self, text: &SqlText) -> String {
        match text {
            SqlText::Empty => String::new(),
            SqlText::Where(clause) => self.select(clause),
            SqlText::Union(branches) => branches
                .iter()
                .map(|branch| format!("({})", self.select(branch)))
                .collect::<Vec<_>>()
                .join(" UNION "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::dialect::Postgres;

    fn condition(path: &str, literal: &str) -> WhereClause {
        WhereClause::Condition(EavCondition {
            path: path.to_string(),
            predicate: ValuePredicate::Compare {
                comparator: SqlComparator::Equal,
                literal: literal.to_string(),
            },
        })
    }

    #[test]
    fn test_select_allocates_one_alias_per_condition() {
        let schema = SqlSchema::default();
        let ctx = RenderContext {
            schema: &schema,
            dialect: &Postgres,
        };

        let sql = ctx.select(&WhereClause::All(vec![condition("a", "1"), condition("b", "2")]));
        assert_eq!(
            sql,
            r#"SELECT distinct "identifier" FROM "Records", "TextValues" v1, "TextValues" v2 WHERE (v1.path = 'a' AND v1.value = '1' AND v1.form="identifier" AND v2.path = 'b' AND v2.value = '2' AND v2.form="identifier")"#
        );
    }

    #[test]
    fn test_negated_predicates() {
        let between = ValuePredicate::Between {
            lower: "2007".to_string(),
            upper: "2008".to_string(),
            negated: false,
        }
        .negate();

        assert_eq!(
            between.render("v1", &Postgres),
            "(v1.value < '2007' OR v1.value > '2008')"
        );
        assert_eq!(
            ValuePredicate::IsNull { negated: false }
                .negate()
                .render("v3", &Postgres),
            "v3.value IS NOT NULL"
        );
    }
}
