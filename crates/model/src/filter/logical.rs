use super::{comparison::Comparison, spatial::Spatial};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    And,
    Or,
    Not,
}

impl LogicalOperator {
    /// Upper-case keyword used when joining rendered operands.
    pub fn keyword(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
            LogicalOperator::Not => "NOT",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// A logical node. Children are grouped by kind, not by arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logical {
    pub operator: LogicalOperator,
    #[serde(default)]
    pub comparisons: Vec<Comparison>,
    #[serde(default)]
    pub spatials: Vec<Spatial>,
    #[serde(default)]
    pub logicals: Vec<Logical>,
}

/// The single operand of a `Not` node.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    Comparison(&'a Comparison),
    Spatial(&'a Spatial),
    Logical(&'a Logical),
}

impl Logical {
    pub fn new(operator: LogicalOperator) -> Self {
        Self {
            operator,
            comparisons: Vec::new(),
            spatials: Vec::new(),
            logicals: Vec::new(),
        }
    }

    pub fn and() -> Self {
        Self::new(LogicalOperator::And)
    }

    pub fn or() -> Self {
        Self::new(LogicalOperator::Or)
    }

    pub fn not_comparison(comparison: Comparison) -> Self {
        Self::new(LogicalOperator::Not).comparison(comparison)
    }

    pub fn not_spatial(spatial: Spatial) -> Self {
        Self::new(LogicalOperator::Not).spatial(spatial)
    }

    pub fn not_logical(logical: Logical) -> Self {
        Self::new(LogicalOperator::Not).logical(logical)
    }

    pub fn comparison(mut self, comparison: Comparison) -> Self {
        self.comparisons.push(comparison);
        self
    }

    pub fn spatial(mut self, spatial: Spatial) -> Self {
        self.spatials.push(spatial);
        self
    }

    pub fn logical(mut self, logical: Logical) -> Self {
        self.logicals.push(logical);
        self
    }

    pub fn child_count(&self) -> usize {
        self.comparisons.len() + self.spatials.len() + self.logicals.len()
    }

    /// The operand of a unary node, `None` unless exactly one child is present.
    pub fn single_operand(&self) -> Option<Operand<'_>> {
        if self.child_count() != 1 {
            return None;
        }

        self.comparisons
            .first()
            .map(Operand::Comparison)
            .or_else(|| self.spatials.first().map(Operand::Spatial))
            .or_else(|| self.logicals.first().map(Operand::Logical))
    }
}
