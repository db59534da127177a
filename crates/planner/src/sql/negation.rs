//! De Morgan push-down of `Not` for the EAV backend.
//!
//! After rewriting, every `Not` node has exactly one comparison or spatial operand, so
//! the renderer only ever negates single rows.

use model::{
    error::FilterError,
    filter::{Logical, LogicalOperator, Operand},
};

pub fn push_down(node: &Logical) -> Result<Logical, FilterError> {
    rewrite(node, false)
}

fn rewrite(node: &Logical, negated: bool) -> Result<Logical, FilterError> {
    let operator = match (node.operator, negated) {
        (LogicalOperator::Not, _) => return rewrite_not(node, negated),
        (LogicalOperator::And, true) => LogicalOperator::Or,
        (LogicalOperator::Or, true) => LogicalOperator::And,
        (operator, false) => operator,
    };

    let mut out = Logical::new(operator);
    for comparison in &node.comparisons {
        out = if negated {
            out.logical(Logical::not_comparison(comparison.clone()))
        } else {
            out.comparison(comparison.clone())
        };
    }
    for spatial in &node.spatials {
        out = if negated {
            out.logical(Logical::not_spatial(spatial.clone()))
        } else {
            out.spatial(spatial.clone())
        };
    }
    for child in &node.logicals {
        out = out.logical(rewrite(child, negated)?);
    }
    Ok(out)
}

fn rewrite_not(node: &Logical, negated: bool) -> Result<Logical, FilterError> {
    let operand = node.single_operand().ok_or_else(|| {
        FilterError::malformed(
            "Not",
            format!("expected exactly one operand, found {}", node.child_count()),
        )
    })?;

    // The operand is negated unless this Not cancels an outer one.
    let negate_operand = !negated;
    let wrapper = if negate_operand {
        LogicalOperator::Not
    } else {
        LogicalOperator::And
    };

    Ok(match operand {
        Operand::Comparison(comparison) => Logical::new(wrapper).comparison(comparison.clone()),
        Operand::Spatial(spatial) => Logical::new(wrapper).spatial(spatial.clone()),
        Operand::Logical(child) => rewrite(child, negate_operand)?,
    })
}
