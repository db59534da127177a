//! Leaf syntax of the free-text index backend.

use super::{
    INDEX_PATTERN, date, field_name, is_date_property, is_numeric, required_bounds,
    required_literal, required_property, translate_pattern,
};
use model::{
    error::FilterError,
    filter::{Comparison, ComparisonOperator},
    query::MATCH_ALL,
};

/// Lower sentinel of an open numeric range.
pub const NUMERIC_LOWER_BOUND: i64 = i32::MIN as i64;

/// Upper sentinel of an open numeric range, as the index expects it.
pub const NUMERIC_UPPER_BOUND: i64 = 2_147_483_648;

/// Renders one comparison leaf into index query syntax.
pub fn render(comparison: &Comparison) -> Result<String, FilterError> {
    let property = required_property(comparison)?;
    let field = field_name(property);
    let is_date = is_date_property(property);

    let text = match &comparison.operator {
        ComparisonOperator::Equal => {
            format!("{field}:\"{}\"", quote(required_literal(comparison)?))
        }
        ComparisonOperator::NotEqual => {
            format!(
                "{MATCH_ALL} NOT {field}:\"{}\"",
                quote(required_literal(comparison)?)
            )
        }
        ComparisonOperator::Like(pattern) => {
            let literal = required_literal(comparison)?;
            let literal = if is_date {
                date::strip(literal)
            } else {
                literal.to_string()
            };
            format!("{field}:({})", translate_pattern(&literal, pattern, &INDEX_PATTERN))
        }
        ComparisonOperator::IsNull => format!("{field}:null"),
        ComparisonOperator::Between { lower, upper } => {
            let (lower, upper) = required_bounds(comparison, lower, upper)?;
            render_between(comparison, field, is_date, lower, upper)?
        }
        ComparisonOperator::GreaterThan => {
            render_range(comparison, field, is_date, Bound::Above { inclusive: false })?
        }
        ComparisonOperator::GreaterOrEqual => {
            render_range(comparison, field, is_date, Bound::Above { inclusive: true })?
        }
        ComparisonOperator::LessThan => {
            render_range(comparison, field, is_date, Bound::Below { inclusive: false })?
        }
        ComparisonOperator::LessOrEqual => {
            render_range(comparison, field, is_date, Bound::Below { inclusive: true })?
        }
    };

    Ok(text)
}

fn render_between(
    comparison: &Comparison,
    field: &str,
    is_date: bool,
    lower: &str,
    upper: &str,
) -> Result<String, FilterError> {
    if is_date {
        let lower = date::normalize(lower)?;
        let upper = date::normalize(upper)?;
        return Ok(format!(
            "{field}:[{lower} {}]{field}:[{} {upper}]",
            date::UPPER_DATE,
            date::LOWER_DATE
        ));
    }

    match (is_numeric(lower), is_numeric(upper)) {
        (true, true) => Ok(format!("{field}:[{} TO {}]", lower.trim(), upper.trim())),
        (true, false) => Err(FilterError::UnparsableNumber(upper.to_string())),
        (false, true) => Err(FilterError::UnparsableNumber(lower.to_string())),
        (false, false) => Err(FilterError::unsupported_comparison(
            comparison.operator.to_string(),
            field,
        )),
    }
}

/// Which side of a one-sided range the literal closes.
#[derive(Debug, Clone, Copy)]
enum Bound {
    Above { inclusive: bool },
    Below { inclusive: bool },
}

impl Bound {
    /// `field:[lower upper]` when inclusive, `field:{lower upper}` otherwise, with the
    /// literal on the bounded side and `open_end` on the other.
    fn enclose(self, field: &str, value: &str, open_end: (&str, &str), separator: &str) -> String {
        let (lower, upper) = match self {
            Bound::Above { .. } => (value, open_end.1),
            Bound::Below { .. } => (open_end.0, value),
        };
        match self {
            Bound::Above { inclusive: true } | Bound::Below { inclusive: true } => {
                format!("{field}:[{lower}{separator}{upper}]")
            }
            Bound::Above { inclusive: false } | Bound::Below { inclusive: false } => {
                format!("{field}:{{{lower}{separator}{upper}}}")
            }
        }
    }
}

fn render_range(
    comparison: &Comparison,
    field: &str,
    is_date: bool,
    bound: Bound,
) -> Result<String, FilterError> {
    let literal = required_literal(comparison)?;

    if is_date {
        let value = date::normalize(literal)?;
        let open_end = (date::LOWER_DATE, date::UPPER_DATE);
        return Ok(bound.enclose(field, &value, open_end, " "));
    }

    if !is_numeric(literal) {
        return Err(FilterError::unsupported_comparison(
            comparison.operator.to_string(),
            field,
        ));
    }

    let (lower, upper) = (NUMERIC_LOWER_BOUND.to_string(), NUMERIC_UPPER_BOUND.to_string());
    Ok(bound.enclose(field, literal.trim(), (&lower, &upper), " TO "))
}

/// Escapes what would end or break a quoted phrase.
fn quote(literal: &str) -> String {
    literal.replace('\\', "\\\\").replace('"', "\\\"")
}
