//! Per-backend operator tables and the property/literal helpers they share.

use model::{
    error::FilterError,
    filter::{Comparison, LikePattern},
};

pub mod date;
pub mod index;
pub mod sql;

/// Pattern syntax of the free-text index.
pub const INDEX_PATTERN: LikePattern = LikePattern {
    wildcard: '*',
    single: '?',
    escape: '\\',
};

/// Pattern syntax of SQL `LIKE`.
pub const SQL_PATTERN: LikePattern = LikePattern {
    wildcard: '%',
    single: '_',
    escape: '\\',
};

pub(crate) fn required_property(comparison: &Comparison) -> Result<&str, FilterError> {
    comparison
        .property
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| FilterError::malformed(comparison.operator.to_string(), "missing propertyName"))
}

pub(crate) fn required_literal(comparison: &Comparison) -> Result<&str, FilterError> {
    comparison
        .literal
        .as_deref()
        .ok_or_else(|| FilterError::malformed(comparison.operator.to_string(), "missing literal"))
}

pub(crate) fn required_bounds<'a>(
    comparison: &Comparison,
    lower: &'a Option<String>,
    upper: &'a Option<String>,
) -> Result<(&'a str, &'a str), FilterError> {
    let operator = comparison.operator.to_string();
    match (lower.as_deref(), upper.as_deref()) {
        (Some(l), Some(u)) => Ok((l, u)),
        (None, Some(_)) => Err(FilterError::malformed(operator, "missing lower boundary")),
        (Some(_), None) => Err(FilterError::malformed(operator, "missing upper boundary")),
        (None, None) => Err(FilterError::malformed(operator, "missing lower and upper boundaries")),
    }
}

/// Property name without its namespace prefix (`apiso:Title` -> `Title`).
pub fn field_name(property: &str) -> &str {
    property.rsplit(':').next().unwrap_or(property)
}

/// Last path step of a property, without prefix or attribute marker.
pub fn local_name(property: &str) -> &str {
    property
        .rsplit(['/', '@', ':'])
        .find(|s| !s.is_empty())
        .unwrap_or(property)
}

/// Whether the property holds dates, judged from its name alone.
pub fn is_date_property(property: &str) -> bool {
    let name = local_name(property);
    name.contains("Date")
        || name.contains("Modified")
        || name.contains("date")
        || name.eq_ignore_ascii_case("TempExtent_begin")
        || name.eq_ignore_ascii_case("TempExtent_end")
}

/// Rewrites a like pattern from the request's conventions into a backend's.
///
/// Escaped characters stay literal; characters that happen to be meta characters of
/// the target syntax get escaped.
pub fn translate_pattern(literal: &str, source: &LikePattern, target: &LikePattern) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars();

    while let Some(c) = chars.next() {
        if c == source.escape
            && let Some(next) = chars.next()
        {
            out.push(target.escape);
            out.push(next);
        } else if c == source.escape {
            // A trailing escape stands for itself.
            escape_literal(&mut out, c, target);
        } else if c == source.wildcard {
            out.push(target.wildcard);
        } else if c == source.single {
            out.push(target.single);
        } else {
            escape_literal(&mut out, c, target);
        }
    }

    out
}

fn escape_literal(out: &mut String, c: char, target: &LikePattern) {
    if c == target.wildcard || c == target.single || c == target.escape {
        out.push(target.escape);
    }
    out.push(c);
}

pub(crate) fn is_numeric(literal: &str) -> bool {
    let literal = literal.trim();
    literal.parse::<i64>().is_ok() || literal.parse::<f64>().is_ok_and(f64::is_finite)
}
