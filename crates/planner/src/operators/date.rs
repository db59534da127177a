//! Date literal handling for date-valued properties.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use model::error::FilterError;
use std::collections::HashMap;

/// Open upper end of an index date range.
pub const UPPER_DATE: &str = "30000101";

/// Open lower end of an index date range.
pub const LOWER_DATE: &str = "00000101";

lazy_static! {
    /// Offsets (seconds east of UTC) of abbreviations the tz database doesn't know as
    /// zone names.
    static ref ABBREVIATIONS: HashMap<&'static str, i32> = HashMap::from([
        ("UTC", 0),
        ("GMT", 0),
        ("WEST", 3_600),
        ("BST", 3_600),
        ("CEST", 7_200),
        ("EEST", 10_800),
        ("MSK", 10_800),
        ("IST", 19_800),
        ("JST", 32_400),
        ("AEST", 36_000),
        ("NZST", 43_200),
        ("EDT", -14_400),
        ("CDT", -18_000),
        ("CST", -21_600),
        ("MDT", -21_600),
        ("PDT", -25_200),
        ("PST", -28_800),
        ("AKST", -32_400),
    ]);
}

/// Index form of a date literal: `-` and a trailing `Z` removed.
///
/// A literal carrying a named timezone (`2007-06-02 12:00:00 CEST`) is first
/// converted to UTC.
pub fn normalize(literal: &str) -> Result<String, FilterError> {
    Ok(strip(&canonical(literal)?))
}

/// Validated ISO form of a date literal, converted to UTC when it names a timezone.
pub fn canonical(literal: &str) -> Result<String, FilterError> {
    let literal = literal.trim();

    if let Some((local, abbreviation)) = split_abbreviation(literal) {
        let naive = parse_naive(local).ok_or_else(|| FilterError::UnparsableDate(literal.to_string()))?;
        let utc = to_utc(naive, abbreviation)
            .ok_or_else(|| FilterError::UnparsableDate(literal.to_string()))?;
        return Ok(utc.format("%Y-%m-%dT%H:%M:%SZ").to_string());
    }

    if is_valid(literal) {
        Ok(literal.to_string())
    } else {
        Err(FilterError::UnparsableDate(literal.to_string()))
    }
}

/// Removes every `-` and one trailing `Z`.
pub fn strip(literal: &str) -> String {
    let stripped = literal.replace('-', "");
    match stripped.strip_suffix(['Z', 'z']) {
        Some(s) => s.to_string(),
        None => stripped,
    }
}

fn split_abbreviation(literal: &str) -> Option<(&str, &str)> {
    let (local, last) = literal.rsplit_once(' ')?;
    let is_abbreviation = (2..=5).contains(&last.len())
        && last.chars().all(|c| c.is_ascii_uppercase());
    is_abbreviation.then(|| (local.trim(), last))
}

fn to_utc(naive: NaiveDateTime, abbreviation: &str) -> Option<DateTime<Utc>> {
    if let Some(seconds) = ABBREVIATIONS.get(abbreviation) {
        let offset = FixedOffset::east_opt(*seconds)?;
        return offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc));
    }

    let tz: Tz = abbreviation.parse().ok()?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_naive(local: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(local, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(local, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn is_valid(literal: &str) -> bool {
    if DateTime::parse_from_rfc3339(literal).is_ok() {
        return true;
    }

    let bare = literal.strip_suffix(['Z', 'z']).unwrap_or(literal);
    if parse_naive(bare).is_some() || NaiveDate::parse_from_str(bare, "%Y%m%d").is_ok() {
        return true;
    }

    // A bare year, as used by temporal extents.
    bare.len() == 4 && bare.chars().all(|c| c.is_ascii_digit())
}
