//! Grouping-key normalization shared by every reporting dimension.
//!
//! Categorical keys are trimmed; a blank or absent key maps to
//! [`UNKNOWN_KEY`] so its totals stay visible. Dimensions that compare
//! case-insensitively (gender) fold the result; any spelling of the sentinel
//! folds back to [`UNKNOWN_KEY`] itself. Week keys
//! are parsed as calendar dates and re-emitted as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

pub const UNKNOWN_KEY: &str = "Unknown";

const ISO_DATE: &str = "%Y-%m-%d";

pub fn categorical_key(raw: Option<&str>, fold_case: bool) -> String {
    let trimmed = raw.map(str::trim).filter(|s| !s.is_empty());
    let key = trimmed.unwrap_or(UNKNOWN_KEY);
    if !fold_case {
        return key.to_string();
    }
    let folded = key.to_lowercase();
    if folded == UNKNOWN_KEY.to_lowercase() {
        UNKNOWN_KEY.to_string()
    } else {
        folded
    }
}

pub fn gender_key(raw: Option<&str>) -> String {
    categorical_key(raw, true)
}

pub fn age_group_key(raw: Option<&str>) -> String {
    categorical_key(raw, false)
}

/// Normalized week key: the canonical label plus the parsed start date,
/// if the raw value could be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeekKey {
    pub label: String,
    pub start: Option<NaiveDate>,
}

pub fn week_key(raw: Option<&str>) -> WeekKey {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return WeekKey {
            label: UNKNOWN_KEY.to_string(),
            start: None,
        };
    }

    match parse_calendar_date(trimmed) {
        Some(date) => WeekKey {
            label: date.format(ISO_DATE).to_string(),
            start: Some(date),
        },
        None => {
            debug!(week_start = trimmed, "Unparseable week start, keeping raw key");
            WeekKey {
                label: trimmed.to_string(),
                start: None,
            }
        }
    }
}

const NAIVE_TIMESTAMPS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const OFFSET_TIMESTAMPS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Accepts `YYYY-MM-DD`, RFC 3339, ISO 8601 timestamps with minute or
/// second precision (`T` or space separated, with or without an offset),
/// and finally any value whose first ten characters form a valid date.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, ISO_DATE) {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    let naive = NAIVE_TIMESTAMPS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ts| ts.date());
    if naive.is_some() {
        return naive;
    }
    let offset = OFFSET_TIMESTAMPS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
        .map(|ts| ts.date_naive());
    if offset.is_some() {
        return offset;
    }
    date_prefix(raw)
}

/// `YYYY-MM-DD` followed by a `T` or space time part.
fn date_prefix(raw: &str) -> Option<NaiveDate> {
    let prefix = raw.get(..10)?;
    let rest = &raw[10..];
    if !(rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(prefix, ISO_DATE).ok()
}
