//! Timestamp rendering and lenient column parsing.
//!
//! Rendering always uses the engine's canonical `%Y-%m-%d %H:%M:%S` form.
//! Parsing is column-wise with dd/mm vs mm/dd disambiguation: the month-first
//! shapes are tried across the whole column first, and only if some value
//! fails does the column fall back to day-first shapes.

use chrono::{NaiveDate, NaiveDateTime};
use tempora_types::TemporaError;

const MONTH_FIRST: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y",
    "%m-%d-%Y",
];

const DAY_FIRST: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y",
];

/// Canonical textual form of an index entry.
#[must_use]
pub fn render_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn parse_with(s: &str, formats: &[&str]) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parse a whole index column, disambiguating day-first notation.
///
/// # Errors
/// Returns `TemporaError::Parse` naming the first value that no candidate
/// shape accepts.
pub fn parse_timestamp_column<S: AsRef<str>>(raw: &[S]) -> Result<Vec<NaiveDateTime>, TemporaError> {
    let month_first: Vec<Option<NaiveDateTime>> =
        raw.iter().map(|s| parse_with(s.as_ref(), MONTH_FIRST)).collect();
    if month_first.iter().all(Option::is_some) {
        return Ok(month_first.into_iter().flatten().collect());
    }
    let day_first: Vec<Option<NaiveDateTime>> =
        raw.iter().map(|s| parse_with(s.as_ref(), DAY_FIRST)).collect();
    if day_first.iter().all(Option::is_some) {
        return Ok(day_first.into_iter().flatten().collect());
    }
    let bad = raw
        .iter()
        .zip(&month_first)
        .zip(&day_first)
        .find(|((_, m), d)| m.is_none() && d.is_none())
        .map_or_else(String::new, |((s, _), _)| s.as_ref().to_string());
    Err(TemporaError::parse(format!(
        "unparseable timestamp: '{bad}'"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_roundtrip() {
        let raw = ["2020-01-01 00:00:00", "2020-01-02 12:30:00"];
        let parsed = parse_timestamp_column(&raw).unwrap();
        assert_eq!(render_timestamp(parsed[0]), "2020-01-01 00:00:00");
        assert_eq!(render_timestamp(parsed[1]), "2020-01-02 12:30:00");
    }

    #[test]
    fn month_first_wins_when_every_value_fits() {
        // 03/04 is ambiguous; month-first reads April 3rd
        let parsed = parse_timestamp_column(&["03/04/2020", "05/06/2020"]).unwrap();
        assert_eq!(render_timestamp(parsed[0]), "2020-03-04 00:00:00");
    }

    #[test]
    fn falls_back_to_day_first_when_month_first_cannot_cover() {
        // 13/04 only parses day-first, which flips the whole column
        let parsed = parse_timestamp_column(&["13/04/2020", "05/06/2020"]).unwrap();
        assert_eq!(render_timestamp(parsed[0]), "2020-04-13 00:00:00");
        assert_eq!(render_timestamp(parsed[1]), "2020-06-05 00:00:00");
    }

    #[test]
    fn unparseable_value_is_named() {
        let err = parse_timestamp_column(&["2020-01-01", "yesterday"]).unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }
}
