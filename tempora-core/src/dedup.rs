//! Duplicate-index resolution.
//!
//! Grouping is keyed by index value; group order follows the first occurrence
//! of each key, so resolving duplicates never reorders an already sorted
//! series.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::series::Datum;

/// Row indices per distinct index value, ordered by first occurrence.
pub(crate) fn duplicate_groups(index: &[NaiveDateTime]) -> Vec<(NaiveDateTime, Vec<usize>)> {
    let mut groups: Vec<(NaiveDateTime, Vec<usize>)> = Vec::new();
    let mut seen: HashMap<NaiveDateTime, usize> = HashMap::new();
    for (row, &ts) in index.iter().enumerate() {
        match seen.get(&ts) {
            Some(&slot) => groups[slot].1.push(row),
            None => {
                seen.insert(ts, groups.len());
                groups.push((ts, vec![row]));
            }
        }
    }
    groups
}

/// Keep exactly one row per duplicated index value.
///
/// `keep_first` selects the first occurrence, otherwise the last; all other
/// rows of a duplicate group are dropped.
pub(crate) fn keep_rows(index: &[NaiveDateTime], keep_first: bool) -> Vec<usize> {
    duplicate_groups(index)
        .into_iter()
        .map(|(_, rows)| {
            if keep_first {
                rows[0]
            } else {
                *rows.last().expect("group is never empty")
            }
        })
        .collect()
}

/// Aggregate one duplicate group of a single column by summation.
///
/// Numeric cells sum with missing values skipped; a group with no present
/// value stays missing. Textual cells concatenate in row order.
pub(crate) fn sum_group(values: &[Datum], rows: &[usize]) -> Datum {
    let has_text = rows.iter().any(|&r| matches!(values[r], Datum::Text(_)));
    if has_text {
        let joined: String = rows
            .iter()
            .filter_map(|&r| values[r].as_text())
            .collect::<Vec<_>>()
            .concat();
        Datum::Text(joined)
    } else {
        let present: Vec<f64> = rows.iter().filter_map(|&r| values[r].as_number()).collect();
        if present.is_empty() {
            return Datum::Missing;
        }
        let total: f64 = present.iter().sum();
        // adding positive zero strips the sign off a -0.0 total
        Datum::Number(total + 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn groups_preserve_first_occurrence_order() {
        let idx = [day(2), day(1), day(2), day(3)];
        let groups = duplicate_groups(&idx);
        assert_eq!(
            groups.iter().map(|(ts, _)| *ts).collect::<Vec<_>>(),
            vec![day(2), day(1), day(3)]
        );
        assert_eq!(groups[0].1, vec![0, 2]);
    }

    #[test]
    fn keep_last_picks_latest_row() {
        let idx = [day(1), day(1), day(2)];
        assert_eq!(keep_rows(&idx, false), vec![1, 2]);
        assert_eq!(keep_rows(&idx, true), vec![0, 2]);
    }

    #[test]
    fn sum_skips_missing() {
        let vals = [Datum::Number(1.0), Datum::Missing, Datum::Number(3.0)];
        assert_eq!(sum_group(&vals, &[0, 1, 2]), Datum::Number(4.0));
    }

    #[test]
    fn sum_of_an_all_missing_group_stays_missing() {
        let vals = [Datum::Missing, Datum::Number(f64::NAN), Datum::Number(1.0)];
        assert_eq!(sum_group(&vals, &[0, 1]), Datum::Missing);
    }

    #[test]
    fn sum_never_renders_a_signed_zero() {
        let vals = [Datum::Number(-0.0), Datum::Number(0.0)];
        let total = sum_group(&vals, &[0, 1]);
        assert_eq!(total.render(), "0.0");
        let total = sum_group(&vals, &[0]);
        assert_eq!(total.render(), "0.0");
    }
}
