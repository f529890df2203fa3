use chrono::{NaiveDate, NaiveDateTime};
use tempora_core::Frequency;
use tempora_core::series::{Column, Datum, MultiSeries, TimeSeries, UniSeries};
use tempora_types::{AggMethod, TemporaError};

fn day(d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn dup_series() -> UniSeries {
    UniSeries::new(
        "v",
        "date",
        vec![day(1), day(1), day(2)],
        vec![1.0.into(), 3.0.into(), 5.0.into()],
    )
    .unwrap()
}

#[test]
fn sum_collapses_duplicate_timestamps() {
    let out = dup_series().agg_duplicates(AggMethod::Sum).unwrap();
    assert_eq!(out.index(), &[day(1), day(2)]);
    assert_eq!(out.values(), &[Datum::Number(4.0), Datum::Number(5.0)]);
}

#[test]
fn sum_leaves_an_all_missing_group_missing() {
    let s = UniSeries::new(
        "v",
        "date",
        vec![day(1), day(1), day(2)],
        vec![Datum::Missing, Datum::Missing, 5.0.into()],
    )
    .unwrap();
    let out = s.agg_duplicates(AggMethod::Sum).unwrap();
    assert_eq!(out.values(), &[Datum::Missing, Datum::Number(5.0)]);
}

#[test]
fn first_keeps_the_earliest_arrival() {
    let out = dup_series().agg_duplicates(AggMethod::First).unwrap();
    assert_eq!(out.values(), &[Datum::Number(1.0), Datum::Number(5.0)]);
}

#[test]
fn last_keeps_the_latest_arrival() {
    let out = dup_series().agg_duplicates(AggMethod::Last).unwrap();
    assert_eq!(out.values(), &[Datum::Number(3.0), Datum::Number(5.0)]);
}

#[test]
fn uni_rejects_multi_only_methods() {
    let err = dup_series().agg_duplicates(AggMethod::SumFirst).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid argument: Invalid method: sumf. Supported: first, last, sum."
    );
}

#[test]
fn agg_duplicates_mut_leaves_receiver_intact_on_error() {
    let mut s = dup_series();
    assert!(s.agg_duplicates_mut(AggMethod::SumLast).is_err());
    assert_eq!(s.len(), 3);
    s.agg_duplicates_mut(AggMethod::Sum).unwrap();
    assert_eq!(s.len(), 2);
}

#[test]
fn multi_sumf_adds_numbers_and_keeps_first_category() {
    let s = MultiSeries::new(
        "date",
        vec![day(1), day(1), day(2)],
        vec![
            Column {
                name: "qty".into(),
                values: vec![1.0.into(), 3.0.into(), 5.0.into()],
            },
            Column {
                name: "label".into(),
                values: vec![
                    Datum::Text("a".into()),
                    Datum::Text("b".into()),
                    Datum::Text("c".into()),
                ],
            },
        ],
    )
    .unwrap();
    let out = s.agg_duplicates(AggMethod::SumFirst).unwrap();
    assert_eq!(out.column("qty").unwrap().values[0], Datum::Number(4.0));
    assert_eq!(out.column("label").unwrap().values[0], Datum::Text("a".into()));

    let out = s.agg_duplicates(AggMethod::SumLast).unwrap();
    assert_eq!(out.column("label").unwrap().values[0], Datum::Text("b".into()));
}

#[test]
fn multi_rejects_uni_only_sum() {
    let s = MultiSeries::new(
        "date",
        vec![day(1)],
        vec![Column {
            name: "qty".into(),
            values: vec![1.0.into()],
        }],
    )
    .unwrap();
    let err = s.agg_duplicates(AggMethod::Sum).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid argument: Invalid method: sum. Supported: first, last, sumf, suml."
    );
}

#[test]
fn normalize_fills_the_missing_day() {
    let s = UniSeries::new(
        "v",
        "date",
        vec![day(1), day(2), day(4), day(5)],
        vec![1.0.into(), 2.0.into(), 4.0.into(), 5.0.into()],
    )
    .unwrap();
    let out = s.normalize(Some(Frequency::Daily), None, None).unwrap();
    assert_eq!(out.index(), &[day(1), day(2), day(3), day(4), day(5)]);
    assert_eq!(out.values()[2], Datum::Missing);
    assert_eq!(out.values()[3], Datum::Number(4.0));
    assert_eq!(out.freq(), Some(Frequency::Daily));
}

#[test]
fn normalize_prefers_the_inferred_cadence() {
    // Uniform daily cadence, so the weekly argument is ignored.
    let s = UniSeries::new(
        "v",
        "date",
        vec![day(1), day(2), day(3)],
        vec![1.0.into(), 2.0.into(), 3.0.into()],
    )
    .unwrap();
    assert_eq!(s.freq(), Some(Frequency::Daily));
    let out = s.normalize(Some(Frequency::Weekly), None, None).unwrap();
    assert_eq!(out.freq(), Some(Frequency::Daily));
    assert_eq!(out.len(), 3);
}

#[test]
fn normalize_without_any_cadence_fails() {
    // Irregular gaps defeat inference and no argument is given.
    let s = UniSeries::new(
        "v",
        "date",
        vec![day(1), day(2), day(10)],
        vec![1.0.into(), 2.0.into(), 3.0.into()],
    )
    .unwrap();
    assert_eq!(s.freq(), None);
    let err = s.normalize(None, None, None).unwrap_err();
    assert!(matches!(err, TemporaError::Inference(_)));
    assert_eq!(
        err.to_string(),
        "frequency inference failed: Error trying to infer frequency automatically."
    );
}

#[test]
fn normalize_with_explicit_bounds_extends_the_grid() {
    let s = UniSeries::new(
        "v",
        "date",
        vec![day(2), day(3)],
        vec![2.0.into(), 3.0.into()],
    )
    .unwrap();
    // Two points are too few to infer from, so the argument cadence is used.
    assert_eq!(s.freq(), None);
    let out = s
        .normalize(Some(Frequency::Daily), Some(day(1)), Some(day(5)))
        .unwrap();
    assert_eq!(out.len(), 5);
    assert_eq!(out.values()[0], Datum::Missing);
    assert_eq!(out.values()[4], Datum::Missing);
}

#[test]
fn split_takes_the_range_then_the_horizon() {
    let s = UniSeries::new(
        "v",
        "date",
        (1..=10).map(day).collect(),
        (1..=10).map(|v| Datum::from(f64::from(v))).collect(),
    )
    .unwrap();
    let (train, val) = s.split(day(2), day(6), 2);
    assert_eq!(train.index(), &[day(2), day(3), day(4), day(5), day(6)]);
    assert_eq!(val.index(), &[day(7), day(8)]);
}

#[test]
fn type_mismatch_names_both_variants() {
    let ts: TimeSeries = dup_series().into();
    let err = ts.as_multi().unwrap_err();
    assert_eq!(err.to_string(), "expected MultiSeries, got UniSeries");
}
