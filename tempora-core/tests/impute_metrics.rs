use chrono::{NaiveDate, NaiveDateTime};
use tempora_core::Metrics;
use tempora_core::series::{Datum, UniSeries};

fn day(d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 3, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn gappy() -> UniSeries {
    UniSeries::new(
        "v",
        "date",
        (1..=6).map(day).collect(),
        vec![
            Datum::Missing,
            2.0.into(),
            Datum::Missing,
            6.0.into(),
            Datum::Missing,
            10.0.into(),
        ],
    )
    .unwrap()
}

#[test]
fn mean_fill_uses_present_values_only() {
    let out = gappy().impute_mean(None);
    // mean of [2, 6, 10]
    assert_eq!(out.values()[0], Datum::Number(6.0));
    assert_eq!(out.values()[1], Datum::Number(2.0));
}

#[test]
fn mean_fill_can_round() {
    let s = UniSeries::new(
        "v",
        "date",
        (1..=3).map(day).collect(),
        vec![1.0.into(), 2.0.into(), Datum::Missing],
    )
    .unwrap();
    let out = s.impute_mean(Some(1));
    assert_eq!(out.values()[2], Datum::Number(1.5));
    let out = s.impute_mean(Some(0));
    // half-to-even
    assert_eq!(out.values()[2], Datum::Number(2.0));
}

#[test]
fn ffill_carries_forward_then_sweeps_the_head() {
    let out = gappy().impute_ffill();
    assert_eq!(out.values()[0], Datum::Number(2.0)); // head gap backfilled
    assert_eq!(out.values()[2], Datum::Number(2.0));
    assert_eq!(out.values()[4], Datum::Number(6.0));
}

#[test]
fn bfill_pulls_backward_then_sweeps_the_tail() {
    let s = UniSeries::new(
        "v",
        "date",
        (1..=4).map(day).collect(),
        vec![1.0.into(), Datum::Missing, 3.0.into(), Datum::Missing],
    )
    .unwrap();
    let out = s.impute_bfill();
    assert_eq!(out.values()[1], Datum::Number(3.0));
    assert_eq!(out.values()[3], Datum::Number(3.0)); // tail gap forward-filled
}

#[test]
fn linear_interpolation_bridges_interior_gaps() {
    let out = gappy().impute_interpolate("linear");
    assert_eq!(out.values()[2], Datum::Number(4.0));
    assert_eq!(out.values()[4], Datum::Number(8.0));
    // head gap has no left neighbor, swept by ffill/bfill
    assert_eq!(out.values()[0], Datum::Number(2.0));
}

#[test]
fn unknown_interpolation_falls_back_to_linear() {
    let by_name = gappy().impute_interpolate("spline");
    let linear = gappy().impute_interpolate("linear");
    assert_eq!(by_name.values(), linear.values());
}

#[test]
fn sma_fill_uses_the_trailing_window() {
    let s = UniSeries::new(
        "v",
        "date",
        (1..=5).map(day).collect(),
        vec![
            2.0.into(),
            4.0.into(),
            Datum::Missing,
            6.0.into(),
            Datum::Missing,
        ],
    )
    .unwrap();
    let out = s.impute_sma(2, 1, None);
    // trailing window [4.0, gap] over the original snapshot
    assert_eq!(out.values()[2], Datum::Number(4.0));
    // trailing window [6.0, gap]
    assert_eq!(out.values()[4], Datum::Number(6.0));
}

#[test]
fn ema_fill_decays_across_gaps() {
    let s = UniSeries::new(
        "v",
        "date",
        (1..=4).map(day).collect(),
        vec![2.0.into(), Datum::Missing, 4.0.into(), Datum::Missing],
    )
    .unwrap();
    // span 3 -> alpha 0.5, adjusted weights (0.25, 1) at index 2
    let out = s.impute_ema(3, true, None);
    assert_eq!(out.values()[1], Datum::Number(2.0));
    let fill = out.values()[3].as_number().unwrap();
    assert!((fill - 3.6).abs() < 1e-12, "got {fill}");
    // recursive form: (0.25*2 + 0.5*4) / 0.75
    let out = s.impute_ema(3, false, None);
    let fill = out.values()[3].as_number().unwrap();
    assert!((fill - 10.0 / 3.0).abs() < 1e-12, "got {fill}");
}

#[test]
fn stats_round_to_requested_decimals() {
    let s = UniSeries::new(
        "v",
        "date",
        (1..=3).map(day).collect(),
        vec![1.0.into(), 2.0.into(), 4.0.into()],
    )
    .unwrap();
    assert_eq!(s.mean(4), 2.3333);
    assert_eq!(s.median(4), 2.0);
    assert_eq!(s.min(4), 1.0);
    assert_eq!(s.max(4), 4.0);
    assert_eq!(s.quantile(0.25, 4), 1.5);
    // ddof = 1
    assert!((s.std(4) - 1.5275).abs() < 1e-9);
}

#[test]
fn metrics_match_the_documented_examples() {
    let m = Metrics::new(&[100.0, 110.0, 120.0], &[102.0, 108.0, 123.0]);
    assert_eq!(m.mae(2), 2.33);
    assert!((m.smape(2) - 2.1).abs() < 0.2);
    assert!(m.rmse(2) > m.mae(2));
}

#[test]
fn metrics_drop_non_finite_pairs() {
    let m = Metrics::new(&[1.0, f64::NAN, 3.0], &[1.0, 2.0, f64::NAN]);
    assert_eq!(m.len(), 1);
    assert_eq!(m.mae(2), 0.0);
}

#[test]
fn series_level_metrics_delegate() {
    let s = UniSeries::new(
        "v",
        "date",
        (1..=3).map(day).collect(),
        vec![100.0.into(), 110.0.into(), 120.0.into()],
    )
    .unwrap();
    assert_eq!(s.mae(&[102.0, 108.0, 123.0], 2), 2.33);
}
