use chrono::{NaiveDate, NaiveDateTime};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempora::prompt::{PromptBuilder, PromptKind};
use tempora::series::{Datum, TimeSeries, UniSeries};
use tempora::{SampleMethod, TextFormat, ValueKind};

fn day(d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 1, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn series(n: u32) -> TimeSeries {
    UniSeries::new(
        "sales",
        "date",
        (1..=n).map(day).collect(),
        (1..=n).map(|v| Datum::from(f64::from(v))).collect(),
    )
    .unwrap()
    .into()
}

#[test]
fn zero_shot_carries_history_and_statistics() {
    let ts = series(8);
    let text = PromptBuilder::new(&ts, 2, PromptKind::ZeroShot).build().unwrap();
    assert!(text.contains("Predict the next 2 values"));
    assert!(text.contains("(8 periods)"));
    assert!(text.contains("- Mean: 4.5"));
    assert!(text.contains("- Median: 4.5"));
    assert!(text.contains("2021-01-08 00:00:00,8.0"));
    // output example is the head of the series
    assert!(text.contains("<out>\ndate,sales\n2021-01-01 00:00:00,1.0\n2021-01-02 00:00:00,2.0\n</out>"));
}

#[test]
fn few_shot_embeds_sampled_examples() {
    let ts = series(12);
    let mut rng = StdRng::seed_from_u64(11);
    let text = PromptBuilder::new(&ts, 2, PromptKind::FewShot)
        .examples(2)
        .sampling(SampleMethod::Backend)
        .build_with_rng(&mut rng)
        .unwrap();
    assert!(text.contains("- Example 1:"));
    assert!(text.contains("- Example 2:"));
    assert!(text.contains("Input (history):"));
    assert!(text.contains("Output (forecast):"));
    // backend sampling ends at the series tail
    assert!(text.contains("2021-01-12 00:00:00,12.0\n</out>"));
}

#[test]
fn few_shot_requires_examples() {
    let ts = series(12);
    let err = PromptBuilder::new(&ts, 2, PromptKind::FewShot).build().unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid argument: Must contain at least 1 example."
    );
}

#[test]
fn short_history_is_rejected() {
    let ts = series(6);
    let err = PromptBuilder::new(&ts, 2, PromptKind::FewShot)
        .examples(2)
        .build()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid argument: For 2 examples there must be 8 periods in the time series."
    );
}

#[test]
fn custom_kind_needs_a_template() {
    let ts = series(6);
    let err = PromptBuilder::new(&ts, 2, PromptKind::Custom).build().unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid argument: Template must be set for custom prompt."
    );
}

#[test]
fn custom_template_substitutes_variables() {
    let ts = series(4);
    let text = PromptBuilder::new(&ts, 2, PromptKind::Custom)
        .template("forecast {forecast_horizon} of {input_len} for {city}")
        .var("city", "Recife")
        .build()
        .unwrap();
    assert_eq!(text, "forecast 2 of 4 for Recife");
}

#[test]
fn unresolved_template_key_is_named() {
    let ts = series(4);
    let err = PromptBuilder::new(&ts, 2, PromptKind::Custom)
        .template("{unknown_key}")
        .build()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid argument: Key 'unknown_key' not defined."
    );
}

#[test]
fn textual_value_kind_flows_into_the_rendering() {
    let ts = series(4);
    let text = PromptBuilder::new(&ts, 1, PromptKind::ZeroShot)
        .format(TextFormat::Csv)
        .value_kind(ValueKind::Textual)
        .build()
        .unwrap();
    assert!(text.contains("1 . 0"), "got: {text}");
}

#[test]
fn cot_kinds_use_their_templates() {
    let ts = series(8);
    let cot = PromptBuilder::new(&ts, 2, PromptKind::Cot).build().unwrap();
    assert!(cot.contains("step by step"));
    let cot_few = PromptBuilder::new(&ts, 2, PromptKind::CotFew)
        .examples(1)
        .build()
        .unwrap();
    assert!(cot_few.contains("Solved Examples"));
}

#[test]
fn prompt_kind_parses_from_name() {
    assert_eq!("cot_few".parse::<PromptKind>().unwrap(), PromptKind::CotFew);
    let err = "one_shot".parse::<PromptKind>().unwrap_err();
    assert!(err.to_string().contains("one_shot"));
}
