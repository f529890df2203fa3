//! Forecasting prompt assembly.
//!
//! A [`PromptBuilder`] renders a series through the textual codec, computes
//! a statistics block, optionally samples solved examples from the history,
//! and substitutes everything into one of the carried templates (or a
//! caller-supplied one).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use tempora_core::series::TimeSeries;
use tempora_types::{SampleMethod, TemporaError, TextFormat, ValueKind};

mod templates;

pub use templates::{COT, COT_FEW, FEW_SHOT, ZERO_SHOT};

/// The prompting strategies the assembler knows how to lay out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    /// Instructions and history only.
    ZeroShot,
    /// Adds solved examples sampled from the history.
    FewShot,
    /// Asks for explicit step-by-step reasoning.
    Cot,
    /// Step-by-step reasoning plus solved examples.
    CotFew,
    /// A caller-supplied template.
    Custom,
}

impl PromptKind {
    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZeroShot => "zero_shot",
            Self::FewShot => "few_shot",
            Self::Cot => "cot",
            Self::CotFew => "cot_few",
            Self::Custom => "custom",
        }
    }

    fn wants_examples(self) -> bool {
        matches!(self, Self::FewShot | Self::CotFew)
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptKind {
    type Err = TemporaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero_shot" => Ok(Self::ZeroShot),
            "few_shot" => Ok(Self::FewShot),
            "cot" => Ok(Self::Cot),
            "cot_few" => Ok(Self::CotFew),
            "custom" => Ok(Self::Custom),
            other => Err(TemporaError::invalid_arg(
                format!("Unknown prompt: {other}"),
                "zero_shot, few_shot, cot, cot_few, custom",
            )),
        }
    }
}

const STAT_DECIMALS: u32 = 4;

/// Builds a forecasting prompt from a series.
///
/// ```
/// use tempora::prompt::{PromptBuilder, PromptKind};
/// use tempora::{Datum, TimeSeries, UniSeries};
/// use chrono::NaiveDate;
///
/// let index: Vec<_> = (1..=8)
///     .map(|d| NaiveDate::from_ymd_opt(2021, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
///     .collect();
/// let values = (1..=8).map(|v| Datum::from(f64::from(v))).collect();
/// let ts = TimeSeries::from(UniSeries::new("sales", "date", index, values).unwrap());
///
/// let text = PromptBuilder::new(&ts, 2, PromptKind::ZeroShot).build().unwrap();
/// assert!(text.contains("Predict the next 2 values"));
/// ```
#[derive(Debug, Clone)]
pub struct PromptBuilder<'a> {
    ts: &'a TimeSeries,
    periods: usize,
    kind: PromptKind,
    format: TextFormat,
    value_kind: ValueKind,
    examples: usize,
    sampling: SampleMethod,
    template: Option<String>,
    extra: BTreeMap<String, String>,
}

impl<'a> PromptBuilder<'a> {
    /// Start a prompt for forecasting `periods` steps of `ts`.
    #[must_use]
    pub fn new(ts: &'a TimeSeries, periods: usize, kind: PromptKind) -> Self {
        Self {
            ts,
            periods,
            kind,
            format: TextFormat::Csv,
            value_kind: ValueKind::Numeric,
            examples: 0,
            sampling: SampleMethod::Backend,
            template: None,
            extra: BTreeMap::new(),
        }
    }

    /// Textual format for the history and examples (default `csv`).
    #[must_use]
    pub fn format(mut self, format: TextFormat) -> Self {
        self.format = format;
        self
    }

    /// Numeric or digit-spaced textual cells (default numeric).
    #[must_use]
    pub fn value_kind(mut self, kind: ValueKind) -> Self {
        self.value_kind = kind;
        self
    }

    /// Number of solved examples to sample (default 0).
    #[must_use]
    pub fn examples(mut self, examples: usize) -> Self {
        self.examples = examples;
        self
    }

    /// Window sampling policy for the examples (default `backend`).
    #[must_use]
    pub fn sampling(mut self, sampling: SampleMethod) -> Self {
        self.sampling = sampling;
        self
    }

    /// Template for [`PromptKind::Custom`].
    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Set or override a substitution variable.
    #[must_use]
    pub fn var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Assemble the prompt with the thread rng.
    ///
    /// # Errors
    /// Same contract as [`build_with_rng`](Self::build_with_rng).
    pub fn build(&self) -> Result<String, TemporaError> {
        self.build_with_rng(&mut rand::rng())
    }

    /// Assemble the prompt, drawing example windows from `rng` when the
    /// sampling policy is randomized.
    ///
    /// # Errors
    /// Returns `TemporaError::InvalidArg` for a custom kind without a
    /// template, zero examples on an example-bearing kind, a history too
    /// short for the requested examples, or an unresolved template key.
    pub fn build_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String, TemporaError> {
        if self.kind == PromptKind::Custom && self.template.is_none() {
            return Err(TemporaError::InvalidArg(
                "Template must be set for custom prompt.".into(),
            ));
        }
        if self.examples == 0 && self.kind.wants_examples() {
            return Err(TemporaError::InvalidArg(
                "Must contain at least 1 example.".into(),
            ));
        }
        let min_periods = self.periods * 2 * self.examples;
        if self.ts.len() < min_periods {
            return Err(TemporaError::InvalidArg(format!(
                "For {} examples there must be {min_periods} periods in the time series.",
                self.examples
            )));
        }

        let mut vars = BTreeMap::new();
        vars.insert("input_len".to_string(), self.ts.len().to_string());
        vars.insert(
            "input".to_string(),
            self.ts.to_str(self.format, self.value_kind)?,
        );
        vars.insert(
            "output_example".to_string(),
            self.ts
                .head(self.periods)
                .to_str(self.format, self.value_kind)?,
        );
        vars.insert("forecast_horizon".to_string(), self.periods.to_string());
        vars.insert("statistics".to_string(), statistics_block(self.ts));

        if !self.extra.contains_key("forecast_examples") {
            vars.insert(
                "forecast_examples".to_string(),
                self.forecast_examples(rng)?,
            );
        }
        vars.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));

        let template = match self.kind {
            PromptKind::ZeroShot => ZERO_SHOT,
            PromptKind::FewShot => FEW_SHOT,
            PromptKind::Cot => COT,
            PromptKind::CotFew => COT_FEW,
            PromptKind::Custom => self.template.as_deref().unwrap_or_default(),
        };
        substitute(template, &vars)
    }

    fn forecast_examples<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String, TemporaError> {
        let windows =
            self.ts
                .slide_with_rng(self.sampling, self.periods, self.examples, None, rng)?;
        let blocks: Vec<String> = windows
            .iter()
            .enumerate()
            .map(|(i, (input, output))| {
                Ok(format!(
                    "- Example {}:\nInput (history):\n{}\n\nOutput (forecast):\n<out>\n{}\n</out>",
                    i + 1,
                    input.to_str(self.format, self.value_kind)?,
                    output.to_str(self.format, self.value_kind)?,
                ))
            })
            .collect::<Result<_, TemporaError>>()?;
        Ok(blocks.join("\n\n"))
    }
}

fn fmt_stat(x: f64) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else if x.fract() == 0.0 && x.is_finite() && x.abs() < 1e16 {
        format!("{x:.1}")
    } else {
        x.to_string()
    }
}

fn stat_lines(mean: f64, median: f64, std: f64, min: f64, max: f64, q1: f64, q3: f64) -> String {
    format!(
        "- Mean: {}\n- Median: {}\n- Standard Deviation: {}\n- Minimum Value: {}\n- Maximum Value: {}\n- First Quartile (Q1): {}\n- Third Quartile (Q3): {}",
        fmt_stat(mean),
        fmt_stat(median),
        fmt_stat(std),
        fmt_stat(min),
        fmt_stat(max),
        fmt_stat(q1),
        fmt_stat(q3),
    )
}

fn statistics_block(ts: &TimeSeries) -> String {
    match ts {
        TimeSeries::Uni(s) => stat_lines(
            s.mean(STAT_DECIMALS),
            s.median(STAT_DECIMALS),
            s.std(STAT_DECIMALS),
            s.min(STAT_DECIMALS),
            s.max(STAT_DECIMALS),
            s.quantile(0.25, STAT_DECIMALS),
            s.quantile(0.75, STAT_DECIMALS),
        ),
        TimeSeries::Multi(s) => {
            let mean = s.mean(STAT_DECIMALS);
            let median = s.median(STAT_DECIMALS);
            let std = s.std(STAT_DECIMALS);
            let min = s.min(STAT_DECIMALS);
            let max = s.max(STAT_DECIMALS);
            let q1 = s.quantile(0.25, STAT_DECIMALS);
            let q3 = s.quantile(0.75, STAT_DECIMALS);
            let many = mean.len() > 1;
            let blocks: Vec<String> = (0..mean.len())
                .map(|i| {
                    let lines = stat_lines(
                        mean[i].1, median[i].1, std[i].1, min[i].1, max[i].1, q1[i].1, q3[i].1,
                    );
                    if many {
                        format!("Column: {}\n{lines}", mean[i].0)
                    } else {
                        lines
                    }
                })
                .collect();
            blocks.join("\n")
        }
    }
}

/// Replace `{key}` placeholders; `{{` and `}}` escape literal braces.
fn substitute(template: &str, vars: &BTreeMap<String, String>) -> Result<String, TemporaError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut key = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(k) => key.push(k),
                        None => {
                            return Err(TemporaError::parse(format!(
                                "unterminated placeholder '{{{key}'"
                            )));
                        }
                    }
                }
                let value = vars
                    .get(&key)
                    .ok_or_else(|| TemporaError::InvalidArg(format!("Key '{key}' not defined.")))?;
                out.push_str(value);
            }
            other => out.push(other),
        }
    }
    Ok(out)
}
