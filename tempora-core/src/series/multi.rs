use chrono::NaiveDateTime;
use rand::Rng;
use tempora_types::{AggMethod, SampleMethod, TemporaError};

use crate::frequency::{Frequency, date_range};
use crate::series::Datum;
use crate::{dedup, impute, normalize, sample, stats};

const MULTI_AGG: &str = "first, last, sumf, suml";

/// One named value column of a [`MultiSeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Column cells, parallel to the series index.
    pub values: Vec<Datum>,
}

impl Column {
    /// True when no cell is textual.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        !self.values.iter().any(|v| matches!(v, Datum::Text(_)))
    }

    /// Cells as floats, missing and textual cells becoming NaN.
    #[must_use]
    pub fn values_f64(&self) -> Vec<f64> {
        self.values
            .iter()
            .map(|v| v.as_number().unwrap_or(f64::NAN))
            .collect()
    }
}

/// Several named value columns sharing one timestamp index.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSeries {
    index_name: String,
    index: Vec<NaiveDateTime>,
    columns: Vec<Column>,
    freq: Option<Frequency>,
}

impl MultiSeries {
    /// Build a series from an index and a set of columns.
    ///
    /// # Errors
    /// Returns `TemporaError::Data` when no columns are given or any column
    /// disagrees with the index in length.
    pub fn new(
        index_name: impl Into<String>,
        index: Vec<NaiveDateTime>,
        columns: Vec<Column>,
    ) -> Result<Self, TemporaError> {
        if columns.is_empty() {
            return Err(TemporaError::Data("a multi series needs at least one column".into()));
        }
        for col in &columns {
            if col.values.len() != index.len() {
                return Err(TemporaError::Data(format!(
                    "column '{}' has {} entries but the index has {}",
                    col.name,
                    col.values.len(),
                    index.len()
                )));
            }
        }
        let freq = Frequency::infer(&index);
        Ok(Self {
            index_name: index_name.into(),
            index,
            columns,
            freq,
        })
    }

    /// Index (timestamp column) name.
    #[must_use]
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// The timestamp index.
    #[must_use]
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// All value columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Inferred or assigned cadence, if any.
    #[must_use]
    pub fn freq(&self) -> Option<Frequency> {
        self.freq
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when the series holds no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of the numeric columns, in declaration order.
    #[must_use]
    pub fn num_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Names of the categorical (textual) columns, in declaration order.
    #[must_use]
    pub fn cat_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| !c.is_numeric())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// An independent copy of rows `lo..hi` (clipped to the series length).
    #[must_use]
    pub fn slice(&self, lo: usize, hi: usize) -> Self {
        let hi = hi.min(self.len());
        let lo = lo.min(hi);
        Self {
            index_name: self.index_name.clone(),
            index: self.index[lo..hi].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: c.values[lo..hi].to_vec(),
                })
                .collect(),
            freq: self.freq,
        }
    }

    /// The first `n` observations.
    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        self.slice(0, n)
    }

    /// Sort observations by timestamp (stable).
    pub fn sort_by_index(&mut self) {
        if self.index.windows(2).all(|w| w[0] <= w[1]) {
            return;
        }
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by_key(|&i| self.index[i]);
        self.index = order.iter().map(|&i| self.index[i]).collect();
        for col in &mut self.columns {
            col.values = order.iter().map(|&i| col.values[i].clone()).collect();
        }
    }

    pub(crate) fn with_columns(&self, columns: Vec<Column>) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == self.len()));
        Self {
            index_name: self.index_name.clone(),
            index: self.index.clone(),
            columns,
            freq: self.freq,
        }
    }

    fn take_rows(&self, rows: &[usize]) -> Self {
        Self {
            index_name: self.index_name.clone(),
            index: rows.iter().map(|&r| self.index[r]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: rows.iter().map(|&r| c.values[r].clone()).collect(),
                })
                .collect(),
            freq: self.freq,
        }
    }

    /// Resolve repeated index entries.
    ///
    /// Supported methods: `first`, `last`, `sumf`, and `suml`. The summing
    /// variants add up numeric columns per group while categorical columns
    /// keep their first (`sumf`) or last (`suml`) present value.
    ///
    /// # Errors
    /// Returns `TemporaError::InvalidArg` for a method outside the supported
    /// set.
    pub fn agg_duplicates(&self, method: AggMethod) -> Result<Self, TemporaError> {
        match method {
            AggMethod::First => Ok(self.take_rows(&dedup::keep_rows(&self.index, true))),
            AggMethod::Last => Ok(self.take_rows(&dedup::keep_rows(&self.index, false))),
            AggMethod::SumFirst => Ok(self.sum_groups(true)),
            AggMethod::SumLast => Ok(self.sum_groups(false)),
            other => Err(TemporaError::invalid_arg(
                format!("Invalid method: {other}"),
                MULTI_AGG,
            )),
        }
    }

    /// In-place variant of [`agg_duplicates`](Self::agg_duplicates).
    ///
    /// # Errors
    /// Same contract as the pure variant; the receiver is untouched on error.
    pub fn agg_duplicates_mut(&mut self, method: AggMethod) -> Result<(), TemporaError> {
        *self = self.agg_duplicates(method)?;
        Ok(())
    }

    fn sum_groups(&self, cat_first: bool) -> Self {
        let groups = dedup::duplicate_groups(&self.index);
        let index: Vec<NaiveDateTime> = groups.iter().map(|(ts, _)| *ts).collect();
        let columns = self
            .columns
            .iter()
            .map(|col| {
                let numeric = col.is_numeric();
                let values = groups
                    .iter()
                    .map(|(_, rows)| {
                        if numeric {
                            dedup::sum_group(&col.values, rows)
                        } else {
                            pick_present(&col.values, rows, cat_first)
                        }
                    })
                    .collect();
                Column {
                    name: col.name.clone(),
                    values,
                }
            })
            .collect();
        Self {
            index_name: self.index_name.clone(),
            index,
            columns,
            freq: self.freq,
        }
    }

    /// Reindex onto a complete grid at a fixed cadence, gaps becoming
    /// explicit missing values in every column. The series' own inferred
    /// frequency takes precedence over the argument.
    ///
    /// # Errors
    /// Returns `TemporaError::Inference` when no frequency is available, and
    /// `TemporaError::Data` for an empty series with no explicit bounds.
    pub fn normalize(
        &self,
        freq: Option<Frequency>,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Self, TemporaError> {
        let freq = self.freq.or(freq).ok_or_else(|| {
            TemporaError::Inference("Error trying to infer frequency automatically.".into())
        })?;
        let start_date = start
            .or_else(|| self.index.iter().min().copied())
            .ok_or_else(|| TemporaError::Data("cannot normalize an empty series".into()))?;
        let end_date = end
            .or_else(|| self.index.iter().max().copied())
            .ok_or_else(|| TemporaError::Data("cannot normalize an empty series".into()))?;

        let grid = date_range(start_date, end_date, freq);
        let positions = normalize::reindex_positions(&self.index, &grid);
        let columns = self
            .columns
            .iter()
            .map(|col| Column {
                name: col.name.clone(),
                values: positions
                    .iter()
                    .map(|pos| pos.map_or(Datum::Missing, |r| col.values[r].clone()))
                    .collect(),
            })
            .collect();
        Ok(Self {
            index_name: self.index_name.clone(),
            index: grid,
            columns,
            freq: Some(freq),
        })
    }

    /// Split into (train, validation): observations within `start..=end`,
    /// then the first `periods` observations after `end`.
    #[must_use]
    pub fn split(&self, start: NaiveDateTime, end: NaiveDateTime, periods: usize) -> (Self, Self) {
        let train_rows: Vec<usize> = (0..self.len())
            .filter(|&i| self.index[i] >= start && self.index[i] <= end)
            .collect();
        let val_rows: Vec<usize> = (0..self.len())
            .filter(|&i| self.index[i] > end)
            .take(periods)
            .collect();
        (self.take_rows(&train_rows), self.take_rows(&val_rows))
    }

    /// Windowed sampling with the thread rng; see
    /// [`slide_with_rng`](Self::slide_with_rng).
    ///
    /// # Errors
    /// Same contract as `slide_with_rng`.
    pub fn slide(
        &self,
        method: SampleMethod,
        window: usize,
        samples: usize,
        step: Option<usize>,
    ) -> Result<Vec<(Self, Self)>, TemporaError> {
        self.slide_with_rng(method, window, samples, step, &mut rand::rng())
    }

    /// Generate ordered (input, output) window pairs over all columns at
    /// once.
    ///
    /// # Errors
    /// Returns `TemporaError::InvalidArg` for a zero `uniform` step.
    pub fn slide_with_rng<R: Rng + ?Sized>(
        &self,
        method: SampleMethod,
        window: usize,
        samples: usize,
        step: Option<usize>,
        rng: &mut R,
    ) -> Result<Vec<(Self, Self)>, TemporaError> {
        let idxs = sample::start_indices(method, self.len(), window, samples, step, rng)?;
        let mut out = Vec::new();
        for idx in idxs {
            if idx < 0 {
                continue;
            }
            let start = idx as usize;
            let end_out = start + 2 * window;
            if end_out > self.len() {
                break;
            }
            out.push((
                self.slice(start, start + window),
                self.slice(start + window, end_out),
            ));
        }
        Ok(out)
    }

    // ---- descriptive statistics -------------------------------------------

    fn per_numeric_column(&self, decimals: u32, f: impl Fn(&[f64]) -> f64) -> Vec<(String, f64)> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| {
                let sample = stats::numeric_values(&c.values);
                (c.name.clone(), stats::round_to(f(&sample), decimals))
            })
            .collect()
    }

    /// Per-column mean over the numeric columns.
    #[must_use]
    pub fn mean(&self, decimals: u32) -> Vec<(String, f64)> {
        self.per_numeric_column(decimals, stats::mean)
    }

    /// Per-column median over the numeric columns.
    #[must_use]
    pub fn median(&self, decimals: u32) -> Vec<(String, f64)> {
        self.per_numeric_column(decimals, stats::median)
    }

    /// Per-column sample standard deviation over the numeric columns.
    #[must_use]
    pub fn std(&self, decimals: u32) -> Vec<(String, f64)> {
        self.per_numeric_column(decimals, stats::std)
    }

    /// Per-column minimum over the numeric columns.
    #[must_use]
    pub fn min(&self, decimals: u32) -> Vec<(String, f64)> {
        self.per_numeric_column(decimals, stats::min)
    }

    /// Per-column maximum over the numeric columns.
    #[must_use]
    pub fn max(&self, decimals: u32) -> Vec<(String, f64)> {
        self.per_numeric_column(decimals, stats::max)
    }

    /// Per-column quantile over the numeric columns.
    #[must_use]
    pub fn quantile(&self, q: f64, decimals: u32) -> Vec<(String, f64)> {
        self.per_numeric_column(decimals, |xs| stats::quantile(xs, q))
    }

    // ---- imputation --------------------------------------------------------

    fn map_numeric_columns(&mut self, f: impl Fn(&mut Vec<Datum>)) {
        for col in &mut self.columns {
            if col.is_numeric() {
                f(&mut col.values);
            }
        }
    }

    /// Fill missing numeric cells with the per-column mean.
    #[must_use]
    pub fn impute_mean(&self, decimals: Option<u32>) -> Self {
        let mut out = self.clone();
        out.impute_mean_mut(decimals);
        out
    }

    /// In-place variant of [`impute_mean`](Self::impute_mean).
    pub fn impute_mean_mut(&mut self, decimals: Option<u32>) {
        self.map_numeric_columns(|values| {
            let sample = stats::numeric_values(values);
            if !sample.is_empty() {
                let fill = Datum::Number(stats::round_opt(stats::mean(&sample), decimals));
                impute::fill_constant(values, &fill);
            }
        });
    }

    /// Fill missing numeric cells with the per-column median.
    #[must_use]
    pub fn impute_median(&self, decimals: Option<u32>) -> Self {
        let mut out = self.clone();
        out.impute_median_mut(decimals);
        out
    }

    /// In-place variant of [`impute_median`](Self::impute_median).
    pub fn impute_median_mut(&mut self, decimals: Option<u32>) {
        self.map_numeric_columns(|values| {
            let sample = stats::numeric_values(values);
            if !sample.is_empty() {
                let fill = Datum::Number(stats::round_opt(stats::median(&sample), decimals));
                impute::fill_constant(values, &fill);
            }
        });
    }

    /// Forward fill every column, then backward fill head gaps.
    #[must_use]
    pub fn impute_ffill(&self) -> Self {
        let mut out = self.clone();
        out.impute_ffill_mut();
        out
    }

    /// In-place variant of [`impute_ffill`](Self::impute_ffill).
    pub fn impute_ffill_mut(&mut self) {
        for col in &mut self.columns {
            impute::ffill_bfill(&mut col.values);
        }
    }

    /// Backward fill every column, then forward fill tail gaps.
    #[must_use]
    pub fn impute_bfill(&self) -> Self {
        let mut out = self.clone();
        out.impute_bfill_mut();
        out
    }

    /// In-place variant of [`impute_bfill`](Self::impute_bfill).
    pub fn impute_bfill_mut(&mut self) {
        for col in &mut self.columns {
            impute::bfill_ffill(&mut col.values);
        }
    }

    /// Trailing moving-average fill over the numeric columns, then sweep.
    #[must_use]
    pub fn impute_sma(&self, window: usize, min_periods: usize, decimals: Option<u32>) -> Self {
        let mut out = self.clone();
        out.impute_sma_mut(window, min_periods, decimals);
        out
    }

    /// In-place variant of [`impute_sma`](Self::impute_sma).
    pub fn impute_sma_mut(&mut self, window: usize, min_periods: usize, decimals: Option<u32>) {
        self.map_numeric_columns(|values| {
            impute::fill_rolling_mean(values, window, min_periods, decimals);
            impute::ffill_bfill(values);
        });
    }

    /// Exponential weighted mean fill over the numeric columns, then sweep.
    #[must_use]
    pub fn impute_ema(&self, span: usize, adjust: bool, decimals: Option<u32>) -> Self {
        let mut out = self.clone();
        out.impute_ema_mut(span, adjust, decimals);
        out
    }

    /// In-place variant of [`impute_ema`](Self::impute_ema).
    pub fn impute_ema_mut(&mut self, span: usize, adjust: bool, decimals: Option<u32>) {
        self.map_numeric_columns(|values| {
            impute::fill_ewm_mean(values, span, adjust, decimals);
            impute::ffill_bfill(values);
        });
    }

    /// Interpolate the numeric columns, then sweep.
    #[must_use]
    pub fn impute_interpolate(&self, method: &str) -> Self {
        let mut out = self.clone();
        out.impute_interpolate_mut(method);
        out
    }

    /// In-place variant of [`impute_interpolate`](Self::impute_interpolate).
    pub fn impute_interpolate_mut(&mut self, method: &str) {
        self.map_numeric_columns(|values| {
            impute::interpolate(values, method);
            impute::ffill_bfill(values);
        });
    }
}

fn pick_present(values: &[Datum], rows: &[usize], first: bool) -> Datum {
    let mut it = rows.iter().map(|&r| &values[r]).filter(|v| !v.is_missing());
    let picked = if first { it.next() } else { it.last() };
    picked.cloned().unwrap_or(Datum::Missing)
}
