use chrono::NaiveDateTime;
use rand::Rng;
use tempora_types::{AggMethod, SampleMethod, TemporaError};

use crate::frequency::{Frequency, date_range};
use crate::metrics::Metrics;
use crate::series::Datum;
use crate::{dedup, impute, normalize, sample, stats};

const UNI_AGG: &str = "first, last, sum";

/// A single named value column over a timestamp index.
#[derive(Debug, Clone, PartialEq)]
pub struct UniSeries {
    name: String,
    index_name: String,
    index: Vec<NaiveDateTime>,
    values: Vec<Datum>,
    freq: Option<Frequency>,
}

impl UniSeries {
    /// Build a series from parallel index and value vectors.
    ///
    /// The index may arrive unsorted or with duplicates; the frequency is
    /// inferred when the cadence is uniform.
    ///
    /// # Errors
    /// Returns `TemporaError::Data` when the vectors disagree in length.
    pub fn new(
        name: impl Into<String>,
        index_name: impl Into<String>,
        index: Vec<NaiveDateTime>,
        values: Vec<Datum>,
    ) -> Result<Self, TemporaError> {
        if index.len() != values.len() {
            return Err(TemporaError::Data(format!(
                "index has {} entries but values has {}",
                index.len(),
                values.len()
            )));
        }
        let freq = Frequency::infer(&index);
        Ok(Self {
            name: name.into(),
            index_name: index_name.into(),
            index,
            values,
            freq,
        })
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
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

    /// The value column.
    #[must_use]
    pub fn values(&self) -> &[Datum] {
        &self.values
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

    /// True when no cell is textual (an all-missing series counts as numeric).
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        !self.values.iter().any(|v| matches!(v, Datum::Text(_)))
    }

    /// Values as floats, missing and textual cells becoming NaN.
    #[must_use]
    pub fn values_f64(&self) -> Vec<f64> {
        self.values
            .iter()
            .map(|v| v.as_number().unwrap_or(f64::NAN))
            .collect()
    }

    /// Rename the value column.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// An independent copy of rows `lo..hi` (clipped to the series length).
    #[must_use]
    pub fn slice(&self, lo: usize, hi: usize) -> Self {
        let hi = hi.min(self.len());
        let lo = lo.min(hi);
        Self {
            name: self.name.clone(),
            index_name: self.index_name.clone(),
            index: self.index[lo..hi].to_vec(),
            values: self.values[lo..hi].to_vec(),
            freq: self.freq,
        }
    }

    /// The first `n` observations.
    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        self.slice(0, n)
    }

    /// Sort observations by timestamp (stable, so duplicate entries keep
    /// their arrival order).
    pub fn sort_by_index(&mut self) {
        if self.index.windows(2).all(|w| w[0] <= w[1]) {
            return;
        }
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by_key(|&i| self.index[i]);
        self.index = order.iter().map(|&i| self.index[i]).collect();
        self.values = order.iter().map(|&i| self.values[i].clone()).collect();
    }

    pub(crate) fn with_values(&self, values: Vec<Datum>) -> Self {
        debug_assert_eq!(values.len(), self.len());
        Self {
            name: self.name.clone(),
            index_name: self.index_name.clone(),
            index: self.index.clone(),
            values,
            freq: self.freq,
        }
    }

    fn take_rows(&self, rows: &[usize]) -> Self {
        Self {
            name: self.name.clone(),
            index_name: self.index_name.clone(),
            index: rows.iter().map(|&r| self.index[r]).collect(),
            values: rows.iter().map(|&r| self.values[r].clone()).collect(),
            freq: self.freq,
        }
    }

    /// Resolve repeated index entries.
    ///
    /// Supported methods: `first`, `last`, and `sum` (per-group summation).
    /// Group order follows the first occurrence of each timestamp.
    ///
    /// # Errors
    /// Returns `TemporaError::InvalidArg` for a method outside the supported
    /// set.
    pub fn agg_duplicates(&self, method: AggMethod) -> Result<Self, TemporaError> {
        match method {
            AggMethod::First => Ok(self.take_rows(&dedup::keep_rows(&self.index, true))),
            AggMethod::Last => Ok(self.take_rows(&dedup::keep_rows(&self.index, false))),
            AggMethod::Sum => {
                let groups = dedup::duplicate_groups(&self.index);
                let index: Vec<NaiveDateTime> = groups.iter().map(|(ts, _)| *ts).collect();
                let values: Vec<Datum> = groups
                    .iter()
                    .map(|(_, rows)| dedup::sum_group(&self.values, rows))
                    .collect();
                Ok(Self {
                    name: self.name.clone(),
                    index_name: self.index_name.clone(),
                    index,
                    values,
                    freq: self.freq,
                })
            }
            other => Err(TemporaError::invalid_arg(
                format!("Invalid method: {other}"),
                UNI_AGG,
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

    /// Reindex onto a complete grid at a fixed cadence, gaps becoming
    /// explicit missing values. The series' own inferred frequency takes
    /// precedence over the argument. Always returns a new series.
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
        let values = normalize::reindex_positions(&self.index, &grid)
            .into_iter()
            .map(|pos| pos.map_or(Datum::Missing, |r| self.values[r].clone()))
            .collect();
        Ok(Self {
            name: self.name.clone(),
            index_name: self.index_name.clone(),
            index: grid,
            values,
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

    /// Generate ordered (input, output) window pairs.
    ///
    /// The start-index policy picks candidates; each candidate is then
    /// boundary-checked and production stops at the first window that would
    /// run past the series end. Both windows of a pair are independent
    /// copies.
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

    /// Arithmetic mean of the numeric cells, rounded to `decimals`.
    #[must_use]
    pub fn mean(&self, decimals: u32) -> f64 {
        stats::round_to(stats::mean(&stats::numeric_values(&self.values)), decimals)
    }

    /// Median of the numeric cells, rounded to `decimals`.
    #[must_use]
    pub fn median(&self, decimals: u32) -> f64 {
        stats::round_to(stats::median(&stats::numeric_values(&self.values)), decimals)
    }

    /// Sample standard deviation of the numeric cells.
    #[must_use]
    pub fn std(&self, decimals: u32) -> f64 {
        stats::round_to(stats::std(&stats::numeric_values(&self.values)), decimals)
    }

    /// Smallest numeric cell.
    #[must_use]
    pub fn min(&self, decimals: u32) -> f64 {
        stats::round_to(stats::min(&stats::numeric_values(&self.values)), decimals)
    }

    /// Largest numeric cell.
    #[must_use]
    pub fn max(&self, decimals: u32) -> f64 {
        stats::round_to(stats::max(&stats::numeric_values(&self.values)), decimals)
    }

    /// Quantile of the numeric cells with linear interpolation.
    #[must_use]
    pub fn quantile(&self, q: f64, decimals: u32) -> f64 {
        stats::round_to(stats::quantile(&stats::numeric_values(&self.values), q), decimals)
    }

    // ---- forecast metrics --------------------------------------------------

    /// Symmetric mean absolute percentage error against `y_pred`.
    #[must_use]
    pub fn smape(&self, y_pred: &[f64], decimals: u32) -> f64 {
        Metrics::new(&self.values_f64(), y_pred).smape(decimals)
    }

    /// Mean absolute error against `y_pred`.
    #[must_use]
    pub fn mae(&self, y_pred: &[f64], decimals: u32) -> f64 {
        Metrics::new(&self.values_f64(), y_pred).mae(decimals)
    }

    /// Root mean squared error against `y_pred`.
    #[must_use]
    pub fn rmse(&self, y_pred: &[f64], decimals: u32) -> f64 {
        Metrics::new(&self.values_f64(), y_pred).rmse(decimals)
    }

    // ---- imputation --------------------------------------------------------

    /// Fill missing cells with the rounded series mean.
    #[must_use]
    pub fn impute_mean(&self, decimals: Option<u32>) -> Self {
        let mut out = self.clone();
        out.impute_mean_mut(decimals);
        out
    }

    /// In-place variant of [`impute_mean`](Self::impute_mean).
    pub fn impute_mean_mut(&mut self, decimals: Option<u32>) {
        let sample = stats::numeric_values(&self.values);
        if sample.is_empty() {
            return;
        }
        let fill = Datum::Number(stats::round_opt(stats::mean(&sample), decimals));
        impute::fill_constant(&mut self.values, &fill);
    }

    /// Fill missing cells with the rounded series median.
    #[must_use]
    pub fn impute_median(&self, decimals: Option<u32>) -> Self {
        let mut out = self.clone();
        out.impute_median_mut(decimals);
        out
    }

    /// In-place variant of [`impute_median`](Self::impute_median).
    pub fn impute_median_mut(&mut self, decimals: Option<u32>) {
        let sample = stats::numeric_values(&self.values);
        if sample.is_empty() {
            return;
        }
        let fill = Datum::Number(stats::round_opt(stats::median(&sample), decimals));
        impute::fill_constant(&mut self.values, &fill);
    }

    /// Forward fill, then backward fill for gaps at the head.
    #[must_use]
    pub fn impute_ffill(&self) -> Self {
        let mut out = self.clone();
        out.impute_ffill_mut();
        out
    }

    /// In-place variant of [`impute_ffill`](Self::impute_ffill).
    pub fn impute_ffill_mut(&mut self) {
        impute::ffill_bfill(&mut self.values);
    }

    /// Backward fill, then forward fill for gaps at the tail.
    #[must_use]
    pub fn impute_bfill(&self) -> Self {
        let mut out = self.clone();
        out.impute_bfill_mut();
        out
    }

    /// In-place variant of [`impute_bfill`](Self::impute_bfill).
    pub fn impute_bfill_mut(&mut self) {
        impute::bfill_ffill(&mut self.values);
    }

    /// Fill missing cells with a trailing simple moving average, then sweep
    /// forward/backward for anything the window could not cover.
    #[must_use]
    pub fn impute_sma(&self, window: usize, min_periods: usize, decimals: Option<u32>) -> Self {
        let mut out = self.clone();
        out.impute_sma_mut(window, min_periods, decimals);
        out
    }

    /// In-place variant of [`impute_sma`](Self::impute_sma).
    pub fn impute_sma_mut(&mut self, window: usize, min_periods: usize, decimals: Option<u32>) {
        impute::fill_rolling_mean(&mut self.values, window, min_periods, decimals);
        impute::ffill_bfill(&mut self.values);
    }

    /// Fill missing cells with an exponential weighted mean, then sweep.
    #[must_use]
    pub fn impute_ema(&self, span: usize, adjust: bool, decimals: Option<u32>) -> Self {
        let mut out = self.clone();
        out.impute_ema_mut(span, adjust, decimals);
        out
    }

    /// In-place variant of [`impute_ema`](Self::impute_ema).
    pub fn impute_ema_mut(&mut self, span: usize, adjust: bool, decimals: Option<u32>) {
        impute::fill_ewm_mean(&mut self.values, span, adjust, decimals);
        impute::ffill_bfill(&mut self.values);
    }

    /// Interpolate missing cells; unsupported methods fall back to linear
    /// (logged), then sweep forward/backward.
    #[must_use]
    pub fn impute_interpolate(&self, method: &str) -> Self {
        let mut out = self.clone();
        out.impute_interpolate_mut(method);
        out
    }

    /// In-place variant of [`impute_interpolate`](Self::impute_interpolate).
    pub fn impute_interpolate_mut(&mut self, method: &str) {
        impute::interpolate(&mut self.values, method);
        impute::ffill_bfill(&mut self.values);
    }
}
