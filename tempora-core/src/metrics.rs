//! Forecast-error metrics (sMAPE, MAE, RMSE, SEM).

use crate::stats;

/// Pairs actual and predicted values and exposes the error aggregations.
///
/// Pairs where either side is non-finite are dropped up front, so a missing
/// observation never poisons an aggregate.
///
/// ```
/// let m = tempora_core::Metrics::new(&[100.0, 110.0, 120.0], &[102.0, 108.0, 123.0]);
/// assert_eq!(m.mae(2), 2.33);
/// ```
#[derive(Debug, Clone)]
pub struct Metrics {
    y_val: Vec<f64>,
    y_pred: Vec<f64>,
}

impl Metrics {
    /// Pair up `y_val` and `y_pred`, dropping non-finite pairs.
    #[must_use]
    pub fn new(y_val: &[f64], y_pred: &[f64]) -> Self {
        let (y_val, y_pred) = y_val
            .iter()
            .zip(y_pred)
            .filter(|(v, p)| v.is_finite() && p.is_finite())
            .map(|(v, p)| (*v, *p))
            .unzip();
        Self { y_val, y_pred }
    }

    /// Number of usable pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.y_val.len()
    }

    /// True when no usable pair remains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.y_val.is_empty()
    }

    /// Symmetric mean absolute percentage error, as a percentage.
    #[must_use]
    pub fn smape(&self, decimals: u32) -> f64 {
        const EPSILON: f64 = 1e-10;
        let terms: Vec<f64> = self
            .y_val
            .iter()
            .zip(&self.y_pred)
            .map(|(v, p)| (v - p).abs() / ((v.abs() + p.abs()) / 2.0 + EPSILON))
            .collect();
        stats::round_to(stats::mean(&terms) * 100.0, decimals)
    }

    /// Mean absolute error.
    #[must_use]
    pub fn mae(&self, decimals: u32) -> f64 {
        let errs: Vec<f64> = self
            .y_val
            .iter()
            .zip(&self.y_pred)
            .map(|(v, p)| (v - p).abs())
            .collect();
        stats::round_to(stats::mean(&errs), decimals)
    }

    /// Root mean squared error.
    #[must_use]
    pub fn rmse(&self, decimals: u32) -> f64 {
        let sq: Vec<f64> = self
            .y_val
            .iter()
            .zip(&self.y_pred)
            .map(|(v, p)| (v - p).powi(2))
            .collect();
        stats::round_to(stats::mean(&sq).sqrt(), decimals)
    }

    /// Standard error of the mean of the signed errors (sample std / sqrt(n)).
    #[must_use]
    pub fn sem(&self, decimals: u32) -> f64 {
        let errs: Vec<f64> = self
            .y_val
            .iter()
            .zip(&self.y_pred)
            .map(|(v, p)| v - p)
            .collect();
        stats::round_to(stats::std(&errs) / (errs.len() as f64).sqrt(), decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_forecast_scores_zero() {
        let m = Metrics::new(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert_eq!(m.mae(2), 0.0);
        assert_eq!(m.rmse(2), 0.0);
        assert_eq!(m.smape(2), 0.0);
    }

    #[test]
    fn non_finite_pairs_are_dropped() {
        let m = Metrics::new(&[1.0, f64::NAN, 3.0], &[2.0, 2.0, f64::NAN]);
        assert_eq!(m.len(), 1);
        assert_eq!(m.mae(2), 1.0);
    }

    #[test]
    fn rmse_penalizes_large_errors_more_than_mae() {
        let m = Metrics::new(&[0.0, 0.0, 0.0], &[0.0, 0.0, 3.0]);
        assert_eq!(m.mae(2), 1.0);
        assert!(m.rmse(2) > m.mae(2));
    }
}
