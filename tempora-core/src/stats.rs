//! Descriptive statistics over the numeric cells of a series.
//!
//! Missing values are ignored throughout; an empty sample yields NaN, the
//! same as the original numeric engine. STL decomposition is an external
//! collaborator and is not reimplemented here.

use crate::series::Datum;

/// Non-missing numeric payloads of a column.
pub(crate) fn numeric_values(values: &[Datum]) -> Vec<f64> {
    values.iter().filter_map(Datum::as_number).collect()
}

/// Round half-to-even at the given number of decimals.
#[must_use]
pub fn round_to(x: f64, decimals: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let factor = 10f64.powi(decimals as i32);
    (x * factor).round_ties_even() / factor
}

/// Optional rounding: `None` leaves the value untouched.
#[must_use]
pub fn round_opt(x: f64, decimals: Option<u32>) -> f64 {
    match decimals {
        None => x,
        Some(d) => round_to(x, d),
    }
}

/// Arithmetic mean; NaN for an empty sample.
#[must_use]
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Median by midpoint of the two central order statistics.
#[must_use]
pub fn median(xs: &[f64]) -> f64 {
    quantile(xs, 0.5)
}

/// Sample standard deviation (ddof = 1); NaN below two observations.
#[must_use]
pub fn std(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return f64::NAN;
    }
    let m = mean(xs);
    let var = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (xs.len() - 1) as f64;
    var.sqrt()
}

/// Smallest observation; NaN for an empty sample.
#[must_use]
pub fn min(xs: &[f64]) -> f64 {
    xs.iter().copied().fold(f64::NAN, f64::min)
}

/// Largest observation; NaN for an empty sample.
#[must_use]
pub fn max(xs: &[f64]) -> f64 {
    xs.iter().copied().fold(f64::NAN, f64::max)
}

/// Quantile with linear interpolation between order statistics.
#[must_use]
pub fn quantile(xs: &[f64], q: f64) -> f64 {
    if xs.is_empty() || !(0.0..=1.0).contains(&q) {
        return f64::NAN;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("no NaN in numeric sample"));
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_std_match_sample_conventions() {
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&xs) - 5.0).abs() < 1e-12);
        // sample std of the classic example is ~2.138
        assert!((std(&xs) - 2.138089935).abs() < 1e-6);
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert!((quantile(&xs, 0.25) - 1.75).abs() < 1e-12);
        assert!((median(&xs) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn empty_sample_is_nan() {
        assert!(mean(&[]).is_nan());
        assert!(min(&[]).is_nan());
    }

    #[test]
    fn rounding_is_half_to_even() {
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_opt(0.125, None), 0.125);
    }
}
