//! Missing-value imputation over datum columns.
//!
//! Each strategy mirrors the original engine: value-based fills (mean,
//! median, rolling, exponential) touch numeric cells only, the directional
//! fills propagate any cell kind, and every windowed strategy finishes with a
//! forward/backward sweep so no gap survives at the edges.

use tracing::warn;

use crate::series::Datum;
use crate::stats;

/// Replace missing cells with a constant.
pub(crate) fn fill_constant(values: &mut [Datum], fill: &Datum) {
    for v in values.iter_mut() {
        if v.is_missing() {
            *v = fill.clone();
        }
    }
}

/// Forward fill, then backward fill for any gap left at the head.
pub(crate) fn ffill_bfill(values: &mut [Datum]) {
    ffill(values);
    bfill(values);
}

/// Backward fill, then forward fill for any gap left at the tail.
pub(crate) fn bfill_ffill(values: &mut [Datum]) {
    bfill(values);
    ffill(values);
}

fn ffill(values: &mut [Datum]) {
    let mut last: Option<Datum> = None;
    for v in values.iter_mut() {
        if v.is_missing() {
            if let Some(fill) = &last {
                *v = fill.clone();
            }
        } else {
            last = Some(v.clone());
        }
    }
}

fn bfill(values: &mut [Datum]) {
    let mut next: Option<Datum> = None;
    for v in values.iter_mut().rev() {
        if v.is_missing() {
            if let Some(fill) = &next {
                *v = fill.clone();
            }
        } else {
            next = Some(v.clone());
        }
    }
}

/// Fill missing cells with the simple moving average of the trailing window
/// at that position, when at least `min_periods` observations are available.
pub(crate) fn fill_rolling_mean(
    values: &mut [Datum],
    window: usize,
    min_periods: usize,
    decimals: Option<u32>,
) {
    let window = window.max(1);
    let snapshot: Vec<Option<f64>> = values.iter().map(Datum::as_number).collect();
    for (i, v) in values.iter_mut().enumerate() {
        if !v.is_missing() {
            continue;
        }
        let lo = (i + 1).saturating_sub(window);
        let sample: Vec<f64> = snapshot[lo..=i].iter().filter_map(|x| *x).collect();
        if sample.len() >= min_periods.max(1) {
            *v = Datum::Number(stats::round_opt(stats::mean(&sample), decimals));
        }
    }
}

/// Fill missing cells with the exponential weighted mean up to that position
/// (`alpha = 2 / (span + 1)`).
///
/// Weights decay by row, not by observation: a gap still ages the history
/// before the next observed cell is folded in, so the result matches an
/// `ewm(span)` mean over a series that contains NaN.
pub(crate) fn fill_ewm_mean(values: &mut [Datum], span: usize, adjust: bool, decimals: Option<u32>) {
    let span = span.max(1);
    let alpha = 2.0 / (span as f64 + 1.0);
    let old_wt_factor = 1.0 - alpha;
    let new_wt = if adjust { 1.0 } else { alpha };
    let snapshot: Vec<Option<f64>> = values.iter().map(Datum::as_number).collect();

    let mut current: Option<f64> = None;
    let mut old_wt = 1.0;
    for (i, v) in values.iter_mut().enumerate() {
        match (current, snapshot[i]) {
            (None, Some(x)) => current = Some(x),
            (Some(prev), obs) => {
                old_wt *= old_wt_factor;
                if let Some(x) = obs {
                    current = Some((old_wt * prev + new_wt * x) / (old_wt + new_wt));
                    old_wt = if adjust { old_wt + new_wt } else { 1.0 };
                }
            }
            (None, None) => {}
        }
        if v.is_missing() {
            if let Some(ewma) = current {
                *v = Datum::Number(stats::round_opt(ewma, decimals));
            }
        }
    }
}

/// Linear interpolation between the nearest observed neighbors, by position.
/// Leading gaps stay missing (the caller's ffill/bfill sweep handles them).
pub(crate) fn interpolate_linear(values: &mut [Datum]) {
    let snapshot: Vec<Option<f64>> = values.iter().map(Datum::as_number).collect();
    let observed: Vec<usize> = (0..snapshot.len()).filter(|&i| snapshot[i].is_some()).collect();
    if observed.len() < 2 {
        return;
    }
    for pair in observed.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if hi - lo < 2 {
            continue;
        }
        let (a, b) = (snapshot[lo].unwrap_or(0.0), snapshot[hi].unwrap_or(0.0));
        let span = (hi - lo) as f64;
        for i in lo + 1..hi {
            if values[i].is_missing() {
                let frac = (i - lo) as f64 / span;
                values[i] = Datum::Number(a + (b - a) * frac);
            }
        }
    }
}

/// Interpolation dispatch with the documented leniency: any unsupported
/// method (the spline solver is not carried) logs a warning and falls back to
/// linear rather than failing.
pub(crate) fn interpolate(values: &mut [Datum], method: &str) {
    match method {
        "linear" => interpolate_linear(values),
        other => {
            warn!(method = other, "unsupported interpolation method, falling back to linear");
            interpolate_linear(values);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(xs: &[f64]) -> Vec<Datum> {
        xs.iter().map(|&x| Datum::from(x)).collect()
    }

    #[test]
    fn ffill_then_bfill_closes_every_gap() {
        let mut vals = nums(&[f64::NAN, 2.0, f64::NAN, 4.0, f64::NAN]);
        ffill_bfill(&mut vals);
        assert_eq!(
            vals,
            nums(&[2.0, 2.0, 2.0, 4.0, 4.0]),
        );
    }

    #[test]
    fn rolling_mean_respects_min_periods() {
        let mut vals = nums(&[f64::NAN, 1.0, 3.0, f64::NAN]);
        fill_rolling_mean(&mut vals, 2, 1, None);
        // leading gap has no trailing observations; trailing gap averages (3.0)
        assert!(vals[0].is_missing());
        assert_eq!(vals[3], Datum::Number(3.0));
    }

    #[test]
    fn linear_interpolation_splits_the_gap() {
        let mut vals = nums(&[1.0, f64::NAN, f64::NAN, 4.0]);
        interpolate_linear(&mut vals);
        assert_eq!(vals[1], Datum::Number(2.0));
        assert_eq!(vals[2], Datum::Number(3.0));
    }

    #[test]
    fn unsupported_method_falls_back_to_linear() {
        let mut vals = nums(&[1.0, f64::NAN, 3.0]);
        interpolate(&mut vals, "spline");
        assert_eq!(vals[1], Datum::Number(2.0));
    }

    #[test]
    fn ewm_unadjusted_tracks_last_observation() {
        let mut vals = nums(&[2.0, 2.0, 2.0, f64::NAN]);
        fill_ewm_mean(&mut vals, 3, false, None);
        assert_eq!(vals[3], Datum::Number(2.0));
    }

    #[test]
    fn ewm_gaps_age_the_history() {
        // span 3 -> alpha 0.5; the gap at index 1 halves the weight of the
        // first observation, so index 3 fills with (0.25*2 + 4) / 1.25.
        let mut vals = nums(&[2.0, f64::NAN, 4.0, f64::NAN]);
        fill_ewm_mean(&mut vals, 3, true, None);
        assert_eq!(vals[1], Datum::Number(2.0));
        let fill = vals[3].as_number().unwrap();
        assert!((fill - 3.6).abs() < 1e-12, "got {fill}");
    }
}
