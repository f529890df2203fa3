use rand::Rng;
use rand::seq::index;
use tempora_types::{SampleMethod, TemporaError};

/// Candidate start indices for windowed sampling, before the boundary check.
///
/// Returns signed indices: the `backend` formula can go negative on short
/// series, and those candidates are skipped by the caller rather than
/// truncating the whole run. All other policies produce non-negative indices.
///
/// # Errors
/// Returns `TemporaError::InvalidArg` when `uniform` is given an explicit
/// step of zero.
pub fn start_indices<R: Rng + ?Sized>(
    method: SampleMethod,
    n: usize,
    window: usize,
    samples: usize,
    step: Option<usize>,
    rng: &mut R,
) -> Result<Vec<i64>, TemporaError> {
    let n_i = n as i64;
    let w = window as i64;
    let max_start = n_i - 2 * w;

    match method {
        SampleMethod::Frontend => Ok((0..samples as i64).map(|i| i * 2 * w).collect()),

        SampleMethod::Backend => {
            if w == 0 {
                return Ok(Vec::new());
            }
            let total = n_i / w - 1;
            let take = (samples as i64).min(total);
            if take <= 0 {
                return Ok(Vec::new());
            }
            Ok((0..take).map(|i| n_i - (take - i) * 2 * w).collect())
        }

        SampleMethod::Random => {
            if max_start < 0 {
                return Ok(Vec::new());
            }
            let population = (max_start + 1) as usize;
            let amount = samples.min(population);
            let mut picked: Vec<i64> = index::sample(rng, population, amount)
                .into_iter()
                .map(|i| i as i64)
                .collect();
            picked.sort_unstable();
            Ok(picked)
        }

        SampleMethod::Uniform => {
            if max_start < 0 || samples == 0 {
                return Ok(Vec::new());
            }
            match step {
                None => {
                    let stride = if samples > 1 {
                        max_start as f64 / (samples - 1) as f64
                    } else {
                        0.0
                    };
                    Ok((0..samples)
                        .map(|i| (i as f64 * stride).floor() as i64)
                        .collect())
                }
                Some(0) => Err(TemporaError::InvalidArg(
                    "uniform sampling step must not be zero".into(),
                )),
                Some(s) => Ok((0..=max_start as usize)
                    .step_by(s)
                    .take(samples)
                    .map(|i| i as i64)
                    .collect()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn frontend_is_sequential_non_overlapping() {
        let idxs = start_indices(SampleMethod::Frontend, 100, 5, 3, None, &mut rng()).unwrap();
        assert_eq!(idxs, vec![0, 10, 20]);
    }

    #[test]
    fn backend_ends_at_tail() {
        // n = 20, w = 3: total = 5, capped at 2 samples -> starts 8 and 14
        let idxs = start_indices(SampleMethod::Backend, 20, 3, 2, None, &mut rng()).unwrap();
        assert_eq!(idxs, vec![8, 14]);
        assert_eq!(idxs.last().unwrap() + 6, 20);
    }

    #[test]
    fn backend_caps_samples_at_total() {
        let idxs = start_indices(SampleMethod::Backend, 10, 2, 50, None, &mut rng()).unwrap();
        // total = 10/2 - 1 = 4 pairs
        assert_eq!(idxs.len(), 4);
    }

    #[test]
    fn random_returns_empty_when_insufficient() {
        let idxs = start_indices(SampleMethod::Random, 15, 10, 5, None, &mut rng()).unwrap();
        assert!(idxs.is_empty());
    }

    #[test]
    fn random_is_sorted_and_distinct() {
        let idxs = start_indices(SampleMethod::Random, 50, 4, 10, None, &mut rng()).unwrap();
        assert_eq!(idxs.len(), 10);
        assert!(idxs.windows(2).all(|w| w[0] < w[1]));
        assert!(idxs.iter().all(|&i| (0..=42).contains(&i)));
    }

    #[test]
    fn uniform_spreads_across_legal_range() {
        // n = 20, w = 3: max_start = 14, stride = 14/3
        let idxs = start_indices(SampleMethod::Uniform, 20, 3, 4, None, &mut rng()).unwrap();
        assert_eq!(idxs, vec![0, 4, 9, 14]);
    }

    #[test]
    fn uniform_single_sample_starts_at_zero() {
        let idxs = start_indices(SampleMethod::Uniform, 20, 3, 1, None, &mut rng()).unwrap();
        assert_eq!(idxs, vec![0]);
    }

    #[test]
    fn uniform_explicit_step_truncates_to_samples() {
        let idxs = start_indices(SampleMethod::Uniform, 30, 3, 3, Some(5), &mut rng()).unwrap();
        assert_eq!(idxs, vec![0, 5, 10]);
    }

    #[test]
    fn uniform_zero_step_is_invalid() {
        let err = start_indices(SampleMethod::Uniform, 30, 3, 3, Some(0), &mut rng()).unwrap_err();
        assert!(matches!(err, TemporaError::InvalidArg(_)));
    }
}
