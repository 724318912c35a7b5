//! Posterior mean / variance formulas shared by selection and reporting.

/// Posterior mean `s / (s + f)`.
///
/// Returns `0.5` when there is no mass at all; construction-time validation keeps
/// that case out of live models.
pub fn posterior_mean(success: f64, failure: f64) -> f64 {
    let t = success + failure;
    if t > 0.0 {
        success / t
    } else {
        0.5
    }
}

/// Variance heuristic `exp(-1 / t)` used by the normal family.
///
/// Grows toward 1 as `t` grows; it never shrinks to zero. `t <= 0` yields `1.0`
/// (the `t -> 0+` limit is excluded by validation, so this is only a floor).
pub fn normal_variance(total: f64) -> f64 {
    if total > 0.0 {
        (-1.0 / total).exp()
    } else {
        1.0
    }
}

/// Laplace-smoothed observed mean `s / (s + f + 1)`.
///
/// Always finite and in `[0, 1)` for non-negative inputs.
pub fn smoothed_mean(observed_success: f64, observed_failure: f64) -> f64 {
    observed_success / (observed_success + observed_failure + 1.0)
}

/// Index of the largest value; ties go to the lowest index.
///
/// `None` for an empty slice. NaN entries never win.
pub fn argmax(xs: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    let mut best_x = f64::NEG_INFINITY;
    for (i, &x) in xs.iter().enumerate() {
        if best.is_none() || x > best_x {
            if x.is_nan() {
                continue;
            }
            best = Some(i);
            best_x = x;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_falls_back_to_half_without_mass() {
        assert_eq!(posterior_mean(0.0, 0.0), 0.5);
        assert_eq!(posterior_mean(3.0, 1.0), 0.75);
    }

    #[test]
    fn normal_variance_is_slow_and_bounded() {
        let small = normal_variance(1.0);
        let large = normal_variance(1_000.0);
        assert!((small - (-1.0f64).exp()).abs() < 1e-12);
        assert!(large > small);
        assert!(large < 1.0);
        assert_eq!(normal_variance(0.0), 1.0);
    }

    #[test]
    fn smoothed_mean_is_zero_without_observations() {
        assert_eq!(smoothed_mean(0.0, 0.0), 0.0);
        assert_eq!(smoothed_mean(3.0, 0.0), 0.75);
    }

    #[test]
    fn argmax_prefers_lowest_index_on_ties() {
        assert_eq!(argmax(&[0.2, 0.9, 0.9]), Some(1));
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmax(&[f64::NAN, 0.1]), Some(1));
        assert_eq!(argmax(&[0.0, 0.0]), Some(0));
    }
}
