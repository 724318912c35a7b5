//! Error taxonomy.
//!
//! Construction problems are [`ConfigError`]; bad per-call arguments are
//! [`ArgumentError`]. Both are raised before any state is touched.

/// Invalid construction arguments (priors, ground truth, distribution name).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("at least one arm is required")]
    NoArms,
    #[error("{what}: expected {expected} entries, got {got}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("arm {arm}: prior must be non-negative, got {value}")]
    NegativePrior { arm: usize, value: f64 },
    #[error("arm {arm}: {what} is not finite")]
    NonFinite { what: &'static str, arm: usize },
    #[error("arm {arm}: prior success + failure mass is zero")]
    EmptyPosterior { arm: usize },
    #[error("arm {arm}: beta posterior needs both prior_success > 0 and prior_failure > 0")]
    NonPositiveBetaShape { arm: usize },
    #[error("unknown distribution {0:?} (expected beta, triangular, or normal)")]
    UnknownDistribution(String),
    #[error("arm {arm}: probability {value} is outside [0, 1]")]
    InvalidProbability { arm: usize, value: f64 },
    #[error("arm {arm}: success/neutral/failure mass sums to {total}, not 1")]
    ProbabilityMassNotNormalized { arm: usize, total: f64 },
    #[error("prior weight must be finite and non-negative, got {0}")]
    InvalidPriorWeight(f64),
}

/// Invalid arguments to an otherwise well-formed model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("arm index {arm} is out of range for {n_arms} arms")]
    ArmOutOfRange { arm: usize, n_arms: usize },
    #[error("unknown outcome {0:?} (expected success, neutral, or failure)")]
    UnknownOutcome(String),
}

/// Either kind of error, for callers that mix construction and updates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Argument(#[from] ArgumentError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_arm() {
        let e = ConfigError::NegativePrior { arm: 2, value: -1.0 };
        assert_eq!(e.to_string(), "arm 2: prior must be non-negative, got -1");
        let e = ArgumentError::ArmOutOfRange { arm: 5, n_arms: 3 };
        assert!(e.to_string().contains("5"));
    }

    #[test]
    fn wrapper_is_transparent() {
        let e: Error = ArgumentError::UnknownOutcome("meh".into()).into();
        assert_eq!(
            e.to_string(),
            "unknown outcome \"meh\" (expected success, neutral, or failure)"
        );
    }
}
