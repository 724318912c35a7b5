//! Thompson-sampling bandit over caption arms.
//!
//! Each arm carries a prior (pseudo-counts supplied by the caller) plus observed
//! success/failure mass. Selection draws one posterior sample per arm under the
//! configured [`Family`] and returns the argmax.
//!
//! Notes:
//! - The random source is owned by the model and is **seedable**, so a fixed seed
//!   reproduces the exact selection sequence.
//! - The model does no locking; callers serialize `select_arm`/`register_outcome`
//!   per instance.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::family::{Family, Posterior};
use crate::posterior::{posterior_mean, smoothed_mean};
use crate::prior::{Priors, VoteTally};
use crate::{ArgumentError, ConfigError};

/// Feedback for one presentation of an arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Outcome {
    Success,
    /// Counted as half a success and half a failure.
    Neutral,
    Failure,
}

impl Outcome {
    /// `(success, failure)` mass this outcome adds.
    pub fn mass(&self) -> (f64, f64) {
        match self {
            Outcome::Success => (1.0, 0.0),
            Outcome::Neutral => (0.5, 0.5),
            Outcome::Failure => (0.0, 1.0),
        }
    }

    /// Reward value used for expected-value and regret accounting.
    pub fn reward(&self) -> f64 {
        self.mass().0
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Success => "success",
            Outcome::Neutral => "neutral",
            Outcome::Failure => "failure",
        })
    }
}

impl FromStr for Outcome {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Outcome::Success),
            "neutral" => Ok(Outcome::Neutral),
            "failure" => Ok(Outcome::Failure),
            other => Err(ArgumentError::UnknownOutcome(other.to_string())),
        }
    }
}

/// Prior and observed counters for one arm.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmState {
    pub prior_success: f64,
    pub prior_failure: f64,
    pub observed_success: f64,
    pub observed_failure: f64,
    /// Times this arm received feedback; always `observed_success + observed_failure`.
    pub pulled: u64,
}

impl ArmState {
    fn with_prior(prior_success: f64, prior_failure: f64) -> Self {
        Self {
            prior_success,
            prior_failure,
            observed_success: 0.0,
            observed_failure: 0.0,
            pulled: 0,
        }
    }

    /// Combined prior + observed mass.
    pub fn posterior(&self) -> Posterior {
        Posterior {
            success: self.prior_success + self.observed_success,
            failure: self.prior_failure + self.observed_failure,
        }
    }

    fn record(&mut self, outcome: Outcome) {
        let (s, f) = outcome.mass();
        self.observed_success += s;
        self.observed_failure += f;
        self.pulled = self.pulled.saturating_add(1);
    }
}

/// Seedable Thompson-sampling bandit over a fixed set of indexed arms.
#[derive(Debug, Clone)]
pub struct Bandit<R = StdRng> {
    family: Family,
    arms: Vec<ArmState>,
    rng: R,
}

impl Bandit<StdRng> {
    /// Build a bandit whose random source is `StdRng` seeded with `seed`.
    pub fn with_seed(
        n_arms: usize,
        prior_success: &[f64],
        prior_failure: &[f64],
        family: Family,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::new(
            n_arms,
            prior_success,
            prior_failure,
            family,
            StdRng::seed_from_u64(seed),
        )
    }
}

impl<R: Rng> Bandit<R> {
    /// Build a bandit from per-arm priors.
    ///
    /// Fails if lengths disagree with `n_arms`, any prior is negative or not finite,
    /// an arm has zero prior mass, or (for [`Family::Beta`]) either prior is zero.
    pub fn new(
        n_arms: usize,
        prior_success: &[f64],
        prior_failure: &[f64],
        family: Family,
        rng: R,
    ) -> Result<Self, ConfigError> {
        if n_arms == 0 {
            return Err(ConfigError::NoArms);
        }
        check_len("prior_success", n_arms, prior_success.len())?;
        check_len("prior_failure", n_arms, prior_failure.len())?;

        let mut arms = Vec::with_capacity(n_arms);
        for (arm, (&s, &f)) in prior_success.iter().zip(prior_failure).enumerate() {
            for value in [s, f] {
                if !value.is_finite() {
                    return Err(ConfigError::NonFinite { what: "prior", arm });
                }
                if value < 0.0 {
                    return Err(ConfigError::NegativePrior { arm, value });
                }
            }
            let state = ArmState::with_prior(s, f);
            family.validate(arm, state.posterior())?;
            arms.push(state);
        }

        tracing::debug!(n_arms, family = %family, "bandit constructed");
        Ok(Self { family, arms, rng })
    }

    /// Rebuild a bandit from priors plus vote tallies persisted between requests.
    ///
    /// Neutral votes split half-and-half; `pulled` is the tally's total vote count.
    pub fn restore(
        priors: &Priors,
        observed: &[VoteTally],
        family: Family,
        rng: R,
    ) -> Result<Self, ConfigError> {
        let mut bandit = Self::new(
            priors.n_arms(),
            &priors.success,
            &priors.failure,
            family,
            rng,
        )?;
        check_len("observed", bandit.arms.len(), observed.len())?;
        for (state, tally) in bandit.arms.iter_mut().zip(observed) {
            state.observed_success = tally.success_mass();
            state.observed_failure = tally.failure_mass();
            state.pulled = tally.total();
        }
        Ok(bandit)
    }

    pub fn n_arms(&self) -> usize {
        self.arms.len()
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// Per-arm counters, indexed by arm.
    pub fn arms(&self) -> &[ArmState] {
        &self.arms
    }

    /// Per-arm pull counts.
    pub fn pulled(&self) -> Vec<u64> {
        self.arms.iter().map(|a| a.pulled).collect()
    }

    /// Pick an arm by posterior sampling.
    ///
    /// Draws one sample per arm (in index order) and returns the index of the
    /// largest; ties go to the lowest index. Counters are not touched.
    pub fn select_arm(&mut self) -> usize {
        let mut best = 0usize;
        let mut best_sample = f64::NEG_INFINITY;
        for (i, state) in self.arms.iter().enumerate() {
            let x = self.family.sample(state.posterior(), &mut self.rng);
            if x > best_sample {
                best_sample = x;
                best = i;
            }
        }
        tracing::trace!(arm = best, sample = best_sample, "arm selected");
        best
    }

    /// Record feedback for `arm`.
    ///
    /// Not idempotent: each call counts as one more vote.
    pub fn register_outcome(&mut self, arm: usize, outcome: Outcome) -> Result<(), ArgumentError> {
        let n_arms = self.arms.len();
        let state = self
            .arms
            .get_mut(arm)
            .ok_or(ArgumentError::ArmOutOfRange { arm, n_arms })?;
        state.record(outcome);
        tracing::trace!(arm, %outcome, pulled = state.pulled, "outcome registered");
        Ok(())
    }

    /// Observed means with `+1` smoothing: `s / (s + f + 1)` over observations only.
    pub fn get_sample_means(&self) -> Vec<f64> {
        self.arms
            .iter()
            .map(|a| smoothed_mean(a.observed_success, a.observed_failure))
            .collect()
    }

    /// Posterior means `s / t` over prior + observed mass.
    pub fn prior_sample_means(&self) -> Vec<f64> {
        self.arms
            .iter()
            .map(|a| {
                let p = a.posterior();
                posterior_mean(p.success, p.failure)
            })
            .collect()
    }

    /// The model's random source, shared with the simulation harness.
    pub(crate) fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

fn check_len(what: &'static str, expected: usize, got: usize) -> Result<(), ConfigError> {
    if expected != got {
        return Err(ConfigError::LengthMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}
