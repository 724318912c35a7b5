//! Offline regret simulation against a synthetic ground truth.
//!
//! A [`Simulation`] owns one [`Bandit`] and replays `trials` rounds of
//! select → sample true outcome → register → record regret. Outcome sampling draws
//! from the bandit's own random source, so one seed fixes the whole run.
//!
//! This is an evaluation tool for comparing [`Family`] choices; it has no place in
//! a request-serving path.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::posterior::argmax;
use crate::{Bandit, ConfigError, Family, Outcome, Priors};

/// Known per-arm outcome probabilities.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroundTruth {
    /// Success probability per arm; every other draw is a failure.
    Binary(Vec<f64>),
    /// Aligned success/neutral/failure mass per arm, each arm summing to 1.
    Ternary {
        success: Vec<f64>,
        neutral: Vec<f64>,
        failure: Vec<f64>,
    },
}

const MASS_TOLERANCE: f64 = 1e-9;

impl GroundTruth {
    pub fn n_arms(&self) -> usize {
        match self {
            GroundTruth::Binary(p) => p.len(),
            GroundTruth::Ternary { success, .. } => success.len(),
        }
    }

    /// Expected reward per arm (`success = 1`, `neutral = 0.5`, `failure = 0`).
    pub fn expected_values(&self) -> Vec<f64> {
        match self {
            GroundTruth::Binary(p) => p.clone(),
            GroundTruth::Ternary {
                success, neutral, ..
            } => success
                .iter()
                .zip(neutral)
                .map(|(s, n)| s + 0.5 * n)
                .collect(),
        }
    }

    fn validate(&self, n_arms: usize) -> Result<(), ConfigError> {
        let check_probs = |what: &'static str, ps: &[f64]| -> Result<(), ConfigError> {
            if ps.len() != n_arms {
                return Err(ConfigError::LengthMismatch {
                    what,
                    expected: n_arms,
                    got: ps.len(),
                });
            }
            for (arm, &value) in ps.iter().enumerate() {
                if !value.is_finite() {
                    return Err(ConfigError::NonFinite { what, arm });
                }
                if !(0.0..=1.0).contains(&value) {
                    return Err(ConfigError::InvalidProbability { arm, value });
                }
            }
            Ok(())
        };

        match self {
            GroundTruth::Binary(p) => check_probs("ground_truth", p),
            GroundTruth::Ternary {
                success,
                neutral,
                failure,
            } => {
                check_probs("ground_truth.success", success)?;
                check_probs("ground_truth.neutral", neutral)?;
                check_probs("ground_truth.failure", failure)?;
                for arm in 0..n_arms {
                    let total = success[arm] + neutral[arm] + failure[arm];
                    if (total - 1.0).abs() > MASS_TOLERANCE {
                        return Err(ConfigError::ProbabilityMassNotNormalized { arm, total });
                    }
                }
                Ok(())
            }
        }
    }

    /// Draw one true outcome for `arm` (one uniform draw per call).
    fn sample<R: Rng>(&self, arm: usize, rng: &mut R) -> Outcome {
        let u: f64 = rng.random();
        match self {
            GroundTruth::Binary(p) => {
                if u < p[arm] {
                    Outcome::Success
                } else {
                    Outcome::Failure
                }
            }
            GroundTruth::Ternary {
                success, neutral, ..
            } => {
                if u < success[arm] {
                    Outcome::Success
                } else if u < success[arm] + neutral[arm] {
                    Outcome::Neutral
                } else {
                    Outcome::Failure
                }
            }
        }
    }
}

/// Run parameters that, with a ground truth and priors, reproduce a simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    pub family: Family,
    pub trials: usize,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            family: Family::Beta,
            trials: 1_000,
            seed: 0,
        }
    }
}

/// Output of one simulation run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationResult {
    /// Cumulative regret after each round (`len == trials`).
    pub regret: Vec<f64>,
    /// Final pull counts per arm.
    pub pulled: Vec<u64>,
    /// Final smoothed observed means (see [`Bandit::get_sample_means`]).
    pub sample_means: Vec<f64>,
    /// Final prior + observed means.
    pub posterior_means: Vec<f64>,
    /// `argmax` of `sample_means`.
    pub empirical_best: usize,
    /// `argmax` of the true expected values.
    pub true_best: usize,
}

impl SimulationResult {
    /// Regret after the last round (0 for a zero-trial run).
    pub fn final_regret(&self) -> f64 {
        self.regret.last().copied().unwrap_or(0.0)
    }

    pub fn found_true_best(&self) -> bool {
        self.empirical_best == self.true_best
    }
}

/// Regret simulation driving one bandit.
#[derive(Debug, Clone)]
pub struct Simulation<R = StdRng> {
    bandit: Bandit<R>,
    truth: GroundTruth,
    true_means: Vec<f64>,
    true_best: usize,
    trials: usize,
}

impl Simulation<StdRng> {
    /// Build from a [`SimulationConfig`], seeding `StdRng` with `cfg.seed`.
    pub fn from_config(
        truth: GroundTruth,
        priors: &Priors,
        cfg: SimulationConfig,
    ) -> Result<Self, ConfigError> {
        Self::new(
            priors.n_arms(),
            truth,
            &priors.success,
            &priors.failure,
            cfg.family,
            cfg.trials,
            StdRng::seed_from_u64(cfg.seed),
        )
    }
}

impl<R: Rng> Simulation<R> {
    pub fn new(
        n_arms: usize,
        truth: GroundTruth,
        prior_success: &[f64],
        prior_failure: &[f64],
        family: Family,
        trials: usize,
        rng: R,
    ) -> Result<Self, ConfigError> {
        let bandit = Bandit::new(n_arms, prior_success, prior_failure, family, rng)?;
        truth.validate(n_arms)?;
        let true_means = truth.expected_values();
        let true_best = argmax(&true_means).unwrap_or(0);
        tracing::debug!(n_arms, family = %family, trials, true_best, "simulation constructed");
        Ok(Self {
            bandit,
            truth,
            true_means,
            true_best,
            trials,
        })
    }

    pub fn bandit(&self) -> &Bandit<R> {
        &self.bandit
    }

    pub fn true_best(&self) -> usize {
        self.true_best
    }

    /// Regret of the current pull counts: `Σ (best_mean - mean_i) * pulled_i`.
    pub fn regret(&self) -> f64 {
        let best = self.true_means[self.true_best];
        self.true_means
            .iter()
            .zip(self.bandit.arms())
            .map(|(m, a)| (best - m) * a.pulled as f64)
            .sum()
    }

    /// Play all rounds and report.
    pub fn run(mut self) -> SimulationResult {
        let mut regret = Vec::with_capacity(self.trials);
        for _ in 0..self.trials {
            let arm = self.bandit.select_arm();
            let outcome = self.truth.sample(arm, self.bandit.rng_mut());
            // `arm` comes from `select_arm`, so it is always in range.
            if self.bandit.register_outcome(arm, outcome).is_err() {
                break;
            }
            regret.push(self.regret());
        }

        let sample_means = self.bandit.get_sample_means();
        let empirical_best = argmax(&sample_means).unwrap_or(0);
        let result = SimulationResult {
            regret,
            pulled: self.bandit.pulled(),
            posterior_means: self.bandit.prior_sample_means(),
            sample_means,
            empirical_best,
            true_best: self.true_best,
        };
        tracing::debug!(
            final_regret = result.final_regret(),
            empirical_best,
            true_best = self.true_best,
            "simulation finished"
        );
        result
    }
}

/// Aggregate over independently seeded runs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchSummary {
    pub runs: usize,
    /// Runs whose empirical best arm equalled the true best arm.
    pub best_arm_matches: usize,
    pub mean_final_regret: f64,
}

impl BatchSummary {
    pub fn match_rate(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.best_arm_matches as f64 / self.runs as f64
        }
    }
}

/// Run one simulation per seed (overriding `cfg.seed`) and summarize.
pub fn simulate_batch<I>(
    truth: &GroundTruth,
    priors: &Priors,
    cfg: SimulationConfig,
    seeds: I,
) -> Result<BatchSummary, ConfigError>
where
    I: IntoIterator<Item = u64>,
{
    let mut runs = 0usize;
    let mut best_arm_matches = 0usize;
    let mut regret_sum = 0.0;
    for seed in seeds {
        let result =
            Simulation::from_config(truth.clone(), priors, SimulationConfig { seed, ..cfg })?
                .run();
        runs += 1;
        if result.found_true_best() {
            best_arm_matches += 1;
        }
        regret_sum += result.final_regret();
    }
    let mean_final_regret = if runs == 0 {
        0.0
    } else {
        regret_sum / runs as f64
    };
    tracing::debug!(runs, best_arm_matches, mean_final_regret, family = %cfg.family, "batch finished");
    Ok(BatchSummary {
        runs,
        best_arm_matches,
        mean_final_regret,
    })
}
