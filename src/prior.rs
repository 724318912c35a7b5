//! Prior derivation from historical vote tallies.
//!
//! Historical tallies are normalized so that, across all arms, they contribute a
//! fixed total weight, then a pseudo-count is added to both sides so beta shapes
//! stay positive.

use crate::ConfigError;

/// Raw per-arm vote counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoteTally {
    pub success: u64,
    pub neutral: u64,
    pub failure: u64,
}

impl VoteTally {
    pub fn total(&self) -> u64 {
        self.success
            .saturating_add(self.neutral)
            .saturating_add(self.failure)
    }

    /// `success + neutral / 2`.
    pub fn success_mass(&self) -> f64 {
        self.success as f64 + 0.5 * self.neutral as f64
    }

    /// `failure + neutral / 2`.
    pub fn failure_mass(&self) -> f64 {
        self.failure as f64 + 0.5 * self.neutral as f64
    }
}

/// How historical tallies become pseudo-counts.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriorConfig {
    /// Total weight all historical votes contribute, summed over arms.
    pub total_weight: f64,
    /// Added to both sides of every arm's prior.
    pub pseudo_count: f64,
}

impl Default for PriorConfig {
    fn default() -> Self {
        Self {
            total_weight: 2.0,
            pseudo_count: 1.0,
        }
    }
}

/// Aligned per-arm prior pseudo-counts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Priors {
    pub success: Vec<f64>,
    pub failure: Vec<f64>,
}

impl Priors {
    /// The same `(success, failure)` prior for every arm.
    pub fn uniform(n_arms: usize, success: f64, failure: f64) -> Self {
        Self {
            success: vec![success; n_arms],
            failure: vec![failure; n_arms],
        }
    }

    pub fn n_arms(&self) -> usize {
        self.success.len()
    }
}

/// Normalize historical tallies into priors.
///
/// With `N` the total votes over all arms, arm `i` gets
/// `success_mass_i * total_weight / N + pseudo_count` (and the same for failure).
/// If there are no votes at all, every arm gets just the pseudo-count.
pub fn priors_from_tallies(tallies: &[VoteTally], cfg: PriorConfig) -> Result<Priors, ConfigError> {
    if tallies.is_empty() {
        return Err(ConfigError::NoArms);
    }
    for w in [cfg.total_weight, cfg.pseudo_count] {
        if !w.is_finite() || w < 0.0 {
            return Err(ConfigError::InvalidPriorWeight(w));
        }
    }

    let votes: u64 = tallies.iter().map(VoteTally::total).fold(0, u64::saturating_add);
    let scale = if votes == 0 {
        0.0
    } else {
        cfg.total_weight / votes as f64
    };

    let success = tallies
        .iter()
        .map(|t| t.success_mass() * scale + cfg.pseudo_count)
        .collect();
    let failure = tallies
        .iter()
        .map(|t| t.failure_mass() * scale + cfg.pseudo_count)
        .collect();
    Ok(Priors { success, failure })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(success: u64, neutral: u64, failure: u64) -> VoteTally {
        VoteTally {
            success,
            neutral,
            failure,
        }
    }

    #[test]
    fn normalizes_to_total_weight() {
        let tallies = [tally(30, 20, 10), tally(0, 0, 40)];
        let p = priors_from_tallies(&tallies, PriorConfig::default()).unwrap();
        // 100 votes total, weight 2.0 → 0.02 per vote.
        assert!((p.success[0] - (40.0 * 0.02 + 1.0)).abs() < 1e-12);
        assert!((p.failure[0] - (20.0 * 0.02 + 1.0)).abs() < 1e-12);
        assert!((p.success[1] - 1.0).abs() < 1e-12);
        assert!((p.failure[1] - (40.0 * 0.02 + 1.0)).abs() < 1e-12);

        let tally_mass: f64 = p.success.iter().chain(&p.failure).sum::<f64>() - 4.0;
        assert!((tally_mass - 2.0).abs() < 1e-12);
    }

    #[test]
    fn no_votes_gives_pseudo_counts_only() {
        let p = priors_from_tallies(&[VoteTally::default(); 3], PriorConfig::default()).unwrap();
        assert_eq!(p, Priors::uniform(3, 1.0, 1.0));
    }

    #[test]
    fn rejects_empty_and_bad_weights() {
        assert_eq!(
            priors_from_tallies(&[], PriorConfig::default()),
            Err(ConfigError::NoArms)
        );
        let cfg = PriorConfig {
            total_weight: -1.0,
            ..PriorConfig::default()
        };
        assert_eq!(
            priors_from_tallies(&[tally(1, 0, 0)], cfg),
            Err(ConfigError::InvalidPriorWeight(-1.0))
        );
    }

    #[test]
    fn neutral_splits_evenly() {
        let t = tally(0, 4, 0);
        assert_eq!(t.success_mass(), 2.0);
        assert_eq!(t.failure_mass(), 2.0);
        assert_eq!(t.total(), 4);
    }
}
