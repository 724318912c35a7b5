//! `caption_bandit`: seedable Thompson sampling for choosing which caption to show.
//!
//! Designed for "arm selection" problems where each arm is a caption, each request
//! shows one, and a vote comes back afterwards. Priors come from historical vote
//! tallies; live votes accumulate on top of them.
//!
//! An [`Outcome`] is one of:
//! - `Success`: the vote counts fully toward the arm.
//! - `Neutral`: half a success and half a failure.
//! - `Failure`: the vote counts fully against the arm.
//!
//! Binary campaigns simply never emit `Neutral`.
//!
//! **Goals:**
//! - **Deterministic under a seed**: the model owns its random source, so a fixed seed
//!   reproduces selections (and, in simulation, sampled outcomes) bit-for-bit.
//! - **Interchangeable posteriors**: [`Family::Beta`], [`Family::Triangular`], and
//!   [`Family::Normal`] share one selection rule (argmax of one draw per arm).
//! - **Validate up front**: every constructor rejects configurations that would make
//!   a posterior unsampleable; per-call errors never leave partial updates behind.
//!
//! **Pieces:**
//! - [`Bandit`]: per-arm counters, [`Bandit::select_arm`], [`Bandit::register_outcome`],
//!   and the reporting means.
//! - [`priors_from_tallies`] / [`PriorConfig`]: normalize historical tallies into priors.
//! - [`Simulation`] / [`simulate_batch`]: offline regret and convergence checks
//!   against a [`GroundTruth`].
//!
//! **Non-goals:**
//! - No storage, HTTP, sessions, or templating. Callers persist counters between
//!   requests and guarantee exactly-once delivery of each vote.
//! - No internal locking; one writer per bandit instance.
//!
//! # Example
//!
//! ```rust
//! use caption_bandit::{Bandit, Family, Outcome};
//!
//! let mut bandit =
//!     Bandit::with_seed(3, &[5.0, 1.0, 10.0], &[1.0, 4.0, 10.0], Family::Beta, 7).unwrap();
//! let arm = bandit.select_arm();
//! bandit.register_outcome(arm, Outcome::Success).unwrap();
//! assert_eq!(bandit.pulled().iter().sum::<u64>(), 1);
//! ```

#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod posterior;
pub use posterior::*;

mod family;
pub use family::*;

mod thompson;
pub use thompson::*;

mod prior;
pub use prior::*;

mod harness;
pub use harness::*;
