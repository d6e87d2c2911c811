//! Random-source helpers used by the planner.
//!
//! Everything takes an explicit `rng` so that a run seeded through
//! [`seeded_rng`] is fully reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::PlannerError;

/// Tolerance used when checking that probabilities sum to one.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Creates a deterministic random number generator from a seed.
///
/// # Examples
///
/// ```
/// use rand::Rng;
/// use u_depot_ga::random::seeded_rng;
///
/// let a: u64 = seeded_rng(7).random();
/// let b: u64 = seeded_rng(7).random();
/// assert_eq!(a, b);
/// ```
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draws an integer uniformly from the inclusive range `[lo, hi]`.
pub fn uniform_int<R: Rng>(lo: i64, hi: i64, rng: &mut R) -> Result<i64, PlannerError> {
    if lo > hi {
        return Err(PlannerError::sampling(format!(
            "empty integer range [{lo}, {hi}]"
        )));
    }
    Ok(rng.random_range(lo..=hi))
}

/// Draws an index from a categorical distribution.
///
/// `probabilities` must be non-empty, contain only finite non-negative
/// entries and sum to one within [`PROBABILITY_TOLERANCE`].
///
/// # Examples
///
/// ```
/// use u_depot_ga::random::{seeded_rng, weighted_index};
///
/// let mut rng = seeded_rng(1);
/// let idx = weighted_index(&[0.0, 1.0, 0.0], &mut rng).unwrap();
/// assert_eq!(idx, 1);
/// ```
pub fn weighted_index<R: Rng>(probabilities: &[f64], rng: &mut R) -> Result<usize, PlannerError> {
    if probabilities.is_empty() {
        return Err(PlannerError::sampling("empty probability vector"));
    }
    if let Some(bad) = probabilities.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(PlannerError::sampling(format!(
            "invalid probability {bad} in {probabilities:?}"
        )));
    }
    let total: f64 = probabilities.iter().sum();
    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(PlannerError::sampling(format!(
            "probabilities sum to {total}, expected 1"
        )));
    }

    let spin: f64 = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (index, &p) in probabilities.iter().enumerate() {
        if p > 0.0 {
            last_positive = index;
        }
        cumulative += p;
        if p > 0.0 && spin < cumulative {
            return Ok(index);
        }
    }

    // Rounding can leave `spin` just above the final cumulative sum.
    Ok(last_positive)
}

/// Samples `k` distinct items uniformly without replacement.
///
/// The returned items keep the order in which they were drawn.
pub fn sample_without_replacement<T: Clone, R: Rng>(
    items: &[T],
    k: usize,
    rng: &mut R,
) -> Result<Vec<T>, PlannerError> {
    if k > items.len() {
        return Err(PlannerError::sampling(format!(
            "cannot sample {k} items from {}",
            items.len()
        )));
    }
    Ok(rand::seq::index::sample(rng, items.len(), k)
        .into_iter()
        .map(|i| items[i].clone())
        .collect())
}
