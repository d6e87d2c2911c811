//! Operator choice and roulette-wheel selection.
//!
//! Selection works on distances, where lower is better. Each candidate is
//! weighted by `1.1 * max_distance - distance`, so the shortest routes get
//! the largest slice of the wheel while the longest still keeps a slice of
//! `0.1 * max_distance`.

use rand::Rng;

use crate::error::PlannerError;
use crate::random::weighted_index;

/// Multiplier applied to the worst distance before subtracting each
/// candidate's distance.
pub const WORST_DISTANCE_SHIFT: f64 = 1.1;

/// Genetic operator applied to produce offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneticOperator {
    /// Two parents, two children.
    Crossover,
    /// One parent, one child.
    Mutation,
}

impl GeneticOperator {
    /// Draws [`Crossover`](Self::Crossover) with probability
    /// `crossover_probability`, otherwise [`Mutation`](Self::Mutation).
    pub fn draw<R: Rng>(crossover_probability: f64, rng: &mut R) -> Result<Self, PlannerError> {
        let probabilities = [crossover_probability, 1.0 - crossover_probability];
        match weighted_index(&probabilities, rng)? {
            0 => Ok(Self::Crossover),
            _ => Ok(Self::Mutation),
        }
    }
}

/// Computes roulette weights from distances.
///
/// Every weight is strictly positive as long as the largest distance is.
/// When all distances are zero the weights fall back to uniform.
///
/// # Examples
///
/// ```
/// use u_depot_ga::ga::roulette_weights;
///
/// let w = roulette_weights(&[1.0, 2.0, 10.0]).unwrap();
/// assert!(w[0] > w[1] && w[1] > w[2] && w[2] > 0.0);
/// ```
pub fn roulette_weights(distances: &[f64]) -> Result<Vec<f64>, PlannerError> {
    if distances.is_empty() {
        return Err(PlannerError::sampling("no candidates to select from"));
    }
    if let Some(bad) = distances.iter().find(|d| !d.is_finite() || **d < 0.0) {
        return Err(PlannerError::sampling(format!(
            "invalid distance {bad} among candidates"
        )));
    }

    let max_distance = distances.iter().copied().fold(0.0, f64::max);
    if max_distance <= 0.0 {
        tracing::warn!(
            num_candidates = distances.len(),
            "All distances are zero, selecting uniformly"
        );
        return Ok(vec![1.0; distances.len()]);
    }

    Ok(distances
        .iter()
        .map(|d| WORST_DISTANCE_SHIFT * max_distance - d)
        .collect())
}

/// A roulette wheel built once for a population and spun many times.
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    probabilities: Vec<f64>,
}

impl RouletteWheel {
    /// Builds the wheel from candidate distances.
    pub fn from_distances(distances: &[f64]) -> Result<Self, PlannerError> {
        let weights = roulette_weights(distances)?;
        let total: f64 = weights.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(PlannerError::sampling(format!(
                "roulette weights sum to {total}"
            )));
        }
        Ok(Self {
            probabilities: weights.iter().map(|w| w / total).collect(),
        })
    }

    /// Selection probability of each candidate.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Number of candidates on the wheel.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Returns `true` if the wheel has no candidates.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Selects one candidate index.
    pub fn spin<R: Rng>(&self, rng: &mut R) -> Result<usize, PlannerError> {
        weighted_index(&self.probabilities, rng)
    }

    /// Selects `count` candidate indices with replacement.
    pub fn spin_many<R: Rng>(&self, count: usize, rng: &mut R) -> Result<Vec<usize>, PlannerError> {
        (0..count).map(|_| self.spin(rng)).collect()
    }
}
