//! Planner configuration.

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::models::Point;

/// How many offspring are bred per generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffspringTarget {
    /// `N` offspring; survivors are drawn from a pool of `2N`.
    #[default]
    Population,
    /// `2N` offspring; survivors are drawn from a pool of `3N`.
    DoublePopulation,
}

impl OffspringTarget {
    /// Number of offspring for a population of `population_size`.
    pub fn count(&self, population_size: usize) -> usize {
        match self {
            Self::Population => population_size,
            Self::DoublePopulation => 2 * population_size,
        }
    }
}

/// Parameters of a planning run. Read once at startup.
///
/// Missing fields fall back to [`PlannerConfig::default`] when
/// deserializing.
///
/// # Examples
///
/// ```
/// use u_depot_ga::ga::PlannerConfig;
///
/// let config = PlannerConfig::default()
///     .with_population_size(6)
///     .with_location_count(10)
///     .with_depots(vec![[0.0, 0.0]])
///     .with_crossover_probability(0.5)
///     .with_max_generations(20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Number of chromosomes kept per generation.
    pub population_size: usize,
    /// Number of delivery locations.
    pub location_count: usize,
    /// One depot per vehicle, as `[x, y]`.
    pub depots: Vec<[f64; 2]>,
    /// Probability of choosing crossover over mutation.
    pub crossover_probability: f64,
    /// Number of generations to run.
    pub max_generations: usize,
    /// Locations are sampled on the integer grid `[0, grid_extent]²`.
    pub grid_extent: u32,
    /// Offspring bred per generation.
    pub offspring_target: OffspringTarget,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            location_count: 45,
            depots: vec![[10.0, 5.0], [25.0, 30.0]],
            crossover_probability: 0.1,
            max_generations: 400,
            grid_extent: 35,
            offspring_target: OffspringTarget::Population,
        }
    }
}

impl PlannerConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the number of delivery locations.
    pub fn with_location_count(mut self, count: usize) -> Self {
        self.location_count = count;
        self
    }

    /// Sets the depots, one per vehicle.
    pub fn with_depots(mut self, depots: Vec<[f64; 2]>) -> Self {
        self.depots = depots;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p;
        self
    }

    /// Sets the generation budget.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the sampling grid extent.
    pub fn with_grid_extent(mut self, extent: u32) -> Self {
        self.grid_extent = extent;
        self
    }

    /// Sets the number of offspring bred per generation.
    pub fn with_offspring_target(mut self, target: OffspringTarget) -> Self {
        self.offspring_target = target;
        self
    }

    /// Depots as points.
    pub fn depot_points(&self) -> Vec<Point> {
        self.depots.iter().copied().map(Point::from).collect()
    }

    /// Number of offspring bred per generation.
    pub fn offspring_count(&self) -> usize {
        self.offspring_target.count(self.population_size)
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, PlannerError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PlannerError::configuration(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration describes a runnable problem.
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.population_size == 0 {
            return Err(PlannerError::configuration(
                "population size must be positive",
            ));
        }
        if self.location_count == 0 {
            return Err(PlannerError::configuration(
                "location count must be positive",
            ));
        }
        if self.depots.is_empty() {
            return Err(PlannerError::configuration("at least one depot is required"));
        }
        if self.depots.len() > self.location_count {
            return Err(PlannerError::configuration(format!(
                "{} depots cannot share {} locations",
                self.depots.len(),
                self.location_count
            )));
        }
        if let Some(depot) = self.depot_points().iter().find(|p| !p.is_finite()) {
            return Err(PlannerError::configuration(format!(
                "depot ({}, {}) is not finite",
                depot.x, depot.y
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(PlannerError::configuration(format!(
                "crossover probability {} outside [0, 1]",
                self.crossover_probability
            )));
        }
        if self.max_generations == 0 {
            return Err(PlannerError::configuration(
                "generation budget must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let c = PlannerConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.depot_points().len(), 2);
        assert_eq!(c.offspring_count(), 10);
    }

    #[test]
    fn test_offspring_target() {
        let c = PlannerConfig::default()
            .with_population_size(4)
            .with_offspring_target(OffspringTarget::DoublePopulation);
        assert_eq!(c.offspring_count(), 8);
    }

    #[test]
    fn test_validate_rejects() {
        let base = PlannerConfig::default();
        let cases = vec![
            base.clone().with_population_size(0),
            base.clone().with_location_count(0),
            base.clone().with_depots(vec![]),
            base.clone().with_location_count(1),
            base.clone().with_depots(vec![[f64::NAN, 0.0]]),
            base.clone().with_crossover_probability(1.1),
            base.clone().with_crossover_probability(-0.1),
            base.clone().with_crossover_probability(f64::NAN),
            base.clone().with_max_generations(0),
        ];
        for c in cases {
            assert!(
                matches!(c.validate(), Err(PlannerError::Configuration(_))),
                "{c:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_json_partial() {
        let c = PlannerConfig::from_json(
            r#"{ "population_size": 6, "depots": [[0, 0]], "offspring_target": "double_population" }"#,
        )
        .expect("valid");
        assert_eq!(c.population_size, 6);
        assert_eq!(c.depots, vec![[0.0, 0.0]]);
        assert_eq!(c.location_count, 45);
        assert_eq!(c.offspring_target, OffspringTarget::DoublePopulation);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(PlannerConfig::from_json("{ not json").is_err());
        assert!(PlannerConfig::from_json(r#"{ "population_size": 0 }"#).is_err());
    }
}
