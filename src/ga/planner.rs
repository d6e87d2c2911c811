//! Generational loop of the delivery route planner.
//!
//! # Algorithm
//!
//! Each generation:
//!
//! 1. **Offspring**: until the offspring target is reached, draw crossover
//!    with probability `p` (mutation otherwise), pick parents from the
//!    current population by roulette wheel and apply the operator. Surplus
//!    children from a final crossover are dropped.
//! 2. **Survivors**: draw `N` chromosomes with replacement from
//!    offspring ∪ population using the same roulette weighting.
//! 3. **Logging**: hand the survivors' distances to the metrics sink.
//!
//! The run stops after a fixed number of generations.

use std::collections::HashSet;

use rand::Rng;
use tracing::instrument;

use crate::error::PlannerError;
use crate::metrics::{GenerationRecord, GenerationSummary, MetricsSink};
use crate::models::{Location, Point};
use crate::random::uniform_int;

use super::chromosome::Chromosome;
use super::config::PlannerConfig;
use super::selection::{GeneticOperator, RouletteWheel};

/// Lifecycle of a [`Planner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerState {
    /// Initial population built, no generation run yet.
    Initialized,
    /// Breeding offspring for the current generation.
    GeneratingOffspring,
    /// Drawing survivors from offspring and parents.
    SelectingSurvivors,
    /// Reporting the new generation. Held between generations until the
    /// next [`Planner::step`].
    Logging,
    /// Generation budget exhausted.
    Terminated,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// Shortest chromosome of the final population.
    pub best: Chromosome,
    /// Its total distance.
    pub best_distance: f64,
    /// Number of generations run.
    pub generations: usize,
}

/// Evolves a population of route chromosomes toward shorter total distance.
///
/// The planner owns its random number generator; seeding it makes a run
/// reproducible.
///
/// # Examples
///
/// ```
/// use u_depot_ga::ga::{Planner, PlannerConfig};
/// use u_depot_ga::metrics::MetricsLog;
/// use u_depot_ga::random::seeded_rng;
///
/// let config = PlannerConfig::default()
///     .with_population_size(6)
///     .with_location_count(10)
///     .with_depots(vec![[0.0, 0.0]])
///     .with_crossover_probability(0.5)
///     .with_max_generations(20);
///
/// let mut planner = Planner::new(config, seeded_rng(42)).unwrap();
/// let mut log = MetricsLog::new();
/// let outcome = planner.run(&mut log).unwrap();
///
/// assert_eq!(log.len(), 20);
/// assert_eq!(outcome.generations, 20);
/// assert!(outcome.best_distance > 0.0);
/// ```
#[derive(Debug)]
pub struct Planner<R> {
    config: PlannerConfig,
    locations: Vec<Location>,
    depots: Vec<Point>,
    population: Vec<Chromosome>,
    generation: usize,
    state: PlannerState,
    rng: R,
}

impl<R: Rng> Planner<R> {
    /// Samples `location_count` distinct grid locations and builds the
    /// initial population.
    pub fn new(config: PlannerConfig, mut rng: R) -> Result<Self, PlannerError> {
        config.validate()?;
        let depots = config.depot_points();
        let locations = sample_locations(config.location_count, config.grid_extent, &depots, &mut rng)?;
        Self::build(config, locations, depots, rng)
    }

    /// Builds the initial population over caller-supplied locations.
    ///
    /// `config.location_count` is replaced by the number of locations given.
    pub fn from_locations(
        config: PlannerConfig,
        locations: Vec<Location>,
        rng: R,
    ) -> Result<Self, PlannerError> {
        let config = config.with_location_count(locations.len());
        config.validate()?;
        let depots = config.depot_points();
        Self::build(config, locations, depots, rng)
    }

    fn build(
        config: PlannerConfig,
        locations: Vec<Location>,
        depots: Vec<Point>,
        mut rng: R,
    ) -> Result<Self, PlannerError> {
        let population = (0..config.population_size)
            .map(|_| Chromosome::random(&locations, &depots, &mut rng))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(
            population_size = config.population_size,
            locations = locations.len(),
            vehicles = depots.len(),
            "Planner initialized"
        );

        Ok(Self {
            config,
            locations,
            depots,
            population,
            generation: 0,
            state: PlannerState::Initialized,
            rng,
        })
    }

    /// Configuration of this run.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Delivery locations in canonical (id) order.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Depot of each vehicle.
    pub fn depots(&self) -> &[Point] {
        &self.depots
    }

    /// Current population.
    pub fn population(&self) -> &[Chromosome] {
        &self.population
    }

    /// Number of generations completed.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PlannerState {
        self.state
    }

    /// Returns `true` once the generation budget is exhausted.
    pub fn is_terminated(&self) -> bool {
        self.state == PlannerState::Terminated
    }

    /// Total distance of each chromosome in the current population.
    pub fn distances(&self) -> Vec<f64> {
        self.population.iter().map(Chromosome::total_distance).collect()
    }

    /// Shortest chromosome of the current population.
    pub fn best(&self) -> Option<&Chromosome> {
        self.population
            .iter()
            .map(|c| (c, c.total_distance()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(c, _)| c)
    }

    /// Breeds the configured number of offspring from the current population.
    pub fn generate_offspring(&mut self) -> Result<Vec<Chromosome>, PlannerError> {
        self.state = PlannerState::GeneratingOffspring;
        let target = self.config.offspring_count();
        let wheel = RouletteWheel::from_distances(&self.distances())?;
        let mut offspring = Vec::with_capacity(target + 1);

        while offspring.len() < target {
            let operator = GeneticOperator::draw(self.config.crossover_probability, &mut self.rng)?;
            let parent = &self.population[wheel.spin(&mut self.rng)?];
            match operator {
                GeneticOperator::Crossover => {
                    let other = &self.population[wheel.spin(&mut self.rng)?];
                    let (first, second) = parent.crossover(other, &mut self.rng)?;
                    offspring.push(first);
                    offspring.push(second);
                }
                GeneticOperator::Mutation => {
                    offspring.push(parent.mutate(&mut self.rng)?);
                }
            }
        }

        offspring.truncate(target);
        Ok(offspring)
    }

    /// Draws a new population of `N` from `pool` by roulette wheel, with
    /// replacement.
    pub fn select_survivors(&mut self, pool: &[Chromosome]) -> Result<Vec<Chromosome>, PlannerError> {
        self.state = PlannerState::SelectingSurvivors;
        let distances: Vec<f64> = pool.iter().map(Chromosome::total_distance).collect();
        let wheel = RouletteWheel::from_distances(&distances)?;
        Ok(wheel
            .spin_many(self.config.population_size, &mut self.rng)?
            .into_iter()
            .map(|i| pool[i].clone())
            .collect())
    }

    /// Runs one generation and reports it to `sink`.
    #[instrument(level = "debug", skip(self, sink), fields(generation = self.generation))]
    pub fn step<S: MetricsSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), PlannerError> {
        if self.is_terminated() {
            return Err(PlannerError::configuration(format!(
                "generation budget of {} exhausted",
                self.config.max_generations
            )));
        }

        let mut pool = self.generate_offspring()?;
        pool.extend_from_slice(&self.population);
        self.population = self.select_survivors(&pool)?;

        self.state = PlannerState::Logging;
        let record = GenerationRecord::from_distances(self.generation, self.distances());
        if let Some(summary) = GenerationSummary::of(&record) {
            tracing::debug!(
                best = summary.min,
                mean = summary.mean,
                worst = summary.max,
                "Generation complete"
            );
        }
        sink.record(record);

        self.generation += 1;
        self.state = if self.generation >= self.config.max_generations {
            PlannerState::Terminated
        } else {
            PlannerState::Logging
        };
        Ok(())
    }

    /// Runs all remaining generations.
    #[instrument(level = "debug", skip(self, sink), fields(max_generations = self.config.max_generations))]
    pub fn run<S: MetricsSink + ?Sized>(&mut self, sink: &mut S) -> Result<PlanOutcome, PlannerError> {
        tracing::info!(
            crossover_probability = self.config.crossover_probability,
            "Starting genetic search"
        );

        while !self.is_terminated() {
            self.step(sink)?;
        }

        let best = self
            .best()
            .cloned()
            .ok_or_else(|| PlannerError::configuration("population is empty"))?;
        let best_distance = best.total_distance();
        tracing::info!(
            generations = self.generation,
            best_distance,
            "Genetic search finished"
        );

        Ok(PlanOutcome {
            best,
            best_distance,
            generations: self.generation,
        })
    }
}

/// Samples `count` distinct locations on the integer grid `[0, extent]²`,
/// avoiding grid cells occupied by depots.
///
/// Location ids are assigned in sampling order, starting at zero.
pub fn sample_locations<R: Rng>(
    count: usize,
    extent: u32,
    depots: &[Point],
    rng: &mut R,
) -> Result<Vec<Location>, PlannerError> {
    let extent = i64::from(extent);
    let mut occupied: HashSet<(i64, i64)> = depots
        .iter()
        .filter(|d| d.x.fract() == 0.0 && d.y.fract() == 0.0)
        .map(|d| (d.x as i64, d.y as i64))
        .filter(|(x, y)| (0..=extent).contains(x) && (0..=extent).contains(y))
        .collect();

    let cells = (extent + 1).saturating_mul(extent + 1);
    let free = cells.saturating_sub(occupied.len() as i64);
    if (count as i64) > free {
        return Err(PlannerError::configuration(format!(
            "grid [0, {extent}]² has {free} free cells for {count} locations"
        )));
    }

    let mut locations = Vec::with_capacity(count);
    while locations.len() < count {
        let cell = (uniform_int(0, extent, rng)?, uniform_int(0, extent, rng)?);
        if occupied.insert(cell) {
            locations.push(Location::new(locations.len(), cell.0 as f64, cell.1 as f64));
        }
    }
    Ok(locations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsLog;
    use crate::random::seeded_rng;

    fn small_config() -> PlannerConfig {
        PlannerConfig::default()
            .with_population_size(6)
            .with_location_count(10)
            .with_depots(vec![[0.0, 0.0]])
            .with_crossover_probability(0.5)
            .with_max_generations(20)
    }

    fn sorted_ids(c: &Chromosome) -> Vec<usize> {
        let mut ids = c.location_ids();
        ids.sort();
        ids
    }

    #[test]
    fn test_sample_locations_distinct_and_off_depots() {
        let depots = vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)];
        let mut rng = seeded_rng(4);
        let locations = sample_locations(14, 3, &depots, &mut rng).expect("fits grid");
        assert_eq!(locations.len(), 14);
        let cells: HashSet<(i64, i64)> = locations
            .iter()
            .map(|l| (l.position().x as i64, l.position().y as i64))
            .collect();
        assert_eq!(cells.len(), 14);
        assert!(!cells.contains(&(1, 1)));
        assert!(!cells.contains(&(2, 2)));
        assert_eq!(
            locations.iter().map(Location::id).collect::<Vec<_>>(),
            (0..14).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_sample_locations_grid_too_small() {
        let mut rng = seeded_rng(4);
        let depots = vec![Point::new(0.0, 0.0)];
        assert!(matches!(
            sample_locations(4, 1, &depots, &mut rng),
            Err(PlannerError::Configuration(_))
        ));
        assert!(sample_locations(3, 1, &depots, &mut rng).is_ok());
    }

    #[test]
    fn test_initial_population() {
        let planner = Planner::new(small_config(), seeded_rng(1)).expect("valid");
        assert_eq!(planner.state(), PlannerState::Initialized);
        assert_eq!(planner.population().len(), 6);
        assert_eq!(planner.locations().len(), 10);
        for c in planner.population() {
            assert_eq!(sorted_ids(c), (0..10).collect::<Vec<_>>());
            assert_eq!(c.depots(), &[Point::new(0.0, 0.0)]);
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = small_config().with_population_size(0);
        assert!(matches!(
            Planner::new(config, seeded_rng(1)),
            Err(PlannerError::Configuration(_))
        ));
    }

    #[test]
    fn test_from_locations_overrides_count() {
        let locations: Vec<Location> = (0..4).map(|i| Location::new(i, i as f64, 1.0)).collect();
        let planner =
            Planner::from_locations(small_config(), locations, seeded_rng(2)).expect("valid");
        assert_eq!(planner.config().location_count, 4);
        assert_eq!(planner.population()[0].len(), 4);
    }

    #[test]
    fn test_generate_offspring_count() {
        let mut planner = Planner::new(small_config(), seeded_rng(3)).expect("valid");
        let offspring = planner.generate_offspring().expect("valid");
        assert_eq!(offspring.len(), 6);
        assert_eq!(planner.state(), PlannerState::GeneratingOffspring);
        for c in &offspring {
            assert_eq!(sorted_ids(c), (0..10).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_generate_offspring_truncates_crossover_surplus() {
        let config = small_config()
            .with_population_size(5)
            .with_crossover_probability(1.0);
        let mut planner = Planner::new(config, seeded_rng(3)).expect("valid");
        assert_eq!(planner.generate_offspring().expect("valid").len(), 5);
    }

    #[test]
    fn test_double_offspring_target() {
        let config = small_config()
            .with_offspring_target(crate::ga::OffspringTarget::DoublePopulation);
        let mut planner = Planner::new(config, seeded_rng(3)).expect("valid");
        assert_eq!(planner.generate_offspring().expect("valid").len(), 12);
    }

    #[test]
    fn test_select_survivors_size() {
        let mut planner = Planner::new(small_config(), seeded_rng(5)).expect("valid");
        let mut pool = planner.generate_offspring().expect("valid");
        pool.extend_from_slice(planner.population());
        let survivors = planner.select_survivors(&pool).expect("valid");
        assert_eq!(survivors.len(), 6);
        assert!(survivors.iter().all(|s| pool.contains(s)));
    }

    #[test]
    fn test_step_records_generation() {
        let mut planner = Planner::new(small_config(), seeded_rng(6)).expect("valid");
        let mut log = MetricsLog::new();
        planner.step(&mut log).expect("valid");
        assert_eq!(planner.generation(), 1);
        assert_eq!(log.len(), 1);
        let record = &log.records()[0];
        assert_eq!(record.generation, 0);
        assert_eq!(record.entries.len(), 6);
        assert_eq!(record.distances().collect::<Vec<_>>(), planner.distances());
    }

    #[test]
    fn test_state_transitions() {
        let config = small_config().with_max_generations(2);
        let mut planner = Planner::new(config, seeded_rng(6)).expect("valid");
        let mut log = MetricsLog::new();
        assert_eq!(planner.state(), PlannerState::Initialized);

        planner.step(&mut log).expect("valid");
        assert_eq!(planner.state(), PlannerState::Logging);
        assert!(!planner.is_terminated());

        planner.generate_offspring().expect("valid");
        assert_eq!(planner.state(), PlannerState::GeneratingOffspring);

        planner.step(&mut log).expect("valid");
        assert_eq!(planner.state(), PlannerState::Terminated);
        assert_eq!(planner.generation(), 2);
    }

    #[test]
    fn test_run_terminates_after_budget() {
        let mut planner = Planner::new(small_config(), seeded_rng(7)).expect("valid");
        let mut log = MetricsLog::new();
        let outcome = planner.run(&mut log).expect("valid");
        assert_eq!(outcome.generations, 20);
        assert_eq!(log.len(), 20);
        assert!(planner.is_terminated());
        assert!(matches!(
            planner.step(&mut log),
            Err(PlannerError::Configuration(_))
        ));
        let best = planner.best().expect("non-empty");
        assert!((best.total_distance() - outcome.best_distance).abs() < 1e-10);
        assert!(planner
            .distances()
            .iter()
            .all(|d| *d >= outcome.best_distance - 1e-10));
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let mut first = MetricsLog::new();
        let mut second = MetricsLog::new();
        Planner::new(small_config(), seeded_rng(99))
            .expect("valid")
            .run(&mut first)
            .expect("valid");
        Planner::new(small_config(), seeded_rng(99))
            .expect("valid")
            .run(&mut second)
            .expect("valid");
        assert_eq!(first, second);
    }

    #[test]
    fn test_multi_depot_run() {
        let config = PlannerConfig::default()
            .with_population_size(8)
            .with_max_generations(10);
        let mut planner = Planner::new(config, seeded_rng(8)).expect("valid");
        let mut log = MetricsLog::new();
        let outcome = planner.run(&mut log).expect("valid");
        assert_eq!(outcome.best.num_vehicles(), 2);
        assert_eq!(outcome.best.len(), 45);
        assert!(outcome.best_distance > 0.0);
    }
}
