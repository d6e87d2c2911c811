//! [`GaProblem`](u_metaheur::ga::GaProblem) bridge for the depot routing
//! encoding.
//!
//! Lets the generic u-metaheur [`GaRunner`](u_metaheur::ga::GaRunner) evolve
//! the same visit-order encoding used by [`Planner`](super::Planner), with
//! the same equal split, split-point crossover and swap mutation. Useful for
//! comparing the roulette-wheel planner against the runner's own selection
//! scheme on one instance.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use u_metaheur::ga::{GaProblem, Individual};

use crate::error::PlannerError;
use crate::models::{Location, Point};

use super::chromosome::Chromosome;

/// A visit order expressed as location ids, with its cached fitness.
///
/// [`DepotGaProblem::decode`] resolves the ids into a [`Chromosome`].
#[derive(Debug, Clone)]
pub struct RouteGenome {
    ids: Vec<usize>,
    fitness: f64,
}

impl RouteGenome {
    /// Creates an unevaluated genome.
    pub fn new(ids: Vec<usize>) -> Self {
        Self {
            ids,
            fitness: f64::INFINITY,
        }
    }

    /// Location ids in visiting order.
    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if the genome has no locations.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl From<&Chromosome> for RouteGenome {
    fn from(chromosome: &Chromosome) -> Self {
        Self::new(chromosome.location_ids())
    }
}

impl Individual for RouteGenome {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

/// Depot routing instance for the u-metaheur GA runner.
///
/// # Panics
///
/// [`GaProblem`] operators cannot return errors, so `crossover` and
/// `mutate` panic with the offending ids when handed a genome that does not
/// decode to a permutation of this problem's locations. Genomes produced by
/// this problem always decode. `evaluate` scores such genomes as
/// `f64::INFINITY`.
///
/// # Examples
///
/// ```
/// use u_depot_ga::ga::DepotGaProblem;
/// use u_depot_ga::models::{Location, Point};
/// use u_metaheur::ga::{GaConfig, GaRunner};
///
/// let locations: Vec<Location> = (0..6)
///     .map(|i| Location::new(i, (i + 1) as f64, 0.0))
///     .collect();
/// let problem = DepotGaProblem::new(locations, vec![Point::new(0.0, 0.0)]).unwrap();
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_max_generations(30);
///
/// let result = GaRunner::run(&problem, &config).expect("GA run");
/// assert!(result.best_fitness < f64::INFINITY);
/// ```
#[derive(Debug, Clone)]
pub struct DepotGaProblem {
    locations: Vec<Location>,
    by_id: HashMap<usize, Location>,
    depots: Vec<Point>,
}

impl DepotGaProblem {
    /// Creates a problem over `locations` served from `depots`.
    pub fn new(locations: Vec<Location>, depots: Vec<Point>) -> Result<Self, PlannerError> {
        // Rejects empty inputs and duplicate ids up front.
        Chromosome::new(locations.clone(), depots.clone())?;
        let by_id = locations.iter().map(|l| (l.id(), *l)).collect();
        Ok(Self {
            locations,
            by_id,
            depots,
        })
    }

    /// Decodes a genome into a chromosome.
    pub fn decode(&self, genome: &RouteGenome) -> Result<Chromosome, PlannerError> {
        let order = genome
            .ids()
            .iter()
            .map(|id| {
                self.by_id.get(id).copied().ok_or_else(|| {
                    PlannerError::configuration(format!("unknown location id {id}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let chromosome = Chromosome::new(order, self.depots.clone())?;
        if chromosome.len() != self.locations.len() {
            return Err(PlannerError::InvariantViolation {
                operator: "decode",
                order: format!("{:?}", genome.ids()),
            });
        }
        Ok(chromosome)
    }
}

impl GaProblem for DepotGaProblem {
    type Individual = RouteGenome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> RouteGenome {
        let mut ids: Vec<usize> = self.locations.iter().map(Location::id).collect();
        ids.shuffle(rng);
        RouteGenome::new(ids)
    }

    fn evaluate(&self, individual: &RouteGenome) -> f64 {
        self.decode(individual)
            .map(|c| c.total_distance())
            .unwrap_or(f64::INFINITY)
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &RouteGenome,
        parent2: &RouteGenome,
        rng: &mut R,
    ) -> Vec<RouteGenome> {
        let (first, second) = self
            .decode(parent1)
            .and_then(|a| Ok((a, self.decode(parent2)?)))
            .and_then(|(a, b)| a.crossover(&b, rng))
            .unwrap_or_else(|err| {
                panic!(
                    "crossover of {:?} and {:?} failed: {err}",
                    parent1.ids(),
                    parent2.ids()
                )
            });
        vec![RouteGenome::from(&first), RouteGenome::from(&second)]
    }

    fn mutate<R: Rng>(&self, individual: &mut RouteGenome, rng: &mut R) {
        let mutated = self
            .decode(individual)
            .and_then(|c| c.mutate(rng))
            .unwrap_or_else(|err| panic!("mutation of {:?} failed: {err}", individual.ids()));
        *individual = RouteGenome::from(&mutated);
    }
}
