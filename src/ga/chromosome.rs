//! Route chromosome for multi-depot delivery planning.
//!
//! A chromosome stores every delivery location exactly once, in visiting
//! order, together with one depot per vehicle. The visit order is cut into
//! contiguous vehicle segments by [`equal_split`](super::equal_split): each
//! vehicle leaves its depot, serves its segment in order and returns.
//!
//! Operators never modify a chromosome in place; [`Chromosome::mutate`] and
//! [`Chromosome::crossover`] build new chromosomes and check that their visit
//! order is still a permutation of the parent's locations.

use std::collections::{HashMap, HashSet};
use std::fmt;

use rand::Rng;

use crate::error::PlannerError;
use crate::models::{Location, Point};
use crate::random::sample_without_replacement;

use super::split::{equal_split, RouteBounds};

/// A candidate solution: a visit order over all locations plus the
/// per-vehicle partition of that order.
///
/// # Examples
///
/// ```
/// use u_depot_ga::ga::Chromosome;
/// use u_depot_ga::models::{Location, Point};
///
/// let order = vec![
///     Location::new(0, 1.0, 0.0),
///     Location::new(1, 2.0, 0.0),
///     Location::new(2, 3.0, 0.0),
/// ];
/// let chromosome = Chromosome::new(order, vec![Point::new(0.0, 0.0)]).unwrap();
/// // 0→1→2→3→0
/// assert!((chromosome.total_distance() - 6.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Chromosome {
    visit_order: Vec<Location>,
    depots: Vec<Point>,
    route_bounds: Vec<RouteBounds>,
}

impl Chromosome {
    /// Creates a chromosome from a visit order and one depot per vehicle.
    ///
    /// Fails if there are no depots, no locations, more depots than
    /// locations, or if a location id appears more than once.
    pub fn new(visit_order: Vec<Location>, depots: Vec<Point>) -> Result<Self, PlannerError> {
        let mut seen = HashSet::with_capacity(visit_order.len());
        if let Some(dup) = visit_order.iter().find(|l| !seen.insert(l.id())) {
            return Err(PlannerError::configuration(format!(
                "location id {} appears more than once",
                dup.id()
            )));
        }
        Self::build(visit_order, depots)
    }

    /// Creates a chromosome whose visit order is a uniformly random
    /// permutation of `locations`.
    pub fn random<R: Rng>(
        locations: &[Location],
        depots: &[Point],
        rng: &mut R,
    ) -> Result<Self, PlannerError> {
        let order = sample_without_replacement(locations, locations.len(), rng)?;
        Self::new(order, depots.to_vec())
    }

    fn build(visit_order: Vec<Location>, depots: Vec<Point>) -> Result<Self, PlannerError> {
        let route_bounds = equal_split(visit_order.len(), depots.len())?;
        Ok(Self {
            visit_order,
            depots,
            route_bounds,
        })
    }

    /// Locations in visiting order.
    pub fn visit_order(&self) -> &[Location] {
        &self.visit_order
    }

    /// Depot of each vehicle.
    pub fn depots(&self) -> &[Point] {
        &self.depots
    }

    /// Segment of the visit order served by each vehicle.
    pub fn route_bounds(&self) -> &[RouteBounds] {
        &self.route_bounds
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.visit_order.len()
    }

    /// Returns `true` if there are no locations. Never true for a
    /// constructed chromosome.
    pub fn is_empty(&self) -> bool {
        self.visit_order.is_empty()
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.depots.len()
    }

    /// Location ids in visiting order.
    pub fn location_ids(&self) -> Vec<usize> {
        self.visit_order.iter().map(Location::id).collect()
    }

    /// Each vehicle's depot paired with the locations it serves.
    pub fn routes(&self) -> impl Iterator<Item = (&Point, &[Location])> {
        self.depots
            .iter()
            .zip(&self.route_bounds)
            .map(move |(depot, b)| (depot, &self.visit_order[b.range()]))
    }

    /// Distance of a single vehicle route: depot to first location, along
    /// the segment, and back from the last location to the depot.
    pub fn route_distance(depot: &Point, route: &[Location]) -> f64 {
        let (Some(first), Some(last)) = (route.first(), route.last()) else {
            return 0.0;
        };
        let inner: f64 = route
            .windows(2)
            .map(|w| w[0].distance_to(w[1].position()))
            .sum();
        first.distance_to(depot) + inner + last.distance_to(depot)
    }

    /// Total distance driven by all vehicles.
    pub fn total_distance(&self) -> f64 {
        self.routes()
            .map(|(depot, route)| Self::route_distance(depot, route))
            .sum()
    }

    /// Fitness used for selection. Lower is better; equal to
    /// [`total_distance`](Self::total_distance).
    pub fn fitness(&self) -> f64 {
        self.total_distance()
    }

    /// Returns `true` if `order` contains every location of this chromosome
    /// exactly once and nothing else.
    pub fn is_valid_order(&self, order: &[Location]) -> bool {
        if order.len() != self.visit_order.len() {
            return false;
        }
        let canonical: HashMap<usize, &Location> =
            self.visit_order.iter().map(|l| (l.id(), l)).collect();
        let mut seen = HashSet::with_capacity(order.len());
        order.iter().all(|l| {
            canonical.get(&l.id()).is_some_and(|c| *c == l) && seen.insert(l.id())
        })
    }

    /// Swaps the locations at positions `i` and `j`.
    ///
    /// Applying the same swap twice restores the original visit order.
    pub fn swap(&self, i: usize, j: usize) -> Result<Self, PlannerError> {
        let n = self.len();
        if i >= n || j >= n {
            return Err(PlannerError::configuration(format!(
                "swap positions ({i}, {j}) out of bounds for {n} locations"
            )));
        }
        let mut order = self.visit_order.clone();
        order.swap(i, j);
        self.child("mutation", order)
    }

    /// Swaps two distinct, uniformly chosen positions.
    ///
    /// A chromosome with a single location has no distinct pair and is
    /// returned unchanged.
    pub fn mutate<R: Rng>(&self, rng: &mut R) -> Result<Self, PlannerError> {
        let n = self.len();
        if n < 2 {
            return Ok(self.clone());
        }
        let i = rng.random_range(0..n);
        let mut j = rng.random_range(0..n - 1);
        if j >= i {
            j += 1;
        }
        self.swap(i, j)
    }

    /// Split-point crossover with a split chosen uniformly from `[1, len - 1]`.
    ///
    /// See [`crossover_at`](Self::crossover_at). With a single location no
    /// split exists and copies of both parents are returned.
    pub fn crossover<R: Rng>(
        &self,
        other: &Chromosome,
        rng: &mut R,
    ) -> Result<(Self, Self), PlannerError> {
        let n = self.len();
        if n != other.len() {
            return Err(PlannerError::configuration(format!(
                "cannot cross chromosomes of {n} and {} locations",
                other.len()
            )));
        }
        if n < 2 {
            return Ok((self.clone(), other.clone()));
        }
        let k = rng.random_range(1..n);
        self.crossover_at(other, k)
    }

    /// Split-point crossover at position `k`.
    ///
    /// - First child: `self[..k]`, then the remaining locations in `other`'s
    ///   order.
    /// - Second child: the locations missing from `self[k..]` in `other`'s
    ///   order, then `self[k..]`.
    ///
    /// Both children keep this chromosome's depots.
    pub fn crossover_at(&self, other: &Chromosome, k: usize) -> Result<(Self, Self), PlannerError> {
        let n = self.len();
        if k == 0 || k >= n {
            return Err(PlannerError::configuration(format!(
                "split point {k} outside [1, {}]",
                n.saturating_sub(1)
            )));
        }

        let head = &self.visit_order[..k];
        let head_ids: HashSet<usize> = head.iter().map(Location::id).collect();
        let mut first = head.to_vec();
        first.extend(
            other
                .visit_order
                .iter()
                .filter(|l| !head_ids.contains(&l.id())),
        );

        let tail = &self.visit_order[k..];
        let tail_ids: HashSet<usize> = tail.iter().map(Location::id).collect();
        let mut second: Vec<Location> = other
            .visit_order
            .iter()
            .filter(|l| !tail_ids.contains(&l.id()))
            .copied()
            .collect();
        second.extend_from_slice(tail);

        Ok((self.child("crossover", first)?, self.child("crossover", second)?))
    }

    fn child(&self, operator: &'static str, order: Vec<Location>) -> Result<Self, PlannerError> {
        if !self.is_valid_order(&order) {
            let ids: Vec<usize> = order.iter().map(Location::id).collect();
            return Err(PlannerError::InvariantViolation {
                operator,
                order: format!("{ids:?}"),
            });
        }
        Self::build(order, self.depots.clone())
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (vehicle, (depot, route)) in self.routes().enumerate() {
            if vehicle > 0 {
                write!(f, " | ")?;
            }
            write!(f, "({}, {})", depot.x, depot.y)?;
            for location in route {
                write!(f, " -> {}", location.id())?;
            }
        }
        Ok(())
    }
}
