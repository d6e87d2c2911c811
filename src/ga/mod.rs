//! Genetic search over multi-depot delivery routes.
//!
//! - [`Chromosome`] — Visit order over all locations, split among vehicles
//! - [`split`] — Equal contiguous split of a visit order into vehicle routes
//! - [`selection`] — Roulette-wheel weights and operator choice
//! - [`Planner`] — Generational loop with roulette survivor selection
//! - [`DepotGaProblem`] — [`GaProblem`](u_metaheur::ga::GaProblem) bridge for the same encoding

mod chromosome;
mod config;
mod planner;
mod problem;
pub mod selection;
pub mod split;

pub use chromosome::Chromosome;
pub use config::{OffspringTarget, PlannerConfig};
pub use planner::{sample_locations, PlanOutcome, Planner, PlannerState};
pub use problem::{DepotGaProblem, RouteGenome};
pub use selection::{roulette_weights, GeneticOperator, RouletteWheel};
pub use split::{equal_split, RouteBounds};
