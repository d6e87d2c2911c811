//! # u-depot-ga
//!
//! Multi-depot delivery route planning with a genetic algorithm. Every
//! candidate visits all delivery locations once; its visit order is split
//! into one contiguous route per vehicle, each starting and ending at that
//! vehicle's depot. Shorter total distance is better.
//!
//! ## Modules
//!
//! - [`models`] — Locations and points
//! - [`ga`] — Chromosome, operators, roulette selection and the generational planner
//! - [`metrics`] — Per-generation distance records and summaries
//! - [`random`] — Seedable random-source helpers
//! - [`error`] — Error type
//!
//! ## Example
//!
//! ```
//! use u_depot_ga::ga::{Planner, PlannerConfig};
//! use u_depot_ga::metrics::MetricsLog;
//! use u_depot_ga::random::seeded_rng;
//!
//! let config = PlannerConfig::default().with_max_generations(25);
//! let mut planner = Planner::new(config, seeded_rng(7)).unwrap();
//! let mut log = MetricsLog::new();
//! let outcome = planner.run(&mut log).unwrap();
//! println!("best route: {} ({:.1})", outcome.best, outcome.best_distance);
//! ```

pub mod error;
pub mod ga;
pub mod metrics;
pub mod models;
pub mod random;

pub use error::PlannerError;
