//! Domain model types for depot delivery routing.
//!
//! Locations are immutable points with a stable id. Depots are bare points,
//! one per vehicle, where each vehicle's route starts and ends.

mod location;

pub use location::{Location, Point};
