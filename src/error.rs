//! Error type shared by the planner, chromosome operators and random helpers.

/// Errors raised while setting up or running a planner.
///
/// None of these are transient: a failed operator or a degenerate sampling
/// distribution means a logic defect, so callers should abort the run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlannerError {
    /// Malformed or empty inputs at chromosome or planner construction.
    #[error("ConfigurationError: {0}")]
    Configuration(String),
    /// A genetic operator produced a visit order that is not a permutation
    /// of the canonical location set.
    #[error("InvariantViolation: {operator} produced an invalid visit order {order}")]
    InvariantViolation {
        /// Name of the operator that produced the order.
        operator: &'static str,
        /// Location ids of the offending visit order.
        order: String,
    },
    /// A weighted draw was attempted over an invalid probability vector.
    #[error("SamplingError: {0}")]
    Sampling(String),
}

impl PlannerError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub(crate) fn sampling(message: impl Into<String>) -> Self {
        Self::Sampling(message.into())
    }
}
