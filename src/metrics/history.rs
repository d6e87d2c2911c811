//! In-memory generation log and summary statistics.

use serde::{Deserialize, Serialize};

use super::{GenerationRecord, MetricsSink};

/// Min/mean/max distance of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Generation index.
    pub generation: usize,
    /// Shortest distance in the generation.
    pub min: f64,
    /// Mean distance.
    pub mean: f64,
    /// Longest distance in the generation.
    pub max: f64,
}

impl GenerationSummary {
    /// Summarizes a record. Returns `None` for a record without entries.
    pub fn of(record: &GenerationRecord) -> Option<Self> {
        if record.entries.is_empty() {
            return None;
        }
        let (mut min, mut max, mut sum) = (f64::INFINITY, f64::NEG_INFINITY, 0.0);
        for d in record.distances() {
            min = min.min(d);
            max = max.max(d);
            sum += d;
        }
        Some(Self {
            generation: record.generation,
            min,
            mean: sum / record.entries.len() as f64,
            max,
        })
    }

    /// Best and mean fitness when fitness is measured as
    /// `ceiling - distance`.
    pub fn fitness(&self, ceiling: f64) -> (f64, f64) {
        (ceiling - self.min, ceiling - self.mean)
    }
}

/// Append-only log of generation records.
///
/// # Examples
///
/// ```
/// use u_depot_ga::metrics::{GenerationRecord, MetricsLog, MetricsSink};
///
/// let mut log = MetricsLog::new();
/// log.record(GenerationRecord::from_distances(0, vec![12.0, 8.0]));
/// log.record(GenerationRecord::from_distances(1, vec![7.0, 9.0]));
/// assert_eq!(log.len(), 2);
/// assert_eq!(log.best_distance(), Some(7.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsLog {
    records: Vec<GenerationRecord>,
}

impl MetricsLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in generation order.
    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    /// Number of recorded generations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&GenerationRecord> {
        self.records.last()
    }

    /// Summary of every recorded generation.
    pub fn summaries(&self) -> Vec<GenerationSummary> {
        self.records.iter().filter_map(GenerationSummary::of).collect()
    }

    /// Shortest distance seen in any generation.
    pub fn best_distance(&self) -> Option<f64> {
        self.summaries()
            .into_iter()
            .map(|s| s.min)
            .reduce(f64::min)
    }

    /// Serializes the log as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Restores a log serialized with [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl MetricsSink for MetricsLog {
    fn record(&mut self, record: GenerationRecord) {
        self.records.push(record);
    }
}
