//! Per-generation distance records.
//!
//! The planner hands one [`GenerationRecord`] per generation to a
//! [`MetricsSink`]. [`MetricsLog`] is the in-memory, append-only sink; it
//! can summarize the run and serialize it as JSON for external plotting.

mod history;

pub use history::{GenerationSummary, MetricsLog};

use serde::{Deserialize, Serialize};

/// Distances of every surviving chromosome in one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Zero-based generation index.
    pub generation: usize,
    /// `(label, distance)` pairs in population order.
    pub entries: Vec<(String, f64)>,
}

impl GenerationRecord {
    /// Builds a record labelling the distances `chromosome_0`, `chromosome_1`, ...
    pub fn from_distances(generation: usize, distances: impl IntoIterator<Item = f64>) -> Self {
        Self {
            generation,
            entries: distances
                .into_iter()
                .enumerate()
                .map(|(i, d)| (format!("chromosome_{i}"), d))
                .collect(),
        }
    }

    /// Distances in population order.
    pub fn distances(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, d)| *d)
    }

    /// Distance recorded under `label`, if any.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, d)| *d)
    }
}

/// Receives one record per generation.
pub trait MetricsSink {
    /// Accepts the record of a finished generation.
    fn record(&mut self, record: GenerationRecord);
}

impl MetricsSink for Vec<GenerationRecord> {
    fn record(&mut self, record: GenerationRecord) {
        self.push(record);
    }
}

impl<S: MetricsSink + ?Sized> MetricsSink for &mut S {
    fn record(&mut self, record: GenerationRecord) {
        (**self).record(record);
    }
}

/// A sink that drops every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl MetricsSink for NullSink {
    fn record(&mut self, _record: GenerationRecord) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_labels() {
        let r = GenerationRecord::from_distances(3, vec![10.0, 12.5]);
        assert_eq!(r.generation, 3);
        assert_eq!(r.get("chromosome_0"), Some(10.0));
        assert_eq!(r.get("chromosome_1"), Some(12.5));
        assert_eq!(r.get("chromosome_2"), None);
        assert_eq!(r.distances().collect::<Vec<_>>(), vec![10.0, 12.5]);
    }

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<GenerationRecord> = Vec::new();
        sink.record(GenerationRecord::from_distances(0, vec![1.0]));
        (&mut sink).record(GenerationRecord::from_distances(1, vec![2.0]));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1].generation, 1);
    }
}
