use serde::{Deserialize, Serialize};
use synthesis_genome::Mode;

/// Metrics for one evaluated-and-evolved generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: u64,
    pub mode: Mode,
    pub mean_fitness: f64,
    pub best_fitness: f64,
    /// Unique fragment ids across the population before evolution.
    pub diversity: usize,
}

/// Append-only record of a run, one entry per generation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunHistory {
    records: Vec<GenerationRecord>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: GenerationRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest best-of-generation fitness seen so far.
    pub fn best_fitness(&self) -> Option<f64> {
        self.records
            .iter()
            .map(|r| r.best_fitness)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Mean of the last `n` generations' mean fitness.
    pub fn mean_recent(&self, n: usize) -> Option<f64> {
        if self.records.is_empty() || n == 0 {
            return None;
        }
        let tail = &self.records[self.records.len().saturating_sub(n)..];
        Some(tail.iter().map(|r| r.mean_fitness).sum::<f64>() / tail.len() as f64)
    }

    pub fn fitness_series(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.mean_fitness).collect()
    }

    pub fn diversity_series(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.diversity).collect()
    }

    pub fn mode_series(&self) -> Vec<Mode> {
        self.records.iter().map(|r| r.mode).collect()
    }
}
