use serde::{Deserialize, Serialize};

/// Tunables for the evolutionary engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Individuals per generation.
    pub population_size: usize,
    /// Upper bound on the shared fragment pool (Kropotkin commons).
    pub commons_capacity: usize,
    /// Fraction of the population surviving Darwinian selection.
    pub survival_rate: f64,
    /// Chance an individual adopts a commons fragment per Kropotkin round.
    pub sharing_probability: f64,
    /// Per-child mutation probability during reproduction.
    pub mutation_rate: f64,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population_size: 5,
            commons_capacity: 10,
            survival_rate: 0.5,
            sharing_probability: 0.5,
            mutation_rate: 0.2,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size.max(1);
        self
    }

    pub fn with_commons_capacity(mut self, capacity: usize) -> Self {
        self.commons_capacity = capacity;
        self
    }

    pub fn with_survival_rate(mut self, rate: f64) -> Self {
        self.survival_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_sharing_probability(mut self, p: f64) -> Self {
        self.sharing_probability = p.clamp(0.0, 1.0);
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
