use crate::mode::Mode;
use rand::seq::index;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::fmt;
use synthesis_genepool::{FragmentId, GenePool};

/// Standard deviation of the Gaussian temperature mutation.
const TEMPERATURE_SIGMA: f64 = 0.1;

/// Fragment count for randomly initialized genomes (capped by pool size).
const INITIAL_FRAGMENTS: usize = 3;

/// A configurable agent expressed as an evolvable genome.
///
/// Genotype: fragment indices into a [`GenePool`], a sampling temperature in
/// `[0.0, 1.0]`, and the evolutionary mode the genome was bred under.
/// Phenotype: [`PromptGenome::render`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PromptGenome {
    pub fragments: Vec<FragmentId>,
    pub temperature: f64,
    pub mode: Mode,
}

impl PromptGenome {
    pub fn new(fragments: Vec<FragmentId>, temperature: f64, mode: Mode) -> Self {
        Self {
            fragments,
            temperature: temperature.clamp(0.0, 1.0),
            mode,
        }
    }

    /// A random genome for population initialization: distinct fragments,
    /// temperature uniform in `[0.3, 0.9]`, random mode.
    pub fn random(pool: &GenePool, rng: &mut impl Rng) -> Self {
        let count = INITIAL_FRAGMENTS.min(pool.len());
        let fragments = index::sample(rng, pool.len(), count)
            .into_iter()
            .map(FragmentId)
            .collect();
        Self {
            fragments,
            temperature: rng.gen_range(0.3..0.9),
            mode: Mode::random(rng),
        }
    }

    /// Genotype to phenotype: the prompt string sent to the model.
    pub fn render(&self, pool: &GenePool, task: &str) -> String {
        let instructions = self
            .fragments
            .iter()
            .map(|&id| pool.instruction_or_default(id))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "{}. Task: {}. Temperature: {:.2}",
            instructions, task, self.temperature
        )
    }

    /// Apply one mutation with probability `rate`.
    ///
    /// Half the time the discrete gene mutates (one fragment slot reassigned
    /// a random pool index), otherwise the temperature takes Gaussian noise
    /// and is clamped back into `[0.0, 1.0]`.
    pub fn mutate(&mut self, pool: &GenePool, rng: &mut impl Rng, rate: f64) {
        if rng.gen::<f64>() > rate {
            return;
        }

        if rng.gen::<f64>() < 0.5 && !self.fragments.is_empty() {
            let slot = rng.gen_range(0..self.fragments.len());
            self.fragments[slot] = FragmentId(rng.gen_range(0..pool.len()));
        } else if let Ok(noise) = Normal::new(0.0, TEMPERATURE_SIGMA) {
            let delta: f64 = noise.sample(rng);
            self.temperature = (self.temperature + delta).clamp(0.0, 1.0);
        }
    }

    /// Single-point crossover: head of `self`, tail of `partner`, blended
    /// temperature. The child inherits this parent's mode.
    pub fn crossover(&self, partner: &PromptGenome) -> PromptGenome {
        let mid = self.fragments.len() / 2;
        let mut fragments: Vec<FragmentId> = self.fragments[..mid].to_vec();
        fragments.extend(partner.fragments.iter().skip(mid).copied());

        PromptGenome {
            fragments,
            temperature: (self.temperature + partner.temperature) / 2.0,
            mode: self.mode,
        }
    }

    /// Hashable key for memoizing fitness evaluations. Insensitive to
    /// fragment order; temperature at two decimals.
    pub fn fitness_key(&self) -> String {
        let mut indices: Vec<usize> = self.fragments.iter().map(|f| f.index()).collect();
        indices.sort_unstable();
        format!("{:?}_{:.2}", indices, self.temperature)
    }
}

impl fmt::Display for PromptGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indices: Vec<usize> = self.fragments.iter().map(|frag| frag.index()).collect();
        write!(
            f,
            "Mode:{} | Temp:{:.2} | Frags:{:?}",
            self.mode, self.temperature, indices
        )
    }
}
