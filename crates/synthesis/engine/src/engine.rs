use crate::config::EngineConfig;
use crate::error::EngineError;
use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use synthesis_genepool::{FragmentId, GenePool};
use synthesis_genome::{Mode, PromptGenome};
use tracing::debug;

/// Manages the evolutionary process for a population of [`PromptGenome`]s.
///
/// Owns the RNG (seedable for reproducible runs), the generation counter and
/// the Kropotkin commons — a bounded pool of fragments contributed by each
/// round's best individual.
pub struct EvolutionEngine {
    config: EngineConfig,
    commons: Vec<FragmentId>,
    generation: u64,
    rng: StdRng,
}

/// Snapshot of the shared knowledge pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonsStats {
    pub len: usize,
    pub unique_fragments: usize,
}

impl EvolutionEngine {
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            commons: Vec::new(),
            generation: 0,
            rng,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generations evolved so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn commons(&self) -> &[FragmentId] {
        &self.commons
    }

    /// Restore commons and generation counter from a previous run.
    pub fn restore(&mut self, generation: u64, commons: Vec<FragmentId>) {
        self.generation = generation;
        self.commons = commons;
        self.truncate_commons();
    }

    /// Generate the initial random population.
    pub fn initial_population(&mut self, pool: &GenePool) -> Vec<PromptGenome> {
        (0..self.config.population_size)
            .map(|_| PromptGenome::random(pool, &mut self.rng))
            .collect()
    }

    /// Darwinian selection: rank by fitness, keep the top fraction
    /// (never fewer than one).
    pub fn select_darwin(
        &self,
        population: &[PromptGenome],
        scores: &[f64],
    ) -> Vec<PromptGenome> {
        let mut ranked: Vec<(&PromptGenome, f64)> =
            population.iter().zip(scores.iter().copied()).collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let survivors = ((population.len() as f64 * self.config.survival_rate) as usize).max(1);
        ranked
            .into_iter()
            .take(survivors)
            .map(|(genome, _)| genome.clone())
            .collect()
    }

    /// Kropotkinian selection: everyone survives. The best individual's
    /// fragments join the commons, then each individual may adopt a commons
    /// fragment into its head slot with the configured sharing probability.
    pub fn select_kropotkin(
        &mut self,
        population: &[PromptGenome],
        scores: &[f64],
    ) -> Vec<PromptGenome> {
        // Ties go to the earliest individual.
        let best = population
            .iter()
            .zip(scores.iter().copied())
            .reduce(|top, candidate| if candidate.1 > top.1 { candidate } else { top })
            .map(|(genome, _)| genome);

        if let Some(best) = best {
            self.commons.extend(best.fragments.iter().copied());
            self.truncate_commons();
        }

        population
            .iter()
            .map(|genome| {
                let mut genome = genome.clone();
                if !self.commons.is_empty()
                    && self.rng.gen::<f64>() < self.config.sharing_probability
                {
                    if let (Some(slot), Some(&shared)) = (
                        genome.fragments.first_mut(),
                        self.commons.choose(&mut self.rng),
                    ) {
                        *slot = shared;
                    }
                }
                genome
            })
            .collect()
    }

    /// Execute one full generation: select per `mode`, then refill to the
    /// configured population size through crossover and mutation.
    pub fn evolve(
        &mut self,
        population: &[PromptGenome],
        scores: &[f64],
        mode: Mode,
        pool: &GenePool,
    ) -> Result<Vec<PromptGenome>, EngineError> {
        if population.is_empty() {
            return Err(EngineError::EmptyPopulation);
        }
        if population.len() != scores.len() {
            return Err(EngineError::ScoreMismatch {
                expected: population.len(),
                got: scores.len(),
            });
        }

        self.generation += 1;

        let survivors = match mode {
            Mode::Darwin => self.select_darwin(population, scores),
            Mode::Kropotkin => self.select_kropotkin(population, scores),
        };

        let next = self.reproduce(survivors, mode, pool);
        debug!(
            generation = self.generation,
            %mode,
            population = next.len(),
            commons = self.commons.len(),
            "evolved generation"
        );
        Ok(next)
    }

    /// Refill the population by breeding random survivor pairs. A lone
    /// survivor is crossed with itself, degenerating to clone-then-mutate.
    fn reproduce(
        &mut self,
        survivors: Vec<PromptGenome>,
        mode: Mode,
        pool: &GenePool,
    ) -> Vec<PromptGenome> {
        // Parents are drawn from the survivors only, never from children
        // appended this round.
        let parent_count = survivors.len();
        let mut next = survivors;

        while next.len() < self.config.population_size {
            let (first, second) = if parent_count >= 2 {
                let picked = index::sample(&mut self.rng, parent_count, 2);
                (picked.index(0), picked.index(1))
            } else {
                (0, 0)
            };

            let mut child = next[first].crossover(&next[second]);
            child.mutate(pool, &mut self.rng, self.config.mutation_rate);
            child.mode = mode;
            next.push(child);
        }

        next
    }

    pub fn commons_stats(&self) -> CommonsStats {
        let unique: HashSet<FragmentId> = self.commons.iter().copied().collect();
        CommonsStats {
            len: self.commons.len(),
            unique_fragments: unique.len(),
        }
    }

    // Keep only the newest entries once capacity is exceeded.
    fn truncate_commons(&mut self) {
        let overflow = self
            .commons
            .len()
            .saturating_sub(self.config.commons_capacity);
        if overflow > 0 {
            self.commons.drain(..overflow);
        }
    }
}

/// Count of unique fragment ids across the whole population.
pub fn diversity(population: &[PromptGenome]) -> usize {
    population
        .iter()
        .flat_map(|genome| genome.fragments.iter().copied())
        .collect::<HashSet<FragmentId>>()
        .len()
}
