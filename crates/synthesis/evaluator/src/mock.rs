use crate::error::EvaluatorError;
use crate::evaluator::{Evaluator, EvaluatorStats, MAX_SCORE, MIN_SCORE};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use synthesis_genepool::GenePool;
use synthesis_genome::PromptGenome;

/// Simulated evaluation for development and tests: plausible scores without
/// any API calls.
///
/// Base score is uniform in `[5.0, 8.0]`, with a bonus for a balanced
/// temperature (exploration vs exploitation) and another for fragment
/// diversity.
pub struct MockEvaluator {
    rng: Mutex<StdRng>,
    evaluations: AtomicU64,
}

impl MockEvaluator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            evaluations: AtomicU64::new(0),
        }
    }

    /// Seeded variant for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            evaluations: AtomicU64::new(0),
        }
    }
}

impl Default for MockEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Evaluator for MockEvaluator {
    async fn evaluate(
        &self,
        genome: &PromptGenome,
        _pool: &GenePool,
        _task: &str,
    ) -> Result<f64, EvaluatorError> {
        self.evaluations.fetch_add(1, Ordering::Relaxed);

        let mut score: f64 = {
            let mut rng = self.rng.lock().map_err(|_| EvaluatorError::LockPoisoned)?;
            rng.gen_range(5.0..8.0)
        };

        if genome.temperature > 0.5 && genome.temperature < 0.8 {
            score += 1.0;
        }

        let unique: HashSet<_> = genome.fragments.iter().collect();
        if unique.len() >= 2 {
            score += 0.5;
        }

        Ok(score.clamp(MIN_SCORE, MAX_SCORE))
    }

    fn stats(&self) -> EvaluatorStats {
        EvaluatorStats {
            evaluations: self.evaluations.load(Ordering::Relaxed),
            cache_hits: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthesis_genepool::FragmentId;
    use synthesis_genome::Mode;

    #[tokio::test]
    async fn scores_stay_in_range() {
        let pool = GenePool::builtin();
        let eval = MockEvaluator::with_seed(1);
        for i in 0..50 {
            let genome = PromptGenome::new(
                vec![FragmentId(i % 10), FragmentId((i + 1) % 10)],
                (i as f64) / 50.0,
                Mode::Darwin,
            );
            let score = eval.evaluate(&genome, &pool, "task").await.unwrap();
            assert!((MIN_SCORE..=MAX_SCORE).contains(&score));
        }
    }

    #[tokio::test]
    async fn balanced_genome_earns_both_bonuses() {
        let pool = GenePool::builtin();
        let eval = MockEvaluator::with_seed(2);
        let genome = PromptGenome::new(
            vec![FragmentId(0), FragmentId(5)],
            0.65,
            Mode::Kropotkin,
        );
        let score = eval.evaluate(&genome, &pool, "task").await.unwrap();
        // 5.0..8.0 base, +1.0 temperature bonus, +0.5 diversity bonus.
        assert!(score >= 6.5);
    }

    #[tokio::test]
    async fn duplicate_fragments_forfeit_diversity_bonus() {
        let pool = GenePool::builtin();
        let eval = MockEvaluator::with_seed(3);
        let genome = PromptGenome::new(vec![FragmentId(4), FragmentId(4)], 0.1, Mode::Darwin);
        let score = eval.evaluate(&genome, &pool, "task").await.unwrap();
        assert!(score < 8.0);
    }

    #[tokio::test]
    async fn counts_evaluations() {
        let pool = GenePool::builtin();
        let eval = MockEvaluator::with_seed(4);
        let genome = PromptGenome::new(vec![FragmentId(0)], 0.5, Mode::Darwin);
        for _ in 0..3 {
            eval.evaluate(&genome, &pool, "task").await.unwrap();
        }
        assert_eq!(eval.stats().evaluations, 3);
    }
}
