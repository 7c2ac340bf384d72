use crate::error::EvaluatorError;
use crate::evaluator::{Evaluator, EvaluatorStats};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use synthesis_genepool::GenePool;
use synthesis_genome::PromptGenome;
use tracing::trace;

/// Memoizing wrapper around any [`Evaluator`].
///
/// Keys on [`PromptGenome::fitness_key`], so genomes that differ only in
/// fragment order (or in mode) share a cache entry. Populations converge
/// quickly, which makes this a large saving against a live model evaluator.
pub struct CachingEvaluator<E> {
    inner: E,
    cache: RwLock<HashMap<String, f64>>,
    hits: AtomicU64,
}

impl<E: Evaluator> CachingEvaluator<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
        }
    }

    /// Cached scores currently held.
    pub fn cached_len(&self) -> usize {
        self.cache.read().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn into_inner(self) -> E {
        self.inner
    }
}

#[async_trait]
impl<E: Evaluator> Evaluator for CachingEvaluator<E> {
    async fn evaluate(
        &self,
        genome: &PromptGenome,
        pool: &GenePool,
        task: &str,
    ) -> Result<f64, EvaluatorError> {
        let key = genome.fitness_key();

        let cached = {
            let cache = self.cache.read().map_err(|_| EvaluatorError::LockPoisoned)?;
            cache.get(&key).copied()
        };
        if let Some(score) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(%key, score, "fitness cache hit");
            return Ok(score);
        }

        let score = self.inner.evaluate(genome, pool, task).await?;
        let mut cache = self.cache.write().map_err(|_| EvaluatorError::LockPoisoned)?;
        cache.insert(key, score);
        Ok(score)
    }

    fn stats(&self) -> EvaluatorStats {
        EvaluatorStats {
            evaluations: self.inner.stats().evaluations,
            cache_hits: self.hits.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::FailingEvaluator;
    use crate::mock::MockEvaluator;
    use synthesis_genepool::FragmentId;
    use synthesis_genome::Mode;

    fn genome(fragments: &[usize]) -> PromptGenome {
        PromptGenome::new(
            fragments.iter().map(|&i| FragmentId(i)).collect(),
            0.6,
            Mode::Darwin,
        )
    }

    #[tokio::test]
    async fn repeat_evaluations_hit_the_cache() {
        let pool = GenePool::builtin();
        let eval = CachingEvaluator::new(MockEvaluator::with_seed(1));
        let subject = genome(&[0, 1, 2]);

        let first = eval.evaluate(&subject, &pool, "task").await.unwrap();
        let second = eval.evaluate(&subject, &pool, "task").await.unwrap();
        assert_eq!(first, second);

        let stats = eval.stats();
        assert_eq!(stats.evaluations, 1);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(eval.cached_len(), 1);
    }

    #[tokio::test]
    async fn reordered_fragments_share_an_entry() {
        let pool = GenePool::builtin();
        let eval = CachingEvaluator::new(MockEvaluator::with_seed(2));

        let first = eval.evaluate(&genome(&[2, 0, 1]), &pool, "task").await.unwrap();
        let second = eval.evaluate(&genome(&[0, 1, 2]), &pool, "task").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(eval.stats().evaluations, 1);
    }

    #[tokio::test]
    async fn distinct_genomes_miss() {
        let pool = GenePool::builtin();
        let eval = CachingEvaluator::new(MockEvaluator::with_seed(3));

        eval.evaluate(&genome(&[0, 1]), &pool, "task").await.unwrap();
        eval.evaluate(&genome(&[2, 3]), &pool, "task").await.unwrap();

        let stats = eval.stats();
        assert_eq!(stats.evaluations, 2);
        assert_eq!(stats.cache_hits, 0);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let pool = GenePool::builtin();
        let eval = CachingEvaluator::new(FailingEvaluator);
        let subject = genome(&[0]);

        assert!(eval.evaluate(&subject, &pool, "task").await.is_err());
        assert!(eval.evaluate(&subject, &pool, "task").await.is_err());
        assert_eq!(eval.cached_len(), 0);
        assert_eq!(eval.stats().cache_hits, 0);
    }
}
