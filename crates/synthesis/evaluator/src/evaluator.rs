use crate::error::EvaluatorError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use synthesis_genepool::GenePool;
use synthesis_genome::PromptGenome;

/// Lowest possible fitness score.
pub const MIN_SCORE: f64 = 0.0;
/// Highest possible fitness score.
pub const MAX_SCORE: f64 = 10.0;

/// Counters exposed by every evaluator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorStats {
    /// Evaluations that actually ran (cache hits excluded).
    pub evaluations: u64,
    /// Lookups served from a memoization layer, if any.
    pub cache_hits: u64,
}

/// Judges how well a genome's rendered prompt solves a task.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Score a genome for `task`. Implementations must return a value in
    /// `[MIN_SCORE, MAX_SCORE]`.
    async fn evaluate(
        &self,
        genome: &PromptGenome,
        pool: &GenePool,
        task: &str,
    ) -> Result<f64, EvaluatorError>;

    fn stats(&self) -> EvaluatorStats;
}

/// Evaluator that always fails. For exercising error paths.
#[derive(Debug, Default)]
pub struct FailingEvaluator;

#[async_trait]
impl Evaluator for FailingEvaluator {
    async fn evaluate(
        &self,
        _genome: &PromptGenome,
        _pool: &GenePool,
        _task: &str,
    ) -> Result<f64, EvaluatorError> {
        Err(EvaluatorError::Transport(
            "simulated evaluator failure".into(),
        ))
    }

    fn stats(&self) -> EvaluatorStats {
        EvaluatorStats::default()
    }
}
