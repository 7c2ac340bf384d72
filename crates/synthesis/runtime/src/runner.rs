use crate::error::RuntimeError;
use crate::history::{GenerationRecord, RunHistory};
use crate::snapshot::Snapshot;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use synthesis_engine::{diversity, EngineConfig, EvolutionEngine, ModeSchedule};
use synthesis_evaluator::{Evaluator, EvaluatorStats};
use synthesis_genepool::GenePool;
use synthesis_genome::PromptGenome;
use tracing::info;
use uuid::Uuid;

/// Parameters of one run of the generation loop.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunConfig {
    pub generations: u32,
    pub task: String,
    pub schedule: ModeSchedule,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            generations: 3,
            task: "Explain the concept of recursion in Python".to_string(),
            schedule: ModeSchedule::default(),
        }
    }
}

/// Outcome of a completed run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub history: RunHistory,
    pub population: Vec<PromptGenome>,
    pub best: PromptGenome,
    pub best_score: f64,
    pub evaluator: EvaluatorStats,
}

/// Drives the evolutionary loop: evaluate the population, let the schedule
/// pick a regime from current diversity, evolve, record.
pub struct Runner {
    id: Uuid,
    engine: EvolutionEngine,
    pool: GenePool,
    evaluator: Arc<dyn Evaluator>,
    population: Vec<PromptGenome>,
    history: RunHistory,
}

impl Runner {
    /// A fresh run with a randomly initialized population.
    pub fn new(config: EngineConfig, pool: GenePool, evaluator: Arc<dyn Evaluator>) -> Self {
        let mut engine = EvolutionEngine::new(config);
        let population = engine.initial_population(&pool);
        Self {
            id: Uuid::new_v4(),
            engine,
            pool,
            evaluator,
            population,
            history: RunHistory::new(),
        }
    }

    /// Resume from a saved snapshot: population, commons, generation counter
    /// and history all continue where they left off.
    pub fn from_snapshot(
        config: EngineConfig,
        pool: GenePool,
        evaluator: Arc<dyn Evaluator>,
        snapshot: Snapshot,
    ) -> Result<Self, RuntimeError> {
        if snapshot.population.is_empty() {
            return Err(RuntimeError::InvalidSnapshot(
                "snapshot has an empty population".to_string(),
            ));
        }
        let mut engine = EvolutionEngine::new(config);
        engine.restore(snapshot.generation, snapshot.commons);
        Ok(Self {
            id: Uuid::new_v4(),
            engine,
            pool,
            evaluator,
            population: snapshot.population,
            history: snapshot.history,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn pool(&self) -> &GenePool {
        &self.pool
    }

    pub fn population(&self) -> &[PromptGenome] {
        &self.population
    }

    pub fn history(&self) -> &RunHistory {
        &self.history
    }

    /// Generations evolved so far (survives snapshot resume).
    pub fn generation(&self) -> u64 {
        self.engine.generation()
    }

    /// Evaluate and evolve one generation, returning its metrics.
    pub async fn step(
        &mut self,
        task: &str,
        schedule: ModeSchedule,
    ) -> Result<GenerationRecord, RuntimeError> {
        let generation = self.engine.generation();
        let scores = self.evaluate_population(task).await?;

        let mean_fitness = scores.iter().sum::<f64>() / scores.len() as f64;
        let best_fitness = scores
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let diversity = diversity(&self.population);
        let mode = schedule.pick(generation, diversity);

        self.population = self
            .engine
            .evolve(&self.population, &scores, mode, &self.pool)?;

        let record = GenerationRecord {
            generation,
            mode,
            mean_fitness,
            best_fitness,
            diversity,
        };
        info!(
            run = %self.id,
            generation,
            %mode,
            mean_fitness,
            best_fitness,
            diversity,
            "generation complete"
        );
        self.history.push(record.clone());
        Ok(record)
    }

    /// Run `config.generations` steps, then score the final population to
    /// name a winner.
    pub async fn run(&mut self, config: &RunConfig) -> Result<RunReport, RuntimeError> {
        for _ in 0..config.generations {
            self.step(&config.task, config.schedule).await?;
        }
        let (best, best_score) = self.best(&config.task).await?;
        Ok(RunReport {
            run_id: self.id,
            history: self.history.clone(),
            population: self.population.clone(),
            best,
            best_score,
            evaluator: self.evaluator.stats(),
        })
    }

    /// Score the current population and return the fittest individual.
    /// Ties go to the earliest individual.
    pub async fn best(&self, task: &str) -> Result<(PromptGenome, f64), RuntimeError> {
        let scores = self.evaluate_population(task).await?;
        let (index, score) = scores
            .iter()
            .copied()
            .enumerate()
            .reduce(|top, candidate| if candidate.1 > top.1 { candidate } else { top })
            .ok_or_else(|| {
                RuntimeError::InvalidSnapshot("population is empty".to_string())
            })?;
        Ok((self.population[index].clone(), score))
    }

    /// Capture the current state for persistence.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            created_at: Utc::now(),
            generation: self.engine.generation(),
            history: self.history.clone(),
            population: self.population.clone(),
            commons: self.engine.commons().to_vec(),
        }
    }

    pub fn evaluator_stats(&self) -> EvaluatorStats {
        self.evaluator.stats()
    }

    pub fn commons_stats(&self) -> synthesis_engine::CommonsStats {
        self.engine.commons_stats()
    }

    async fn evaluate_population(&self, task: &str) -> Result<Vec<f64>, RuntimeError> {
        let mut scores = Vec::with_capacity(self.population.len());
        for genome in &self.population {
            scores.push(self.evaluator.evaluate(genome, &self.pool, task).await?);
        }
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use synthesis_evaluator::{
        CachingEvaluator, EvaluatorError, FailingEvaluator, MockEvaluator,
    };
    use synthesis_genome::Mode;

    /// Scores every genome identically, to exercise tie-breaking.
    struct ConstantEvaluator;

    #[async_trait]
    impl Evaluator for ConstantEvaluator {
        async fn evaluate(
            &self,
            _genome: &PromptGenome,
            _pool: &GenePool,
            _task: &str,
        ) -> Result<f64, EvaluatorError> {
            Ok(5.0)
        }

        fn stats(&self) -> EvaluatorStats {
            EvaluatorStats::default()
        }
    }

    fn runner(seed: u64) -> Runner {
        Runner::new(
            EngineConfig::default().with_seed(seed),
            GenePool::builtin(),
            Arc::new(MockEvaluator::with_seed(seed)),
        )
    }

    #[tokio::test]
    async fn run_records_one_entry_per_generation() {
        let mut runner = runner(1);
        let config = RunConfig {
            generations: 4,
            ..RunConfig::default()
        };

        let report = runner.run(&config).await.unwrap();
        assert_eq!(report.history.len(), 4);
        assert_eq!(runner.generation(), 4);
        assert_eq!(report.population.len(), 5);
        // One evaluation pass per generation plus the final best pass.
        assert_eq!(report.evaluator.evaluations, 25);
        let generations: Vec<u64> = report
            .history
            .records()
            .iter()
            .map(|r| r.generation)
            .collect();
        assert_eq!(generations, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn alternate_schedule_flips_modes() {
        let mut runner = runner(2);
        let config = RunConfig {
            generations: 4,
            schedule: ModeSchedule::Alternate,
            ..RunConfig::default()
        };

        let report = runner.run(&config).await.unwrap();
        assert_eq!(
            report.history.mode_series(),
            vec![Mode::Darwin, Mode::Kropotkin, Mode::Darwin, Mode::Kropotkin]
        );
    }

    #[tokio::test]
    async fn report_winner_comes_from_population() {
        let mut runner = runner(3);
        let report = runner.run(&RunConfig::default()).await.unwrap();
        assert!((0.0..=10.0).contains(&report.best_score));
        assert!(report.population.contains(&report.best));
    }

    #[tokio::test]
    async fn tied_best_scores_pick_the_first_agent() {
        let runner = Runner::new(
            EngineConfig::default().with_seed(9),
            GenePool::builtin(),
            Arc::new(ConstantEvaluator),
        );
        let (best, score) = runner.best("task").await.unwrap();
        assert_eq!(score, 5.0);
        assert_eq!(best, runner.population()[0]);
    }

    #[tokio::test]
    async fn evaluator_failure_surfaces() {
        let mut runner = Runner::new(
            EngineConfig::default().with_seed(4),
            GenePool::builtin(),
            Arc::new(FailingEvaluator),
        );
        let result = runner.run(&RunConfig::default()).await;
        assert!(matches!(result, Err(RuntimeError::Evaluator(_))));
    }

    #[tokio::test]
    async fn snapshot_resume_continues_counters() {
        let mut first = runner(5);
        let config = RunConfig {
            generations: 2,
            ..RunConfig::default()
        };
        first.run(&config).await.unwrap();
        let snapshot = first.snapshot();
        assert_eq!(snapshot.generation, 2);

        let mut resumed = Runner::from_snapshot(
            EngineConfig::default().with_seed(6),
            GenePool::builtin(),
            Arc::new(MockEvaluator::with_seed(6)),
            snapshot,
        )
        .unwrap();
        assert_eq!(resumed.generation(), 2);
        assert_eq!(resumed.history().len(), 2);

        resumed.run(&config).await.unwrap();
        assert_eq!(resumed.generation(), 4);
        assert_eq!(resumed.history().len(), 4);
    }

    #[tokio::test]
    async fn empty_snapshot_population_is_rejected() {
        let snapshot = Snapshot {
            created_at: Utc::now(),
            generation: 1,
            history: RunHistory::new(),
            population: vec![],
            commons: vec![],
        };
        let result = Runner::from_snapshot(
            EngineConfig::default(),
            GenePool::builtin(),
            Arc::new(MockEvaluator::with_seed(7)),
            snapshot,
        );
        assert!(matches!(result, Err(RuntimeError::InvalidSnapshot(_))));
    }

    #[tokio::test]
    async fn caching_evaluator_reports_hits_through_stats() {
        let mut runner = Runner::new(
            EngineConfig::default().with_seed(8),
            GenePool::builtin(),
            Arc::new(CachingEvaluator::new(MockEvaluator::with_seed(8))),
        );
        let config = RunConfig {
            generations: 3,
            ..RunConfig::default()
        };
        let report = runner.run(&config).await.unwrap();
        // 4 passes over 5 genomes; anything memoized shows up as hits.
        assert_eq!(report.evaluator.evaluations + report.evaluator.cache_hits, 20);
    }
}
