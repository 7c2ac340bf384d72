//! The `run` command: drive an evolutionary run end to end

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{self, OutputFormat};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use synthesis_engine::{EngineConfig, ModeSchedule};
use synthesis_evaluator::{
    CachingEvaluator, Evaluator, GeminiEvaluator, MockEvaluator, DEFAULT_MODEL,
};
use synthesis_genepool::GenePool;
use synthesis_runtime::{RunConfig, Runner, Snapshot};

/// Which fitness evaluator judges the population
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EvaluatorKind {
    /// Seeded offline scoring, no API calls
    Mock,
    /// Live Gemini-backed judging
    Gemini,
}

/// Arguments for `synthesis run`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Generations to evolve
    #[arg(short, long, default_value_t = 3)]
    pub generations: u32,

    /// Individuals per generation
    #[arg(short = 'p', long)]
    pub population_size: Option<usize>,

    /// Task the evolved prompts must solve
    #[arg(short, long)]
    pub task: Option<String>,

    /// Mode schedule (auto, alternate, darwin, kropotkin)
    #[arg(short, long, default_value = "auto")]
    pub schedule: ModeSchedule,

    /// Fitness evaluator
    #[arg(short, long, value_enum)]
    pub evaluator: Option<EvaluatorKind>,

    /// Gemini model id
    #[arg(long, env = "SYNTHESIS_GEMINI_MODEL")]
    pub model: Option<String>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Custom gene pool TOML file
    #[arg(long)]
    pub pool: Option<PathBuf>,

    /// Save the final state to this snapshot file
    #[arg(long)]
    pub snapshot_out: Option<PathBuf>,

    /// Resume from a snapshot file
    #[arg(long)]
    pub resume: Option<PathBuf>,
}

/// Execute the run command
pub async fn execute(args: RunArgs, config: &CliConfig, format: OutputFormat) -> CliResult<()> {
    let task = args
        .task
        .or_else(|| config.task.clone())
        .unwrap_or_else(|| RunConfig::default().task);
    let population_size = args
        .population_size
        .or(config.population_size)
        .unwrap_or(EngineConfig::default().population_size);
    let model = args
        .model
        .or_else(|| config.gemini_model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let kind = match args.evaluator {
        Some(kind) => kind,
        None => evaluator_from_config(config)?,
    };

    let pool = match &args.pool {
        Some(path) => GenePool::from_path(path)?,
        None => GenePool::builtin(),
    };

    let mut engine_config = EngineConfig::default().with_population_size(population_size);
    if let Some(seed) = args.seed {
        engine_config = engine_config.with_seed(seed);
    }

    let evaluator: Arc<dyn Evaluator> = match kind {
        EvaluatorKind::Mock => {
            let mock = match args.seed {
                Some(seed) => MockEvaluator::with_seed(seed),
                None => MockEvaluator::new(),
            };
            Arc::new(CachingEvaluator::new(mock))
        }
        EvaluatorKind::Gemini => Arc::new(CachingEvaluator::new(GeminiEvaluator::http(model))),
    };

    let mut runner = match &args.resume {
        Some(path) => {
            let snapshot = Snapshot::load(path)?;
            Runner::from_snapshot(engine_config, pool, evaluator, snapshot)?
        }
        None => Runner::new(engine_config, pool, evaluator),
    };

    let run_config = RunConfig {
        generations: args.generations,
        task,
        schedule: args.schedule,
    };

    match format {
        OutputFormat::Table => run_with_progress(&mut runner, &run_config).await?,
        OutputFormat::Json => {
            let report = runner.run(&run_config).await?;
            output::print_single(&report);
        }
    }

    if let Some(path) = &args.snapshot_out {
        runner.snapshot().save(path)?;
        if matches!(format, OutputFormat::Table) {
            output::print_success(&format!("Snapshot saved to {}", path.display()));
        }
    }

    Ok(())
}

/// Table mode: one progress line per generation, then the final summary.
async fn run_with_progress(runner: &mut Runner, config: &RunConfig) -> CliResult<()> {
    output::print_info(&format!(
        "Evolving {} generations against: {}",
        config.generations, config.task
    ));

    for _ in 0..config.generations {
        let record = runner.step(&config.task, config.schedule).await?;
        println!(
            "  gen {:>3} | {:<9} | mean {:>5.2} | best {:>5.2} | diversity {:>2}",
            record.generation,
            output::mode_cell(record.mode),
            record.mean_fitness,
            record.best_fitness,
            record.diversity
        );
    }

    let (best, score) = runner.best(&config.task).await?;
    let commons = runner.commons_stats();
    let stats = runner.evaluator_stats();

    println!();
    output::print_output(output::agent_rows(runner.population(), runner.pool()), OutputFormat::Table);
    println!(
        "  commons: {} fragments ({} unique) | evaluations: {} | cache hits: {}",
        commons.len, commons.unique_fragments, stats.evaluations, stats.cache_hits
    );
    output::print_success(&format!("Best agent: {} | score {:.2}", best, score));
    Ok(())
}

fn evaluator_from_config(config: &CliConfig) -> CliResult<EvaluatorKind> {
    match config.evaluator.as_deref() {
        None => Ok(EvaluatorKind::Mock),
        Some(name) => match name.to_ascii_lowercase().as_str() {
            "mock" => Ok(EvaluatorKind::Mock),
            "gemini" => Ok(EvaluatorKind::Gemini),
            other => Err(CliError::Config(format!(
                "unknown evaluator in config: {} (expected mock or gemini)",
                other
            ))),
        },
    }
}
