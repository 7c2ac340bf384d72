//! The `inspect` command: summarize a saved run snapshot

use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use clap::Args;
use std::collections::HashSet;
use std::path::PathBuf;
use synthesis_genepool::GenePool;
use synthesis_runtime::Snapshot;

/// Arguments for `synthesis inspect`
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Snapshot file to inspect
    pub snapshot: PathBuf,

    /// Gene pool TOML the run used (builtin if omitted)
    #[arg(long)]
    pub pool: Option<PathBuf>,
}

/// Execute the inspect command
pub fn execute(args: InspectArgs, format: OutputFormat) -> CliResult<()> {
    let snapshot = Snapshot::load(&args.snapshot)?;
    let pool = match &args.pool {
        Some(path) => GenePool::from_path(path)?,
        None => GenePool::builtin(),
    };

    match format {
        OutputFormat::Json => output::print_single(&snapshot),
        OutputFormat::Table => {
            let unique_commons: HashSet<_> = snapshot.commons.iter().collect();
            println!("Snapshot:    {}", args.snapshot.display());
            println!("Created:     {}", snapshot.created_at.to_rfc3339());
            println!("Generations: {}", snapshot.generation);
            match snapshot.history.best_fitness() {
                Some(best) => println!("Best fitness: {:.2}", best),
                None => println!("Best fitness: -"),
            }
            println!(
                "Commons:     {} fragments ({} unique)",
                snapshot.commons.len(),
                unique_commons.len()
            );
            println!();
            output::print_output(
                output::agent_rows(&snapshot.population, &pool),
                OutputFormat::Table,
            );
        }
    }
    Ok(())
}
