//! The `pool` command: list the active gene pool

use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use synthesis_genepool::GenePool;
use tabled::Tabled;

/// Arguments for `synthesis pool`
#[derive(Args, Debug)]
pub struct PoolArgs {
    /// Gene pool TOML file (builtin if omitted)
    #[arg(long)]
    pub pool: Option<PathBuf>,
}

/// Table row for fragment display
#[derive(Debug, Serialize, Tabled)]
struct FragmentRow {
    /// Fragment index genomes refer to
    id: usize,
    /// Instruction text
    instruction: String,
}

/// Execute the pool command
pub fn execute(args: PoolArgs, format: OutputFormat) -> CliResult<()> {
    let pool = match &args.pool {
        Some(path) => GenePool::from_path(path)?,
        None => GenePool::builtin(),
    };

    let rows: Vec<FragmentRow> = pool
        .iter()
        .map(|(id, instruction)| FragmentRow {
            id: id.index(),
            instruction: instruction.to_string(),
        })
        .collect();
    output::print_output(rows, format);
    Ok(())
}
