//! Output formatting utilities

use colored::*;
use serde::Serialize;
use synthesis_genepool::GenePool;
use synthesis_genome::{Mode, PromptGenome};
use tabled::{Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, clap::ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a vector of items in the specified format
pub fn print_output<T: Serialize + Tabled>(data: Vec<T>, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                println!("{}", "No results".dimmed());
            } else {
                println!("{}", Table::new(data));
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&data) {
            Ok(json) => println!("{}", json),
            Err(e) => print_error(&format!("cannot encode output: {}", e)),
        },
    }
}

/// Print a single item as pretty JSON
pub fn print_single<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("cannot encode output: {}", e)),
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Competition in red, cooperation in green.
pub fn mode_cell(mode: Mode) -> ColoredString {
    match mode {
        Mode::Darwin => "darwin".red(),
        Mode::Kropotkin => "kropotkin".green(),
    }
}

/// Table row for population display
#[derive(Debug, Serialize, Tabled)]
pub struct AgentRow {
    /// Position in the population
    pub agent: String,
    /// Mode the genome was bred under
    pub mode: String,
    /// Sampling temperature
    pub temperature: String,
    /// Fragment indices
    pub fragments: String,
    /// Leading instruction texts
    pub instructions: String,
}

pub fn agent_rows(population: &[PromptGenome], pool: &GenePool) -> Vec<AgentRow> {
    population
        .iter()
        .enumerate()
        .map(|(i, genome)| {
            let indices: Vec<usize> = genome.fragments.iter().map(|f| f.index()).collect();
            let mut instructions: Vec<&str> = genome
                .fragments
                .iter()
                .map(|&id| pool.instruction_or_default(id))
                .collect();
            let truncated = instructions.len() > 2;
            instructions.truncate(2);
            AgentRow {
                agent: format!("#{}", i + 1),
                mode: genome.mode.to_string(),
                temperature: format!("{:.2}", genome.temperature),
                fragments: format!("{:?}", indices),
                instructions: if truncated {
                    format!("{}…", instructions.join(", "))
                } else {
                    instructions.join(", ")
                },
            }
        })
        .collect()
}
