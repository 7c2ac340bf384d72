//! CLI error types

use thiserror::Error;

/// CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("pool error: {0}")]
    Pool(#[from] synthesis_genepool::GenePoolError),

    #[error("run error: {0}")]
    Runtime(#[from] synthesis_runtime::RuntimeError),
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
