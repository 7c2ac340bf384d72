use crate::error::RuntimeError;
use crate::history::RunHistory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use synthesis_genepool::FragmentId;
use synthesis_genome::PromptGenome;
use tracing::info;

/// Persisted state of a run: enough to inspect it or pick it back up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub created_at: DateTime<Utc>,
    /// Generations evolved when the snapshot was taken.
    pub generation: u64,
    pub history: RunHistory,
    pub population: Vec<PromptGenome>,
    pub commons: Vec<FragmentId>,
}

impl Snapshot {
    /// Write as pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RuntimeError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!(path = %path.display(), generation = self.generation, "snapshot saved");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
