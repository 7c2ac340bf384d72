#![deny(unsafe_code)]
//! # synthesis-genepool
//!
//! The allele space for prompt genomes. Genes are discrete indices into a
//! shared pool of instruction fragments, so mutation and crossover can never
//! produce an instruction that does not exist.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Index of an instruction fragment within a [`GenePool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FragmentId(pub usize);

impl FragmentId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for FragmentId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered pool of instruction fragments.
///
/// Fragment order is load-bearing: genomes refer to fragments by position,
/// so a pool must not be reordered once genomes exist against it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenePool {
    fragments: Vec<String>,
}

/// On-disk pool file format (`fragments = ["...", ...]`).
#[derive(Debug, Deserialize)]
struct PoolFile {
    fragments: Vec<String>,
}

impl GenePool {
    /// The stock instruction fragments.
    pub fn builtin() -> Self {
        Self {
            fragments: [
                "Be concise and direct",
                "Use practical examples",
                "Think step-by-step (Chain of Thought)",
                "Be empathetic and kind",
                "Prioritize technical precision",
                "Use Markdown formatting",
                "Use JSON formatting",
                "Act as a senior expert",
                "Act as a patient tutor",
                "Provide constructive criticism",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }

    /// Build a pool from explicit fragments. Empty pools are rejected.
    pub fn new(fragments: Vec<String>) -> Result<Self, GenePoolError> {
        if fragments.is_empty() {
            return Err(GenePoolError::Empty);
        }
        Ok(Self { fragments })
    }

    /// Parse a pool from TOML text.
    pub fn from_toml_str(input: &str) -> Result<Self, GenePoolError> {
        let file: PoolFile = toml::from_str(input)?;
        Self::new(file.fragments)
    }

    /// Load a pool from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GenePoolError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn get(&self, id: FragmentId) -> Option<&str> {
        self.fragments.get(id.index()).map(String::as_str)
    }

    /// Total lookup: out-of-range ids fall back to the first fragment.
    pub fn instruction_or_default(&self, id: FragmentId) -> &str {
        self.get(id).unwrap_or(&self.fragments[0])
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FragmentId, &str)> {
        self.fragments
            .iter()
            .enumerate()
            .map(|(i, s)| (FragmentId(i), s.as_str()))
    }
}

impl Default for GenePool {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Errors from pool construction and loading.
#[derive(Debug, thiserror::Error)]
pub enum GenePoolError {
    #[error("pool file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("pool parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("a gene pool must contain at least one fragment")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_ten_fragments() {
        let pool = GenePool::builtin();
        assert_eq!(pool.len(), 10);
        assert_eq!(pool.get(FragmentId(0)), Some("Be concise and direct"));
    }

    #[test]
    fn out_of_range_falls_back_to_first() {
        let pool = GenePool::builtin();
        assert_eq!(pool.get(FragmentId(99)), None);
        assert_eq!(
            pool.instruction_or_default(FragmentId(99)),
            "Be concise and direct"
        );
    }

    #[test]
    fn empty_pool_rejected() {
        assert!(matches!(GenePool::new(vec![]), Err(GenePoolError::Empty)));
    }

    #[test]
    fn pool_from_toml() {
        let pool = GenePool::from_toml_str("fragments = [\"Answer briefly\", \"Cite sources\"]")
            .unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(FragmentId(1)), Some("Cite sources"));
    }

    #[test]
    fn empty_toml_pool_rejected() {
        assert!(GenePool::from_toml_str("fragments = []").is_err());
    }

    #[test]
    fn iter_yields_ids_in_order() {
        let pool = GenePool::builtin();
        let ids: Vec<usize> = pool.iter().map(|(id, _)| id.index()).collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn fragment_id_serde_transparent() {
        let json = serde_json::to_string(&FragmentId(3)).unwrap();
        assert_eq!(json, "3");
    }
}
