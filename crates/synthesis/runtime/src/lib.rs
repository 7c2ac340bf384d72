#![deny(unsafe_code)]
//! # synthesis-runtime
//!
//! Orchestration around the evolutionary core: the [`Runner`] drives
//! evaluate → schedule → evolve rounds, [`RunHistory`] keeps per-generation
//! metrics, and [`Snapshot`] persists a run to JSON so it can be inspected
//! or resumed later.

pub mod error;
pub mod history;
pub mod runner;
pub mod snapshot;

pub use error::RuntimeError;
pub use history::{GenerationRecord, RunHistory};
pub use runner::{RunConfig, RunReport, Runner};
pub use snapshot::Snapshot;
