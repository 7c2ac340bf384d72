#![deny(unsafe_code)]
//! # synthesis-engine
//!
//! The evolutionary loop over prompt genomes. Two selection regimes:
//!
//! - **Darwin**: competition — rank by fitness, keep the top fraction, refill
//!   by crossover and mutation.
//! - **Kropotkin**: cooperation — everyone survives, the best individual
//!   feeds the shared commons, and individuals may adopt from it.

pub mod config;
pub mod engine;
pub mod error;
pub mod schedule;

pub use config::EngineConfig;
pub use engine::{diversity, CommonsStats, EvolutionEngine};
pub use error::EngineError;
pub use schedule::{ModeSchedule, ParseScheduleError};
