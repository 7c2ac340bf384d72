#![deny(unsafe_code)]
//! # synthesis-evaluator
//!
//! Fitness evaluation for prompt genomes. The [`Evaluator`] trait is the seam
//! between the evolutionary loop and whatever judges a prompt: the seeded
//! [`MockEvaluator`] for development and tests, or the [`GeminiEvaluator`]
//! asking a live model to score the rendered prompt.
//!
//! Scores are always in `[0.0, 10.0]`.

pub mod cache;
pub mod error;
pub mod evaluator;
pub mod gemini;
pub mod mock;

pub use cache::CachingEvaluator;
pub use error::EvaluatorError;
pub use evaluator::{Evaluator, EvaluatorStats, FailingEvaluator, MAX_SCORE, MIN_SCORE};
pub use gemini::{
    GeminiEvaluator, GeminiTransport, HttpTransport, NoopTransport, AUTH_ENV_VAR, DEFAULT_MODEL,
};
pub use mock::MockEvaluator;
