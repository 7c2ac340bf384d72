/// Errors from the evolution engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("cannot evolve an empty population")]
    EmptyPopulation,
    #[error("score count mismatch: {expected} individuals, {got} scores")]
    ScoreMismatch { expected: usize, got: usize },
}
