/// Errors from fitness evaluation.
#[derive(Debug, thiserror::Error)]
pub enum EvaluatorError {
    #[error("missing API key: set {0}")]
    MissingApiKey(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("could not parse a score from model reply: {0:?}")]
    ScoreParse(String),
    #[error("evaluator state poisoned")]
    LockPoisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_names_the_env_var() {
        let e = EvaluatorError::MissingApiKey("GEMINI_API_KEY");
        assert!(e.to_string().contains("GEMINI_API_KEY"));
    }
}
