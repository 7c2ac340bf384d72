use crate::error::EvaluatorError;
use crate::evaluator::{Evaluator, EvaluatorStats, MAX_SCORE, MIN_SCORE};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use synthesis_genepool::GenePool;
use synthesis_genome::PromptGenome;
use tracing::debug;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const AUTH_ENV_VAR: &str = "GEMINI_API_KEY";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Transport request for a scoring completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub model: String,
    pub prompt: String,
}

/// Transport response: the raw model reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub output_text: String,
}

/// Provider transport abstraction, so tests never touch the network.
#[async_trait]
pub trait GeminiTransport: Send + Sync {
    async fn complete(
        &self,
        request: &ScoreRequest,
        api_key: &str,
    ) -> Result<ScoreResponse, EvaluatorError>;
}

/// Default offline transport.
#[derive(Debug, Default)]
pub struct NoopTransport;

#[async_trait]
impl GeminiTransport for NoopTransport {
    async fn complete(
        &self,
        _request: &ScoreRequest,
        _api_key: &str,
    ) -> Result<ScoreResponse, EvaluatorError> {
        Err(EvaluatorError::Transport(
            "gemini transport not configured".into(),
        ))
    }
}

/// HTTP transport against the `generateContent` REST surface.
#[derive(Debug, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl GeminiTransport for HttpTransport {
    async fn complete(
        &self,
        request: &ScoreRequest,
        api_key: &str,
    ) -> Result<ScoreResponse, EvaluatorError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            API_BASE, request.model, api_key
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let parsed: GenerateContentResponse = response.json().await?;

        let output_text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| EvaluatorError::Transport("empty gemini response".into()))?;

        Ok(ScoreResponse { output_text })
    }
}

/// Live fitness evaluation: render the genome's prompt, have Gemini answer
/// the task with it, and parse the model's 0-10 quality score from the reply.
pub struct GeminiEvaluator {
    model: String,
    api_key: Option<String>,
    transport: Arc<dyn GeminiTransport>,
    evaluations: AtomicU64,
}

impl GeminiEvaluator {
    /// Offline construction with the [`NoopTransport`].
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_transport(model, Arc::new(NoopTransport))
    }

    /// Construction with a live HTTP transport.
    pub fn http(model: impl Into<String>) -> Self {
        Self::with_transport(model, Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(model: impl Into<String>, transport: Arc<dyn GeminiTransport>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            transport,
            evaluations: AtomicU64::new(0),
        }
    }

    /// Explicit API key; otherwise `GEMINI_API_KEY` is consulted per call.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn api_key(&self) -> Result<String, EvaluatorError> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        std::env::var(AUTH_ENV_VAR).map_err(|_| EvaluatorError::MissingApiKey(AUTH_ENV_VAR))
    }
}

impl Default for GeminiEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

/// Ask the model to use the prompt under evaluation and grade it.
fn scoring_prompt(rendered: &str, task: &str) -> String {
    format!(
        "You are grading prompt quality.\n\n\
         Prompt under evaluation:\n```\n{}\n```\n\n\
         Follow that prompt to complete this task: {}\n\n\
         Then rate, on a 0-10 scale, how well the prompt guided you.\n\
         Reply with the numeric score on the first line, then a one-sentence rationale.",
        rendered, task
    )
}

/// Pull the first number out of a model reply and clamp it to the score range.
fn parse_score(text: &str) -> Result<f64, EvaluatorError> {
    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_ascii_digit() && c != '.' && c != '-'))
        .find_map(|token| token.parse::<f64>().ok())
        .map(|score| score.clamp(MIN_SCORE, MAX_SCORE))
        .ok_or_else(|| EvaluatorError::ScoreParse(text.chars().take(80).collect()))
}

#[async_trait]
impl Evaluator for GeminiEvaluator {
    async fn evaluate(
        &self,
        genome: &PromptGenome,
        pool: &GenePool,
        task: &str,
    ) -> Result<f64, EvaluatorError> {
        let api_key = self.api_key()?;
        let request = ScoreRequest {
            model: self.model.clone(),
            prompt: scoring_prompt(&genome.render(pool, task), task),
        };

        self.evaluations.fetch_add(1, Ordering::Relaxed);
        let response = self.transport.complete(&request, &api_key).await?;
        let score = parse_score(&response.output_text)?;
        debug!(model = %self.model, score, "gemini evaluation");
        Ok(score)
    }

    fn stats(&self) -> EvaluatorStats {
        EvaluatorStats {
            evaluations: self.evaluations.load(Ordering::Relaxed),
            cache_hits: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use synthesis_genepool::FragmentId;
    use synthesis_genome::Mode;

    /// Transport stub that records the request and replies with a fixed text.
    struct StubTransport {
        reply: &'static str,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl StubTransport {
        fn new(reply: &'static str) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GeminiTransport for StubTransport {
        async fn complete(
            &self,
            request: &ScoreRequest,
            api_key: &str,
        ) -> Result<ScoreResponse, EvaluatorError> {
            self.seen
                .lock()
                .map_err(|_| EvaluatorError::LockPoisoned)?
                .push((request.prompt.clone(), api_key.to_string()));
            Ok(ScoreResponse {
                output_text: self.reply.to_string(),
            })
        }
    }

    fn genome() -> PromptGenome {
        PromptGenome::new(vec![FragmentId(0), FragmentId(2)], 0.6, Mode::Darwin)
    }

    #[tokio::test]
    async fn parses_score_from_reply() {
        let transport = Arc::new(StubTransport::new("8.5\nClear and specific."));
        let eval = GeminiEvaluator::with_transport(DEFAULT_MODEL, transport.clone())
            .with_api_key("test-key");
        let pool = GenePool::builtin();

        let score = eval.evaluate(&genome(), &pool, "Explain recursion").await.unwrap();
        assert!((score - 8.5).abs() < 1e-9);
        assert_eq!(eval.stats().evaluations, 1);

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].0.contains("Task: Explain recursion"));
        assert!(seen[0].0.contains("Be concise and direct"));
        assert_eq!(seen[0].1, "test-key");
    }

    #[tokio::test]
    async fn noop_transport_fails() {
        let eval = GeminiEvaluator::default().with_api_key("k");
        let pool = GenePool::builtin();
        let result = eval.evaluate(&genome(), &pool, "task").await;
        assert!(matches!(result, Err(EvaluatorError::Transport(_))));
    }

    #[tokio::test]
    async fn unparseable_reply_is_an_error() {
        let transport = Arc::new(StubTransport::new("I cannot rate this."));
        let eval =
            GeminiEvaluator::with_transport(DEFAULT_MODEL, transport).with_api_key("k");
        let pool = GenePool::builtin();
        let result = eval.evaluate(&genome(), &pool, "task").await;
        assert!(matches!(result, Err(EvaluatorError::ScoreParse(_))));
    }

    #[test]
    fn score_parsing_edge_cases() {
        assert_eq!(parse_score("7").unwrap(), 7.0);
        assert_eq!(parse_score("Score: 6.5 overall").unwrap(), 6.5);
        assert_eq!(parse_score("15 out of 10").unwrap(), 10.0);
        assert_eq!(parse_score("-3").unwrap(), 0.0);
        assert!(parse_score("no digits here").is_err());
    }

    #[test]
    fn scoring_prompt_carries_rendered_prompt() {
        let prompt = scoring_prompt("RENDERED", "TASK");
        assert!(prompt.contains("RENDERED"));
        assert!(prompt.contains("TASK"));
        assert!(prompt.contains("0-10"));
    }
}
