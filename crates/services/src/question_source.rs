//! Where quiz questions come from.

use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use quiz_core::model::Question;

use crate::error::FetchError;

/// Supplies the questions for one quiz.
///
/// One call per quiz start, resolving once with either the full list or an
/// error. No retries and no timeout; callers that want either wrap the call.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch an ordered list of raw (still entity-encoded) questions.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the source cannot produce questions.
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError>;
}

pub const DEFAULT_API_URL: &str = "https://opentdb.com/api.php";
pub const DEFAULT_AMOUNT: u32 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionSourceConfig {
    pub base_url: String,
    pub amount: u32,
}

impl Default for QuestionSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.into(),
            amount: DEFAULT_AMOUNT,
        }
    }
}

impl QuestionSourceConfig {
    /// Read `DAILY_QUIZ_API_URL` and `DAILY_QUIZ_AMOUNT`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("DAILY_QUIZ_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.into());
        let amount = env::var("DAILY_QUIZ_AMOUNT")
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_AMOUNT);
        Self { base_url, amount }
    }

    #[must_use]
    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    /// Full request URL with the `amount` query parameter.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if `base_url` does not parse.
    pub fn request_url(&self) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)?;
        url.query_pairs_mut()
            .append_pair("amount", &self.amount.to_string());
        Ok(url)
    }
}

/// Open Trivia DB style HTTP source.
#[derive(Clone, Debug)]
pub struct OpenTriviaSource {
    client: Client,
    config: QuestionSourceConfig,
}

impl OpenTriviaSource {
    #[must_use]
    pub fn new(config: QuestionSourceConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl QuestionSource for OpenTriviaSource {
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError> {
        let url = self.config.request_url()?;
        tracing::info!("Fetching {} questions from {}", self.config.amount, url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

/// Decode a source response body into questions.
///
/// # Errors
///
/// Returns `FetchError::Decode` for malformed JSON and
/// `FetchError::SourceFailure` when `response_code` is not zero.
pub fn parse_response(body: &str) -> Result<Vec<Question>, FetchError> {
    let payload: QuizPayload = serde_json::from_str(body)?;
    if payload.response_code != 0 {
        return Err(FetchError::SourceFailure {
            code: payload.response_code,
        });
    }
    Ok(payload
        .results
        .into_iter()
        .map(QuestionPayload::into_question)
        .collect())
}

#[derive(Debug, Deserialize)]
struct QuizPayload {
    response_code: i64,
    #[serde(default)]
    results: Vec<QuestionPayload>,
}

#[derive(Debug, Deserialize)]
struct QuestionPayload {
    #[serde(rename = "type")]
    kind: String,
    difficulty: String,
    category: String,
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

impl QuestionPayload {
    fn into_question(self) -> Question {
        Question::new(
            self.category,
            self.difficulty,
            self.kind,
            self.question,
            self.correct_answer,
            self.incorrect_answers,
        )
    }
}
