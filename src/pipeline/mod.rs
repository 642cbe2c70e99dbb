//! Question pipeline.
//!
//! Fetches a batch from the trivia source and turns it into decoded,
//! numbered questions with shuffled answers. The pipeline holds no state
//! between calls and performs a single request per call.

mod decode;
mod error;
mod normalize;

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::models::{NormalizedQuestion, QuizParams, TriviaResponse};

pub use decode::decode_entities;
pub use error::{FetchError, SourceError, TransportError};
pub use normalize::{normalize, normalize_response, normalize_with_rng};

/// Default trivia source.
pub const DEFAULT_API_URL: &str = "https://opentdb.com/api.php";

/// Build the query string pairs. Unset or empty filters are omitted.
pub fn build_query(params: &QuizParams) -> Vec<(&'static str, String)> {
    let mut query = vec![("amount", params.amount.to_string())];

    if let Some(category) = params.category.filter(|c| *c > 0) {
        query.push(("category", category.to_string()));
    }
    if let Some(difficulty) = params.difficulty {
        query.push(("difficulty", difficulty.as_str().to_string()));
    }
    if let Some(question_type) = params.question_type {
        query.push(("type", question_type.as_str().to_string()));
    }

    query
}

/// HTTP client for the trivia source.
#[derive(Debug, Clone)]
pub struct TriviaClient {
    http: reqwest::Client,
    base_url: String,
}

impl TriviaClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Fetch one batch and normalize it. No partial results on failure.
    pub async fn fetch_and_normalize(
        &self,
        params: &QuizParams,
    ) -> Result<Vec<NormalizedQuestion>, FetchError> {
        let response = self.fetch(params).await?;
        let questions = normalize_response(response).inspect_err(|err| {
            warn!(%err, "trivia source reported a failure");
        })?;

        info!(count = questions.len(), "loaded questions");
        Ok(questions)
    }

    async fn fetch(&self, params: &QuizParams) -> Result<TriviaResponse, TransportError> {
        let query = build_query(params);
        debug!(url = %self.base_url, ?query, "requesting questions");

        let response = self
            .http
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .inspect_err(|err| warn!(%err, "trivia request failed"))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "trivia source returned an error status");
            return Err(TransportError::Status { status });
        }

        Ok(response.json::<TriviaResponse>().await?)
    }
}
