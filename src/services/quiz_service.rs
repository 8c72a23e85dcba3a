use crate::error::{Error, Result};
use crate::models::quiz::QuizDefinition;
use crate::utils::validation::{endpoint_url, validate};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

#[derive(Clone)]
pub struct QuizService {
    client: Client,
    base_url: Url,
}

impl QuizService {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn quiz_url(&self, quiz_id: &str) -> Result<Url> {
        endpoint_url(&self.base_url, &["quizzes", quiz_id])
    }

    /// `GET /quizzes/{id}`, normalized and checked for playability.
    pub async fn fetch_quiz(&self, quiz_id: &str) -> Result<QuizDefinition> {
        let url = self.quiz_url(quiz_id)?;
        tracing::info!("Fetching quiz definition from: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::QuizUnavailable(format!("quiz {} not found", quiz_id)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Quiz API returned status {} for {}: {}", status, quiz_id, body);
            return Err(Error::QuizUnavailable(format!(
                "quiz {} could not be loaded ({})",
                quiz_id, status
            )));
        }

        let raw = response.text().await?;
        Self::parse_quiz(&raw)
    }

    pub fn parse_quiz(raw: &str) -> Result<QuizDefinition> {
        let quiz: QuizDefinition = serde_json::from_str(raw)
            .map_err(|e| Error::QuizUnavailable(format!("malformed quiz definition: {}", e)))?;
        let quiz = quiz.normalized();
        validate(&quiz).map_err(|e| Error::QuizUnavailable(format!("quiz {}: {}", quiz.id, e)))?;
        Ok(quiz)
    }
}
