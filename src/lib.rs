pub mod config;
pub mod dto;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    quiz_service::QuizService,
    session_service::{QuizSession, SessionEvent, SessionSettings},
    submission_service::{HttpSubmissionGateway, SubmissionGateway},
};
use crate::utils::{token::SharedToken, validation::parse_base_url};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct EngineState {
    pub quiz_service: QuizService,
    pub gateway: Arc<dyn SubmissionGateway>,
    pub tokens: SharedToken,
    pub settings: SessionSettings,
}

impl EngineState {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = parse_base_url(&config.api_base_url)?;

        let quiz_service = QuizService::new(base_url.clone(), config.fetch_timeout())?;
        let gateway = HttpSubmissionGateway::new(base_url, config.submit_timeout())?;
        let tokens = SharedToken::new(config.auth_token.clone());
        let settings = SessionSettings {
            tick_interval: config.tick_interval(),
            submit_timeout: config.submit_timeout(),
        };

        Ok(Self {
            quiz_service,
            gateway: Arc::new(gateway),
            tokens,
            settings,
        })
    }

    /// Fetches the quiz and opens a session on it. A quiz that cannot be
    /// played yields `Error::QuizUnavailable` and no attempt is created.
    pub async fn start_session(
        &self,
        quiz_id: &str,
    ) -> Result<(QuizSession, mpsc::UnboundedReceiver<SessionEvent>)> {
        let quiz = self.quiz_service.fetch_quiz(quiz_id).await?;
        QuizSession::start(
            quiz,
            self.gateway.clone(),
            Arc::new(self.tokens.clone()),
            self.settings,
        )
    }
}
