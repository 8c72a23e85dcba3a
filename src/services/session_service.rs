use crate::dto::command_dto::Command;
use crate::dto::result_dto::{QuestionView, ScoreReport};
use crate::engine::attempt::{Attempt, Step, Submission};
use crate::engine::clock::{CountdownClock, TickOutcome};
use crate::error::{Error, Result};
use crate::models::attempt::SubmitTrigger;
use crate::models::quiz::QuizDefinition;
use crate::services::submission_service::SubmissionGateway;
use crate::utils::token::{require_bearer_token, TokenSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub tick_interval: Duration,
    pub submit_timeout: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            submit_timeout: Duration::from_secs(10),
        }
    }
}

/// Everything the person taking the quiz gets to see.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    QuestionShown(QuestionView),
    Tick { remaining_seconds: u32 },
    TimeUp,
    Submitted(ScoreReport),
    LoginRequired,
    SubmissionSaved { attempt_id: Uuid },
    SubmissionFailed { attempt_id: Uuid, reason: String },
    Rejected { reason: String },
}

/// Event loop owning one attempt and its clock. Commands and ticks are
/// applied one at a time; the submission request runs on its own task.
pub struct QuizSession {
    quiz: Arc<QuizDefinition>,
    attempt: Attempt,
    clock: Option<CountdownClock>,
    gateway: Arc<dyn SubmissionGateway>,
    tokens: Arc<dyn TokenSource>,
    settings: SessionSettings,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl QuizSession {
    /// Creates the attempt and starts its clock. Must be called inside a
    /// tokio runtime.
    pub fn start(
        quiz: QuizDefinition,
        gateway: Arc<dyn SubmissionGateway>,
        tokens: Arc<dyn TokenSource>,
        settings: SessionSettings,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SessionEvent>)> {
        let quiz = Arc::new(quiz);
        let attempt = Attempt::new(quiz.clone())?;
        let (events, receiver) = mpsc::unbounded_channel();

        let session = Self {
            quiz,
            attempt,
            clock: Some(CountdownClock::start(settings.tick_interval)),
            gateway,
            tokens,
            settings,
            events,
        };
        session.emit(SessionEvent::QuestionShown(session.attempt.current_question()));
        Ok((session, receiver))
    }

    pub fn attempt(&self) -> &Attempt {
        &self.attempt
    }

    pub fn is_clock_running(&self) -> bool {
        self.clock.as_ref().map_or(false, |clock| !clock.is_stopped())
    }

    /// Runs until `Quit` arrives or the command stream closes, then stops the
    /// clock and hands back the last attempt.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> Attempt {
        loop {
            tokio::select! {
                biased;
                command = commands.recv() => match command {
                    Some(Command::Quit) | None => break,
                    Some(command) => self.handle(command),
                },
                Some(()) = next_tick(&mut self.clock) => self.on_tick(),
            }
        }
        self.stop_clock();
        info!(attempt_id = %self.attempt.id(), status = ?self.attempt.status(), "session closed");
        self.attempt
    }

    pub fn handle(&mut self, command: Command) {
        let step = match command {
            Command::Select { question, option } => {
                self.attempt.record_answer(question, option).map(|_| None)
            }
            Command::Answer(option) => self.attempt.answer_current(option).map(|_| None),
            Command::Next => self.attempt.go_next().map(Some),
            Command::Skip => self.attempt.skip().map(Some),
            Command::Previous => self.attempt.go_previous().map(|_| None),
            Command::GoTo(index) => self.attempt.go_to(index).map(|_| None),
            Command::Submit => self
                .attempt
                .submit(SubmitTrigger::Explicit)
                .map(|s| Some(Step::Submitted(Box::new(s))))
                .ok_or(Error::AttemptClosed),
            Command::Retake => return self.retake(),
            Command::Quit => return,
        };

        match step {
            Ok(Some(Step::Submitted(submission))) => self.finish(*submission),
            Ok(_) => self.emit(SessionEvent::QuestionShown(self.attempt.current_question())),
            Err(err) => self.reject(command, err),
        }
    }

    fn on_tick(&mut self) {
        match self.attempt.tick() {
            TickOutcome::Running(remaining_seconds) => {
                debug!(remaining_seconds, "tick");
                self.emit(SessionEvent::Tick { remaining_seconds });
            }
            TickOutcome::Expired => {
                self.emit(SessionEvent::Tick {
                    remaining_seconds: 0,
                });
                if let Some(submission) = self.attempt.submit(SubmitTrigger::Expired) {
                    self.finish(submission);
                }
            }
            TickOutcome::Stopped => self.stop_clock(),
        }
    }

    fn finish(&mut self, submission: Submission) {
        self.stop_clock();
        if submission.trigger == SubmitTrigger::Expired {
            self.emit(SessionEvent::TimeUp);
        }
        self.emit(SessionEvent::Submitted(submission.report.clone()));

        let attempt_id = submission.payload.attempt_id;
        let token = match require_bearer_token(self.tokens.bearer_token()) {
            Ok(token) => token,
            Err(err) => {
                warn!(%attempt_id, error = %err, "submission not sent, no usable token");
                self.emit(SessionEvent::LoginRequired);
                return;
            }
        };

        let request = self
            .gateway
            .submit(&self.quiz.id, &token, &submission.payload);
        let events = self.events.clone();
        let timeout = self.settings.submit_timeout;

        tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, request).await {
                Ok(result) => result,
                Err(_) => Err(Error::Timeout(timeout.as_secs())),
            };
            let event = match result {
                Ok(()) => SessionEvent::SubmissionSaved { attempt_id },
                Err(err) => {
                    warn!(%attempt_id, error = %err, "submission failed, not retrying");
                    SessionEvent::SubmissionFailed {
                        attempt_id,
                        reason: err.user_message(),
                    }
                }
            };
            let _ = events.send(event);
        });
    }

    fn retake(&mut self) {
        if !self.attempt.is_submitted() {
            self.reject(
                Command::Retake,
                Error::InvalidCommand("finish the current attempt before retaking".to_string()),
            );
            return;
        }
        match self.attempt.retake() {
            Ok(fresh) => {
                self.stop_clock();
                self.attempt = fresh;
                self.clock = Some(CountdownClock::start(self.settings.tick_interval));
                self.emit(SessionEvent::QuestionShown(self.attempt.current_question()));
            }
            Err(err) => self.reject(Command::Retake, err),
        }
    }

    fn reject(&self, command: Command, err: Error) {
        debug!(?command, error = %err, "command rejected");
        self.emit(SessionEvent::Rejected {
            reason: err.user_message(),
        });
    }

    fn stop_clock(&mut self) {
        if let Some(clock) = self.clock.take() {
            clock.stop();
        }
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }
}

async fn next_tick(clock: &mut Option<CountdownClock>) -> Option<()> {
    match clock {
        Some(clock) => clock.tick().await,
        None => std::future::pending().await,
    }
}
