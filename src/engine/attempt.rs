use crate::dto::result_dto::{AttemptProgress, QuestionView, ScoreReport};
use crate::dto::submission_dto::SubmissionPayload;
use crate::engine::clock::{Countdown, TickOutcome};
use crate::engine::cursor::{Advance, NavigationCursor};
use crate::engine::ledger::AnswerLedger;
use crate::error::{Error, Result};
use crate::models::attempt::{AttemptStatus, SubmitTrigger};
use crate::models::quiz::QuizDefinition;
use crate::services::grading_service::GradingService;
use crate::utils::time;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Produced once, when an attempt flips to submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub trigger: SubmitTrigger,
    pub report: ScoreReport,
    pub payload: SubmissionPayload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Moved(usize),
    Submitted(Box<Submission>),
}

/// One run through a quiz. Mutations are rejected with
/// [`Error::AttemptClosed`] once submitted.
#[derive(Debug, Clone)]
pub struct Attempt {
    id: Uuid,
    quiz: Arc<QuizDefinition>,
    status: AttemptStatus,
    cursor: NavigationCursor,
    countdown: Countdown,
    ledger: AnswerLedger,
    started_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
    result: Option<ScoreReport>,
}

impl Attempt {
    pub fn new(quiz: Arc<QuizDefinition>) -> Result<Self> {
        quiz.validate()
            .map_err(|e| Error::QuizUnavailable(format!("quiz {}: {}", quiz.id, e)))?;

        let ledger = AnswerLedger::new(&quiz.questions);
        let attempt = Self {
            id: Uuid::new_v4(),
            status: AttemptStatus::InProgress,
            cursor: NavigationCursor::new(ledger.len()),
            countdown: Countdown::new(quiz.duration_seconds()),
            ledger,
            started_at: time::now(),
            submitted_at: None,
            result: None,
            quiz,
        };
        tracing::info!(
            attempt_id = %attempt.id,
            quiz_id = %attempt.quiz.id,
            questions = attempt.ledger.len(),
            duration_seconds = attempt.countdown.remaining_seconds(),
            "attempt created"
        );
        Ok(attempt)
    }

    /// Fresh attempt over the same quiz. The current one is left untouched.
    pub fn retake(&self) -> Result<Self> {
        Self::new(self.quiz.clone())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn quiz(&self) -> &QuizDefinition {
        &self.quiz
    }

    pub fn status(&self) -> AttemptStatus {
        self.status
    }

    pub fn is_submitted(&self) -> bool {
        self.status == AttemptStatus::Submitted
    }

    pub fn current_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.countdown.remaining_seconds()
    }

    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    /// The score computed at submission.
    pub fn score(&self) -> Result<&ScoreReport> {
        self.result.as_ref().ok_or(Error::NotSubmitted)
    }

    pub fn progress(&self) -> AttemptProgress {
        AttemptProgress {
            status: self.status,
            current_question_index: self.cursor.index(),
            questions_answered: self.ledger.answered_count(),
            total_questions: self.ledger.len(),
            remaining_seconds: self.countdown.remaining_seconds(),
        }
    }

    pub fn current_question(&self) -> QuestionView {
        let index = self.cursor.index();
        let question = &self.quiz.questions[index];
        QuestionView {
            index,
            total: self.ledger.len(),
            question_id: question.id_or_position(index),
            text: question.text.clone(),
            options: question.options.clone(),
            selected_index: self.ledger.get(index).and_then(|s| s.selected_index),
            remaining_seconds: self.countdown.remaining_seconds(),
        }
    }

    pub fn record_answer(&mut self, index: usize, selected: i32) -> Result<()> {
        self.ensure_open()?;
        self.ledger.record(index, selected)
    }

    pub fn answer_current(&mut self, selected: i32) -> Result<()> {
        self.record_answer(self.cursor.index(), selected)
    }

    /// Moves forward, or submits when already on the last question.
    pub fn go_next(&mut self) -> Result<Step> {
        self.advance(SubmitTrigger::Next)
    }

    /// Same as [`Attempt::go_next`]; any existing selection is kept.
    pub fn skip(&mut self) -> Result<Step> {
        self.advance(SubmitTrigger::Skip)
    }

    pub fn go_previous(&mut self) -> Result<usize> {
        self.ensure_open()?;
        Ok(self.cursor.previous())
    }

    pub fn go_to(&mut self, index: usize) -> Result<usize> {
        self.ensure_open()?;
        Ok(self.cursor.go_to(index))
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.is_submitted() {
            return TickOutcome::Stopped;
        }
        self.countdown.tick()
    }

    /// Flips the attempt to submitted and scores it. Returns `None` when the
    /// attempt was already submitted, so every trigger may call this freely.
    pub fn submit(&mut self, trigger: SubmitTrigger) -> Option<Submission> {
        if self.is_submitted() {
            tracing::debug!(attempt_id = %self.id, ?trigger, "submit ignored, already submitted");
            return None;
        }
        self.status = AttemptStatus::Submitted;

        let submitted_at = time::now();
        self.submitted_at = Some(submitted_at);

        let report = GradingService::score(self.ledger.slots(), &self.quiz.questions);
        self.result = Some(report.clone());

        let payload = SubmissionPayload {
            attempt_id: self.id,
            status: trigger.wire_status().to_string(),
            answers: self.ledger.slots().to_vec(),
            time_spent_seconds: time::elapsed_seconds(self.started_at, submitted_at),
            started_at: self.started_at,
            submitted_at,
        };

        tracing::info!(
            attempt_id = %self.id,
            ?trigger,
            correct = report.correct_count,
            total = report.total,
            percentage = %report.percentage,
            passed = report.passed,
            "attempt submitted"
        );

        Some(Submission {
            trigger,
            report,
            payload,
        })
    }

    fn advance(&mut self, trigger: SubmitTrigger) -> Result<Step> {
        self.ensure_open()?;
        match self.cursor.next() {
            Advance::Moved(index) => Ok(Step::Moved(index)),
            Advance::PastEnd => self
                .submit(trigger)
                .map(|s| Step::Submitted(Box::new(s)))
                .ok_or(Error::AttemptClosed),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_submitted() {
            return Err(Error::AttemptClosed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::Question;
    use rust_decimal::Decimal;

    fn two_question_quiz(duration: u32) -> Arc<QuizDefinition> {
        Arc::new(QuizDefinition {
            id: "quiz-1".into(),
            title: "Letters".into(),
            description: None,
            duration_seconds: Some(duration),
            questions: vec![
                Question {
                    id: None,
                    text: "First?".into(),
                    options: vec!["A".into(), "B".into()],
                    correct_answer_index: Some(0),
                },
                Question {
                    id: None,
                    text: "Second?".into(),
                    options: vec!["C".into(), "D".into()],
                    correct_answer_index: Some(1),
                },
            ],
        })
    }

    #[test]
    fn new_attempt_starts_in_progress_at_first_question() {
        let attempt = Attempt::new(two_question_quiz(5)).unwrap();
        assert_eq!(attempt.status(), AttemptStatus::InProgress);
        assert_eq!(attempt.current_index(), 0);
        assert_eq!(attempt.remaining_seconds(), 5);
        assert_eq!(attempt.ledger().len(), 2);
        assert_eq!(attempt.ledger().answered_count(), 0);
        assert!(matches!(attempt.score(), Err(Error::NotSubmitted)));
    }

    #[test]
    fn expiry_after_partial_answers_scores_fifty_percent() {
        let mut attempt = Attempt::new(two_question_quiz(5)).unwrap();
        attempt.record_answer(0, 0).unwrap();
        assert_eq!(attempt.skip().unwrap(), Step::Moved(1));

        let mut outcomes = Vec::new();
        for _ in 0..5 {
            outcomes.push(attempt.tick());
        }
        assert_eq!(outcomes.last(), Some(&TickOutcome::Expired));

        let submission = attempt.submit(SubmitTrigger::Expired).unwrap();
        assert_eq!(submission.payload.status, "timeout");
        assert_eq!(attempt.status(), AttemptStatus::Submitted);

        let report = attempt.score().unwrap();
        assert_eq!(report.correct_count, 1);
        assert_eq!(report.total, 2);
        assert_eq!(report.percentage, Decimal::new(5000, 2));
        assert!(report.passed);
        assert_eq!(report.skipped_count(), 1);
    }

    #[test]
    fn next_on_last_question_submits_immediately() {
        let mut attempt = Attempt::new(two_question_quiz(5)).unwrap();
        attempt.record_answer(0, 1).unwrap();
        attempt.go_next().unwrap();
        attempt.record_answer(1, 0).unwrap();

        let Step::Submitted(submission) = attempt.go_next().unwrap() else {
            panic!("expected submission on last question");
        };
        assert_eq!(submission.trigger, SubmitTrigger::Next);
        assert_eq!(submission.payload.status, "completed");
        assert_eq!(submission.payload.answers.len(), 2);
        assert_eq!(submission.report.correct_count, 0);
        assert_eq!(submission.report.percentage, Decimal::ZERO);
        assert!(!submission.report.passed);
        assert_eq!(attempt.remaining_seconds(), 5);
    }

    #[test]
    fn second_submit_trigger_is_ignored() {
        let mut attempt = Attempt::new(two_question_quiz(1)).unwrap();
        attempt.go_to(1).unwrap();

        let first = attempt.go_next().unwrap();
        assert!(matches!(first, Step::Submitted(_)));
        assert_eq!(attempt.tick(), TickOutcome::Stopped);
        assert!(attempt.submit(SubmitTrigger::Expired).is_none());
        assert!(attempt.submit(SubmitTrigger::Explicit).is_none());
    }

    #[test]
    fn mutations_after_submission_have_no_effect() {
        let mut attempt = Attempt::new(two_question_quiz(30)).unwrap();
        attempt.record_answer(0, 0).unwrap();
        attempt.go_next().unwrap();
        attempt.submit(SubmitTrigger::Explicit).unwrap();

        let ledger = attempt.ledger().clone();
        let index = attempt.current_index();
        let remaining = attempt.remaining_seconds();

        assert!(matches!(attempt.record_answer(0, 1), Err(Error::AttemptClosed)));
        assert!(matches!(attempt.answer_current(0), Err(Error::AttemptClosed)));
        assert!(matches!(attempt.go_previous(), Err(Error::AttemptClosed)));
        assert!(matches!(attempt.go_to(0), Err(Error::AttemptClosed)));
        assert!(matches!(attempt.go_next(), Err(Error::AttemptClosed)));
        assert!(matches!(attempt.skip(), Err(Error::AttemptClosed)));
        assert_eq!(attempt.tick(), TickOutcome::Stopped);

        assert_eq!(attempt.ledger(), &ledger);
        assert_eq!(attempt.current_index(), index);
        assert_eq!(attempt.remaining_seconds(), remaining);
    }

    #[test]
    fn skip_keeps_an_existing_answer() {
        let mut attempt = Attempt::new(two_question_quiz(30)).unwrap();
        attempt.answer_current(1).unwrap();
        attempt.skip().unwrap();
        attempt.go_previous().unwrap();
        assert_eq!(attempt.current_question().selected_index, Some(1));
    }

    #[test]
    fn navigation_does_not_reset_the_clock() {
        let mut attempt = Attempt::new(two_question_quiz(10)).unwrap();
        attempt.tick();
        attempt.tick();
        attempt.go_next().unwrap();
        attempt.go_previous().unwrap();
        attempt.go_to(1).unwrap();
        assert_eq!(attempt.remaining_seconds(), 8);
        assert_eq!(attempt.progress().remaining_seconds, 8);
    }

    #[test]
    fn empty_quiz_is_refused() {
        let quiz = Arc::new(QuizDefinition {
            questions: vec![],
            ..(*two_question_quiz(5)).clone()
        });
        let err = Attempt::new(quiz).unwrap_err();
        assert!(matches!(err, Error::QuizUnavailable(_)));
        assert_eq!(err.user_message(), "This quiz is unavailable right now.");
    }

    #[test]
    fn retake_builds_a_fresh_attempt() {
        let mut attempt = Attempt::new(two_question_quiz(5)).unwrap();
        attempt.record_answer(0, 0).unwrap();
        attempt.tick();
        attempt.submit(SubmitTrigger::Explicit).unwrap();

        let fresh = attempt.retake().unwrap();
        assert_ne!(fresh.id(), attempt.id());
        assert_eq!(fresh.status(), AttemptStatus::InProgress);
        assert_eq!(fresh.remaining_seconds(), 5);
        assert_eq!(fresh.ledger().answered_count(), 0);
        assert!(attempt.is_submitted());
    }
}
