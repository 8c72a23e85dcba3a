use crate::models::attempt::AttemptStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub correct_count: usize,
    pub total: usize,
    pub percentage: Decimal,
    pub passed: bool,
    pub graded: Vec<GradedAnswer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedAnswer {
    pub question_id: String,
    pub question_text: String,
    pub selected_index: Option<i32>,
    pub correct_answer_index: Option<i32>,
    pub is_correct: bool,
    pub skipped: bool,
}

impl ScoreReport {
    pub fn skipped_count(&self) -> usize {
        self.graded.iter().filter(|g| g.skipped).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptProgress {
    pub status: AttemptStatus,
    pub current_question_index: usize,
    pub questions_answered: usize,
    pub total_questions: usize,
    pub remaining_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub question_id: String,
    pub text: String,
    pub options: Vec<String>,
    pub selected_index: Option<i32>,
    pub remaining_seconds: u32,
}

impl QuestionView {
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }
}
