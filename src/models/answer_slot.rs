use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSlot {
    pub question_id: String,
    /// `None` until a selection is made.
    pub selected_index: Option<i32>,
    pub correct_answer_index: Option<i32>,
}

impl AnswerSlot {
    pub fn is_answered(&self) -> bool {
        self.selected_index.is_some()
    }

    pub fn is_correct(&self) -> bool {
        match (self.selected_index, self.correct_answer_index) {
            (Some(selected), Some(correct)) => selected == correct,
            _ => false,
        }
    }
}
