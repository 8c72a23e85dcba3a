use crate::error::{Error, Result};
use crate::models::answer_slot::AnswerSlot;
use crate::models::quiz::Question;

/// One answer slot per question, in question order. Slots are never added or
/// removed after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerLedger {
    slots: Vec<AnswerSlot>,
}

impl AnswerLedger {
    pub fn new(questions: &[Question]) -> Self {
        let slots = questions
            .iter()
            .enumerate()
            .map(|(idx, q)| AnswerSlot {
                question_id: q.id_or_position(idx),
                selected_index: None,
                correct_answer_index: q.correct_answer_index,
            })
            .collect();
        Self { slots }
    }

    /// Overwrites the selection at `index`. The option itself is not range
    /// checked; an impossible option just never scores.
    pub fn record(&mut self, index: usize, selected: i32) -> Result<()> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(Error::OutOfBounds { index, len })?;
        slot.selected_index = Some(selected);
        Ok(())
    }

    pub fn slots(&self) -> &[AnswerSlot] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&AnswerSlot> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_answered()).count()
    }
}
