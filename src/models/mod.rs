pub mod answer_slot;
pub mod attempt;
pub mod quiz;
