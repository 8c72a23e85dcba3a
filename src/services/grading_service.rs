use crate::dto::result_dto::{GradedAnswer, ScoreReport};
use crate::models::answer_slot::AnswerSlot;
use crate::models::quiz::Question;
use rust_decimal::{Decimal, RoundingStrategy};

/// Inclusive pass mark, in percent.
pub const PASS_THRESHOLD_PERCENT: i64 = 40;

pub struct GradingService;

impl GradingService {
    /// Scores a ledger against the questions it was built from. Unanswered
    /// slots count toward the total but never as correct.
    pub fn score(slots: &[AnswerSlot], questions: &[Question]) -> ScoreReport {
        let graded: Vec<GradedAnswer> = slots
            .iter()
            .enumerate()
            .map(|(idx, slot)| GradedAnswer {
                question_id: slot.question_id.clone(),
                question_text: questions
                    .get(idx)
                    .map(|q| q.text.clone())
                    .unwrap_or_default(),
                selected_index: slot.selected_index,
                correct_answer_index: slot.correct_answer_index,
                is_correct: slot.is_correct(),
                skipped: !slot.is_answered(),
            })
            .collect();

        let total = slots.len();
        let correct_count = graded.iter().filter(|g| g.is_correct).count();
        let percentage = Self::percentage(correct_count, total);

        ScoreReport {
            correct_count,
            total,
            percentage,
            passed: Self::passes(percentage),
            graded,
        }
    }

    /// Two-decimal percentage, rounding half away from zero. Zero when there
    /// is nothing to score.
    pub fn percentage(correct: usize, total: usize) -> Decimal {
        if total == 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(correct as u64) * Decimal::ONE_HUNDRED / Decimal::from(total as u64))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    pub fn passes(percentage: Decimal) -> bool {
        percentage >= Decimal::from(PASS_THRESHOLD_PERCENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn slot(selected: Option<i32>, correct: Option<i32>) -> AnswerSlot {
        AnswerSlot {
            question_id: "q".into(),
            selected_index: selected,
            correct_answer_index: correct,
        }
    }

    #[test]
    fn correct_count_matches_randomized_ledgers() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let len = rng.gen_range(1..30);
            let mut expected = 0;
            let slots: Vec<AnswerSlot> = (0..len)
                .map(|_| {
                    let correct = rng.gen_range(0..4);
                    let selected = match rng.gen_range(0..3) {
                        0 => None,
                        1 => Some(correct),
                        _ => Some((correct + rng.gen_range(1..4)) % 4),
                    };
                    if selected == Some(correct) {
                        expected += 1;
                    }
                    slot(selected, Some(correct))
                })
                .collect();

            let report = GradingService::score(&slots, &[]);
            assert_eq!(report.correct_count, expected);
            assert_eq!(report.total, len);
            assert_eq!(GradingService::score(&slots, &[]), report);
        }
    }

    #[test]
    fn pass_threshold_is_inclusive_at_forty() {
        assert!(GradingService::passes(Decimal::new(4000, 2)));
        assert!(!GradingService::passes(Decimal::new(3999, 2)));

        let two_of_five: Vec<AnswerSlot> = (0..5)
            .map(|i| slot(Some(if i < 2 { 1 } else { 0 }), Some(1)))
            .collect();
        let report = GradingService::score(&two_of_five, &[]);
        assert_eq!(report.percentage, Decimal::new(4000, 2));
        assert!(report.passed);
    }

    #[test]
    fn skipped_and_malformed_slots_never_score() {
        let slots = vec![
            slot(None, Some(0)),
            slot(Some(0), None),
            slot(None, None),
            slot(Some(2), Some(2)),
        ];
        let report = GradingService::score(&slots, &[]);
        assert_eq!(report.correct_count, 1);
        assert_eq!(report.total, 4);
        assert_eq!(report.skipped_count(), 2);
        assert_eq!(report.percentage, Decimal::new(2500, 2));
        assert!(!report.passed);
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        assert_eq!(GradingService::percentage(1, 3), Decimal::new(3333, 2));
        assert_eq!(GradingService::percentage(2, 3), Decimal::new(6667, 2));
        assert_eq!(GradingService::percentage(1, 32), Decimal::new(313, 2));
        assert_eq!(GradingService::percentage(0, 0), Decimal::ZERO);
        assert_eq!(format!("{:.2}", GradingService::percentage(1, 2)), "50.00");
    }

    #[test]
    fn empty_ledger_scores_zero() {
        let report = GradingService::score(&[], &[]);
        assert_eq!(report.total, 0);
        assert_eq!(report.percentage, Decimal::ZERO);
        assert!(!report.passed);
    }
}
