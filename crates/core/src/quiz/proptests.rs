//! Property-based tests for the quiz state machine
//!
//! These tests verify the session invariants hold for any answer sequence.

use super::*;
use crate::model::{Locale, OPTION_COUNT, Question};
use crate::time::fixed_now;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_question() -> impl Strategy<Value = Question> {
    ("[A-Za-z ?]{1,30}", 0..OPTION_COUNT).prop_map(|(text, correct)| {
        let text = format!("Q {text}");
        let options = ["one", "two", "three", "four"].map(String::from);
        Question::new(text, options, correct).expect("generated question is valid")
    })
}

fn arb_questions() -> impl Strategy<Value = Vec<Question>> {
    prop::collection::vec(arb_question(), 0..6)
}

fn arb_choice() -> impl Strategy<Value = AnswerChoice> {
    (0..OPTION_COUNT).prop_map(|i| AnswerChoice::from_index(i).expect("index in range"))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn invariants_hold_for_any_answer_sequence(
        questions in arb_questions(),
        answers in prop::collection::vec(arb_choice(), 0..10),
    ) {
        let total = questions.len();
        let (mut session, _) = QuizSession::start(questions, Locale::en_us(), fixed_now());
        session.check_invariants().expect("fresh session is consistent");

        for choice in answers {
            let before_index = session.current_question_index();
            let before_correct = session.correct_answers();
            match session.answer(choice, fixed_now()) {
                Ok(outcome) => {
                    prop_assert_eq!(session.current_question_index(), before_index + 1);
                    let expected_correct = before_correct + u32::from(outcome.verdict.is_correct());
                    prop_assert_eq!(session.correct_answers(), expected_correct);
                }
                Err(QuizError::InvalidState { state }) => {
                    prop_assert_eq!(state, QuizState::Completed);
                    prop_assert_eq!(session.current_question_index(), before_index);
                    prop_assert_eq!(session.correct_answers(), before_correct);
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }

            prop_assert!(session.current_question_index() <= total);
            prop_assert!(session.correct_answers() as usize <= session.current_question_index());
            session.check_invariants().expect("session stays consistent");
        }
    }

    #[test]
    fn all_correct_scores_one_hundred(questions in prop::collection::vec(arb_question(), 1..6)) {
        let (mut session, _) = QuizSession::start(questions.clone(), Locale::en_us(), fixed_now());
        for q in &questions {
            let choice = AnswerChoice::from_index(q.correct_answer_index()).expect("valid index");
            session.answer(choice, fixed_now()).expect("quiz still running");
        }
        prop_assert!(session.is_complete());
        prop_assert_eq!(session.score().percentage_text(), "100");
    }

    #[test]
    fn start_always_resets_progress(questions in arb_questions(), answered in 0usize..4) {
        let (mut session, _) = QuizSession::start(questions.clone(), Locale::en_us(), fixed_now());
        for _ in 0..answered {
            let _ = session.answer(AnswerChoice::from_index(0).expect("valid index"), fixed_now());
        }
        let (restarted, _) = QuizSession::start(questions, Locale::en_us(), fixed_now());
        prop_assert_eq!(restarted.current_question_index(), 0);
        prop_assert_eq!(restarted.correct_answers(), 0);
    }
}
