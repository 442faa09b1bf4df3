use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Locale, Question};
use crate::quiz::{AnswerChoice, QuizError, Score};

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Where a conversation stands in the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    NotStarted,
    /// Waiting for the answer to the question at this index.
    AwaitingAnswer(usize),
    Completed,
}

impl QuizState {
    /// Derive the state from the session stored for a conversation, if any.
    #[must_use]
    pub fn of(session: Option<&QuizSession>) -> Self {
        session.map_or(Self::NotStarted, QuizSession::state)
    }
}

/// What the dialogue should say next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizStep {
    /// Pose the question at `index`.
    Ask { index: usize, question: Question },
    /// The quiz is over.
    Finished(Score),
}

/// Whether an answer matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerVerdict {
    Correct,
    /// `correct_option` is the 1-based number of the right option.
    Incorrect { correct_option: usize },
}

impl AnswerVerdict {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

/// Result of applying one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub verdict: AnswerVerdict,
    pub next: QuizStep,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Progress of one quiz inside a conversation session.
///
/// The question list is fixed at start. `current_question_index` only moves
/// forward, one step per answer, and the quiz is complete once it reaches the
/// number of questions. The question being asked is always derived from the
/// index, so the two can not disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSession {
    questions: Vec<Question>,
    current_question_index: usize,
    correct_answers: u32,
    locale: Locale,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Session attribute key the quiz is stored under.
    pub const ATTRIBUTE_KEY: &'static str = "quiz";

    /// Start a fresh quiz and return the first step.
    ///
    /// An empty question list is allowed: the quiz completes immediately and
    /// the step is a `0/0` summary.
    #[must_use]
    pub fn start(
        questions: Vec<Question>,
        locale: Locale,
        started_at: DateTime<Utc>,
    ) -> (Self, QuizStep) {
        let completed_at = questions.is_empty().then_some(started_at);
        let session = Self {
            questions,
            current_question_index: 0,
            correct_answers: 0,
            locale,
            started_at,
            completed_at,
        };
        let step = session.current_step();
        (session, step)
    }

    /// Check an answer against the current question and advance.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` if the quiz is already complete. The
    /// session is left untouched in that case.
    pub fn answer(
        &mut self,
        choice: AnswerChoice,
        answered_at: DateTime<Utc>,
    ) -> Result<AnswerOutcome, QuizError> {
        let question = self
            .current_question()
            .ok_or_else(|| QuizError::InvalidState {
                state: self.state(),
            })?;

        let verdict = if choice.index() == question.correct_answer_index() {
            AnswerVerdict::Correct
        } else {
            AnswerVerdict::Incorrect {
                correct_option: question.correct_option_number(),
            }
        };

        if verdict.is_correct() {
            self.correct_answers = self.correct_answers.saturating_add(1);
        }
        self.current_question_index += 1;
        if self.current_question_index >= self.questions.len() {
            self.completed_at = Some(answered_at);
        }

        Ok(AnswerOutcome {
            verdict,
            next: self.current_step(),
        })
    }

    /// Step for the current position: the pending question or the summary.
    #[must_use]
    pub fn current_step(&self) -> QuizStep {
        match self.current_question() {
            Some(question) => QuizStep::Ask {
                index: self.current_question_index,
                question: question.clone(),
            },
            None => QuizStep::Finished(self.score()),
        }
    }

    /// Validate a session that came back from session storage.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Corrupted` when counters are out of range or a
    /// stored question is invalid.
    pub fn check_invariants(&self) -> Result<(), QuizError> {
        let total = self.questions.len();
        if self.current_question_index > total {
            return Err(QuizError::Corrupted(format!(
                "question index {} exceeds {total} questions",
                self.current_question_index
            )));
        }
        if usize::try_from(self.correct_answers).unwrap_or(usize::MAX) > self.current_question_index
        {
            return Err(QuizError::Corrupted(format!(
                "{} correct answers after {} questions",
                self.correct_answers, self.current_question_index
            )));
        }
        if self.completed_at.is_some() != (self.current_question_index == total) {
            return Err(QuizError::Corrupted("completion timestamp out of sync".into()));
        }
        for question in &self.questions {
            question
                .validate()
                .map_err(|e| QuizError::Corrupted(e.to_string()))?;
        }
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> QuizState {
        if self.current_question_index < self.questions.len() {
            QuizState::AwaitingAnswer(self.current_question_index)
        } else {
            QuizState::Completed
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state() == QuizState::Completed
    }

    /// The question the next answer will be checked against.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_question_index)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn score(&self) -> Score {
        Score::new(self.correct_answers, self.total_questions())
    }

    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question_bank::generate_questions;
    use crate::time::fixed_now;

    fn start_en() -> (QuizSession, QuizStep) {
        let locale = Locale::en_us();
        QuizSession::start(generate_questions(&locale), locale, fixed_now())
    }

    fn choice(number: &str) -> AnswerChoice {
        AnswerChoice::from_slot(number).unwrap()
    }

    #[test]
    fn start_asks_first_question() {
        let (session, step) = start_en();
        assert_eq!(session.state(), QuizState::AwaitingAnswer(0));
        assert_eq!(session.correct_answers(), 0);
        match step {
            QuizStep::Ask { index, question } => {
                assert_eq!(index, 0);
                assert_eq!(&question, session.current_question().unwrap());
            }
            QuizStep::Finished(_) => panic!("expected a question"),
        }
    }

    #[test]
    fn correct_answer_bumps_both_counters() {
        let (mut session, _) = start_en();
        let outcome = session.answer(choice("1"), fixed_now()).unwrap();
        assert_eq!(outcome.verdict, AnswerVerdict::Correct);
        assert_eq!(session.correct_answers(), 1);
        assert_eq!(session.current_question_index(), 1);
        assert!(matches!(outcome.next, QuizStep::Ask { index: 1, .. }));
    }

    #[test]
    fn incorrect_answer_only_advances_index() {
        let (mut session, _) = start_en();
        let outcome = session.answer(choice("2"), fixed_now()).unwrap();
        assert_eq!(
            outcome.verdict,
            AnswerVerdict::Incorrect { correct_option: 1 }
        );
        assert_eq!(session.correct_answers(), 0);
        assert_eq!(session.current_question_index(), 1);
    }

    #[test]
    fn three_answers_complete_the_quiz() {
        let (mut session, _) = start_en();
        session.answer(choice("1"), fixed_now()).unwrap();
        session.answer(choice("3"), fixed_now()).unwrap();
        let last = session.answer(choice("1"), fixed_now()).unwrap();

        assert_eq!(session.state(), QuizState::Completed);
        assert!(session.current_question().is_none());
        assert_eq!(session.completed_at(), Some(fixed_now()));
        assert_eq!(last.next, QuizStep::Finished(Score::new(2, 3)));
        assert_eq!(session.score().percentage_text(), "66.67");
    }

    #[test]
    fn answering_completed_quiz_is_invalid_state() {
        let (mut session, _) = start_en();
        for _ in 0..3 {
            session.answer(choice("1"), fixed_now()).unwrap();
        }
        let before = session.clone();
        let err = session.answer(choice("1"), fixed_now()).unwrap_err();
        assert!(matches!(
            err,
            QuizError::InvalidState {
                state: QuizState::Completed
            }
        ));
        assert_eq!(session, before);
    }

    #[test]
    fn empty_quiz_completes_at_start() {
        let locale = Locale::parse("fr-FR").unwrap();
        let (mut session, step) =
            QuizSession::start(generate_questions(&locale), locale, fixed_now());
        assert_eq!(session.state(), QuizState::Completed);
        assert_eq!(step, QuizStep::Finished(Score::new(0, 0)));
        assert!(session.answer(choice("1"), fixed_now()).is_err());
        session.check_invariants().unwrap();
    }

    #[test]
    fn state_of_missing_session_is_not_started() {
        assert_eq!(QuizState::of(None), QuizState::NotStarted);
        let (session, _) = start_en();
        assert_eq!(QuizState::of(Some(&session)), QuizState::AwaitingAnswer(0));
    }

    #[test]
    fn restored_session_finishes_like_uninterrupted_run() {
        let answers = ["1", "3", "2"];

        let (mut straight, _) = start_en();
        let mut straight_last = None;
        for a in answers {
            straight_last = Some(straight.answer(choice(a), fixed_now()).unwrap());
        }

        let (mut first_half, _) = start_en();
        first_half.answer(choice(answers[0]), fixed_now()).unwrap();
        assert_eq!(first_half.current_question_index(), 1);
        assert_eq!(first_half.correct_answers(), 1);

        let json = serde_json::to_string(&first_half).unwrap();
        let mut resumed: QuizSession = serde_json::from_str(&json).unwrap();
        resumed.check_invariants().unwrap();
        resumed.answer(choice(answers[1]), fixed_now()).unwrap();
        let resumed_last = resumed.answer(choice(answers[2]), fixed_now()).unwrap();

        assert_eq!(Some(resumed_last), straight_last);
        assert_eq!(resumed, straight);
    }

    #[test]
    fn corrupted_counters_are_rejected() {
        let (session, _) = start_en();
        let mut value = serde_json::to_value(&session).unwrap();
        value["currentQuestionIndex"] = 1.into();
        value["correctAnswers"] = 2.into();
        let tampered: QuizSession = serde_json::from_value(value).unwrap();
        assert!(matches!(
            tampered.check_invariants(),
            Err(QuizError::Corrupted(_))
        ));
    }
}
