//! Starting a quiz and answering its questions.

use std::sync::Arc;

use quiz_core::QuestionBank;
use quiz_core::model::{Question, SessionAttributes};
use quiz_core::quiz::{AnswerChoice, AnswerVerdict, QuizError, QuizSession, QuizState, QuizStep, Score};

use crate::directives::{DocumentId, screen_data};
use crate::dispatch::{HandlerInput, RequestHandler};
use crate::error::HandlerError;
use crate::handlers::intents;
use crate::i18n::MessageKey;
use crate::response::{Response, ResponseBuilder};

/// Slot carrying the 1-based option number the user picked.
pub const ANSWER_SLOT: &str = "answerIndex";

//
// ─── SESSION HELPERS ───────────────────────────────────────────────────────────
//

/// Quiz stored in the session, if one was started.
///
/// # Errors
///
/// Fails when the stored value does not decode or breaks the quiz invariants.
pub fn load_quiz(session: &SessionAttributes) -> Result<Option<QuizSession>, quiz_core::Error> {
    let Some(quiz) = session.get::<QuizSession>(QuizSession::ATTRIBUTE_KEY)? else {
        return Ok(None);
    };
    quiz.check_invariants()?;
    Ok(Some(quiz))
}

/// Write `quiz` back into the session.
///
/// # Errors
///
/// Fails only if the quiz can not be encoded.
pub fn save_quiz(session: &mut SessionAttributes, quiz: &QuizSession) -> Result<(), quiz_core::Error> {
    session.set(QuizSession::ATTRIBUTE_KEY, quiz)?;
    Ok(())
}

//
// ─── SPEECH ────────────────────────────────────────────────────────────────────
//

fn ask(input: &HandlerInput<'_>, prefix: &str, question: &Question) -> ResponseBuilder {
    let options = question.numbered_options().join(", ");
    let speech = format!(
        "{prefix} {} {}",
        question.text(),
        input.t(MessageKey::Options, &[&options])
    );
    ResponseBuilder::new().speak(speech).reprompt(question.text())
}

fn summary(
    input: &HandlerInput<'_>,
    builder: ResponseBuilder,
    prefix: &str,
    score: Score,
) -> ResponseBuilder {
    let correct = score.correct.to_string();
    let total = score.total.to_string();
    let percentage = score.percentage_text();
    let text = input.t(MessageKey::Summary, &[&correct, &total, &percentage]);
    builder
        .speak(format!("{prefix} {text}"))
        .add_optional_directive(input.directive(DocumentId::Finish, screen_data(&text)))
}

//
// ─── HANDLERS ──────────────────────────────────────────────────────────────────
//

/// Starts a fresh quiz, replacing any quiz already in the session.
pub struct StartGameIntentHandler {
    questions: Arc<dyn QuestionBank>,
}

impl StartGameIntentHandler {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionBank>) -> Self {
        Self { questions }
    }
}

impl RequestHandler for StartGameIntentHandler {
    fn name(&self) -> &'static str {
        "StartGameIntentHandler"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.request().is_intent(intents::START_GAME)
    }

    fn handle(&self, input: &mut HandlerInput<'_>) -> Result<Response, HandlerError> {
        let locale = input.request().locale().clone();
        let questions = self.questions.questions_for(&locale);
        if questions.is_empty() {
            tracing::warn!(locale = %locale, "no questions for locale");
        }

        let (quiz, step) = QuizSession::start(questions, locale, input.now());
        save_quiz(input.session_mut(), &quiz)?;
        tracing::info!(
            session_id = %input.request().session_id(),
            total = quiz.total_questions(),
            "quiz started"
        );

        let start = input.t(MessageKey::Start, &[]);
        let builder = match step {
            QuizStep::Ask { question, .. } => ask(input, &start, &question).add_optional_directive(
                input.directive(DocumentId::Start, screen_data(question.text())),
            ),
            QuizStep::Finished(score) => summary(input, ResponseBuilder::new(), &start, score),
        };
        Ok(builder.build())
    }
}

/// Checks the user's answer and moves to the next question or the summary.
pub struct AnswerIntentHandler;

impl RequestHandler for AnswerIntentHandler {
    fn name(&self) -> &'static str {
        "AnswerIntentHandler"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.request().is_intent(intents::ANSWER)
    }

    fn handle(&self, input: &mut HandlerInput<'_>) -> Result<Response, HandlerError> {
        let Some(mut quiz) = load_quiz(input.session())? else {
            return Err(QuizError::InvalidState {
                state: QuizState::NotStarted,
            }
            .into());
        };
        // A finished quiz rejects answers before the slot is even looked at.
        if quiz.is_complete() {
            return Err(QuizError::InvalidState {
                state: quiz.state(),
            }
            .into());
        }

        let raw = input
            .request()
            .slot(ANSWER_SLOT)
            .ok_or(HandlerError::MissingSlot(ANSWER_SLOT))?;
        let choice = AnswerChoice::from_slot(raw)?;

        let outcome = quiz.answer(choice, input.now())?;
        save_quiz(input.session_mut(), &quiz)?;
        tracing::info!(
            session_id = %input.request().session_id(),
            answer = choice.option_number(),
            correct = outcome.verdict.is_correct(),
            "answer checked"
        );

        let (verdict, document) = match outcome.verdict {
            AnswerVerdict::Correct => (input.t(MessageKey::Correct, &[]), DocumentId::Correct),
            AnswerVerdict::Incorrect { correct_option } => (
                input.t(MessageKey::Incorrect, &[&correct_option.to_string()]),
                DocumentId::Incorrect,
            ),
        };
        let verdict_directive = input.directive(document, screen_data(&verdict));

        let builder = match outcome.next {
            QuizStep::Ask { question, .. } => {
                ask(input, &verdict, &question).add_optional_directive(verdict_directive)
            }
            QuizStep::Finished(score) => {
                tracing::info!(
                    session_id = %input.request().session_id(),
                    score = %score,
                    "quiz completed"
                );
                let builder = ResponseBuilder::new().add_optional_directive(verdict_directive);
                summary(input, builder, &verdict, score)
            }
        };
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Intent, SkillRequest};
    use quiz_core::BuiltinQuestionBank;
    use quiz_core::model::{Locale, SessionId};
    use quiz_core::time::fixed_clock;

    fn start_handler() -> StartGameIntentHandler {
        StartGameIntentHandler::new(Arc::new(BuiltinQuestionBank))
    }

    fn run(handler: &dyn RequestHandler, request: &SkillRequest, attrs: &mut SessionAttributes) -> Response {
        let mut input = HandlerInput::new(request, attrs, fixed_clock());
        assert!(handler.can_handle(&input), "{}", handler.name());
        handler.handle(&mut input).unwrap()
    }

    fn answer(n: &str) -> SkillRequest {
        SkillRequest::intent(
            Intent::new(intents::ANSWER).with_slot(ANSWER_SLOT, n),
            Locale::en_us(),
            SessionId::new("s"),
        )
    }

    fn start(locale: &str) -> SkillRequest {
        SkillRequest::intent(
            Intent::new(intents::START_GAME),
            Locale::parse(locale).unwrap(),
            SessionId::new("s"),
        )
    }

    #[test]
    fn start_asks_first_question_with_options() {
        let mut attrs = SessionAttributes::new();
        let response = run(&start_handler(), &start("en-US"), &mut attrs);

        assert_eq!(
            response.speech_text(),
            "The game has started. Good luck with the questions! In what year did World War II start? \
             The options are: 1) 1939, 2) 1945, 3) 1914, 4) 1950"
        );
        assert_eq!(
            response.reprompt.as_deref(),
            Some("In what year did World War II start?")
        );
        let quiz = load_quiz(&attrs).unwrap().unwrap();
        assert_eq!(quiz.state(), QuizState::AwaitingAnswer(0));
    }

    #[test]
    fn wrong_answer_names_the_right_option() {
        let mut attrs = SessionAttributes::new();
        run(&start_handler(), &start("en-US"), &mut attrs);
        let response = run(&AnswerIntentHandler, &answer("2"), &mut attrs);

        assert!(response.speech_text().starts_with(
            "Incorrect response. The correct answer is option number 1. What is the capital of Australia?"
        ));
        let quiz = load_quiz(&attrs).unwrap().unwrap();
        assert_eq!(quiz.correct_answers(), 0);
        assert_eq!(quiz.current_question_index(), 1);
    }

    #[test]
    fn last_answer_reads_the_summary() {
        let mut attrs = SessionAttributes::new();
        run(&start_handler(), &start("en-US"), &mut attrs);
        run(&AnswerIntentHandler, &answer("1"), &mut attrs);
        run(&AnswerIntentHandler, &answer("3"), &mut attrs);
        let response = run(&AnswerIntentHandler, &answer("1"), &mut attrs);

        assert_eq!(
            response.speech_text(),
            "Incorrect response. The correct answer is option number 3. \
             You answered 2 of 3 questions correctly. Your average is 66.67%."
        );
        assert!(response.reprompt.is_none());
        assert_eq!(response.should_end_session, None);
        assert!(load_quiz(&attrs).unwrap().unwrap().is_complete());
    }

    #[test]
    fn unsupported_locale_finishes_immediately() {
        let mut attrs = SessionAttributes::new();
        let response = run(&start_handler(), &start("fr-FR"), &mut attrs);
        assert_eq!(
            response.speech_text(),
            "The game has started. Good luck with the questions! \
             You answered 0 of 0 questions correctly. Your average is 0%."
        );
        assert_eq!(
            load_quiz(&attrs).unwrap().unwrap().state(),
            QuizState::Completed
        );
    }

    #[test]
    fn answer_without_quiz_is_invalid_state() {
        let mut attrs = SessionAttributes::new();
        let request = answer("1");
        let mut input = HandlerInput::new(&request, &mut attrs, fixed_clock());
        let err = AnswerIntentHandler.handle(&mut input).unwrap_err();
        assert!(matches!(
            err,
            HandlerError::Quiz(QuizError::InvalidState {
                state: QuizState::NotStarted
            })
        ));
    }

    #[test]
    fn bad_slot_leaves_quiz_untouched() {
        let mut attrs = SessionAttributes::new();
        run(&start_handler(), &start("en-US"), &mut attrs);
        let before = attrs.clone();

        for raw in ["0", "5", "two"] {
            let request = answer(raw);
            let mut input = HandlerInput::new(&request, &mut attrs, fixed_clock());
            let err = AnswerIntentHandler.handle(&mut input).unwrap_err();
            assert!(
                matches!(err, HandlerError::Quiz(QuizError::InvalidAnswer(_))),
                "{raw}"
            );
        }
        assert_eq!(attrs, before);
    }

    #[test]
    fn missing_slot_is_reported() {
        let mut attrs = SessionAttributes::new();
        run(&start_handler(), &start("en-US"), &mut attrs);
        let request = SkillRequest::intent(
            Intent::new(intents::ANSWER),
            Locale::en_us(),
            SessionId::new("s"),
        );
        let mut input = HandlerInput::new(&request, &mut attrs, fixed_clock());
        let err = AnswerIntentHandler.handle(&mut input).unwrap_err();
        assert!(matches!(err, HandlerError::MissingSlot(ANSWER_SLOT)));
    }

    #[test]
    fn restart_discards_progress() {
        let mut attrs = SessionAttributes::new();
        run(&start_handler(), &start("en-US"), &mut attrs);
        run(&AnswerIntentHandler, &answer("1"), &mut attrs);
        run(&start_handler(), &start("en-US"), &mut attrs);

        let quiz = load_quiz(&attrs).unwrap().unwrap();
        assert_eq!(quiz.current_question_index(), 0);
        assert_eq!(quiz.correct_answers(), 0);
    }
}
