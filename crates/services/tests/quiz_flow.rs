use std::sync::Arc;

use quiz_core::BuiltinQuestionBank;
use quiz_core::model::{Locale, SessionAttributes, SessionId};
use quiz_core::quiz::{QuizSession, QuizState};
use quiz_core::time::fixed_clock;
use serde_json::{Value, json};
use services::handlers::load_quiz;
use services::{
    Intent, ResponseEnvelope, SkillConfig, SkillRequest, SkillRuntime, build_quiz_skill,
};
use storage::{InMemorySessionStore, SessionStore};

fn runtime_with(config: SkillConfig, store: &InMemorySessionStore) -> SkillRuntime {
    let skill = build_quiz_skill(&config, Arc::new(BuiltinQuestionBank));
    SkillRuntime::new(skill, Arc::new(store.clone()), config).with_clock(fixed_clock())
}

fn runtime(store: &InMemorySessionStore) -> SkillRuntime {
    runtime_with(SkillConfig::default(), store)
}

/// Build a platform request body the way the voice service would send it.
fn envelope(
    session_id: &str,
    new: bool,
    locale: &str,
    mut request: Value,
    attributes: &Value,
    screen: bool,
) -> String {
    request["locale"] = json!(locale);
    let interfaces = if screen {
        json!({ "Alexa.Presentation.APL": { "runtime": { "maxVersion": "2023.1" } } })
    } else {
        json!({})
    };
    json!({
        "version": "1.0",
        "session": { "sessionId": session_id, "new": new, "attributes": attributes },
        "context": { "System": { "device": { "supportedInterfaces": interfaces } } },
        "request": request,
    })
    .to_string()
}

fn intent(name: &str) -> Value {
    json!({ "type": "IntentRequest", "intent": { "name": name, "slots": {} } })
}

fn answer(n: u32) -> Value {
    json!({
        "type": "IntentRequest",
        "intent": {
            "name": "AnswerIntent",
            "slots": { "answerIndex": { "name": "answerIndex", "value": n.to_string() } }
        }
    })
}

fn send(runtime: &SkillRuntime, body: &str) -> ResponseEnvelope {
    let raw = runtime.handle_json(body).expect("handle request");
    serde_json::from_str(&raw).expect("decode response")
}

fn speech(response: &ResponseEnvelope) -> &str {
    let ssml = &response
        .response
        .output_speech
        .as_ref()
        .expect("speech present")
        .ssml;
    ssml.trim_start_matches("<speak>").trim_end_matches("</speak>")
}

fn attributes(response: &ResponseEnvelope) -> Value {
    serde_json::to_value(&response.session_attributes).expect("encode attributes")
}

/// Plays launch, start and three answers, feeding session attributes back
/// like the platform does. Returns every response in order.
fn play(locale: &str, answers: [u32; 3], screen: bool) -> Vec<ResponseEnvelope> {
    let store = InMemorySessionStore::new();
    let runtime = runtime(&store);
    let sid = format!("session-{locale}");
    let mut attrs = json!({});
    let mut responses = Vec::new();

    let turns = [json!({ "type": "LaunchRequest" }), intent("StartGameIntent")]
        .into_iter()
        .chain(answers.map(answer));
    for (i, request) in turns.enumerate() {
        let body = envelope(&sid, i == 0, locale, request, &attrs, screen);
        let response = send(&runtime, &body);
        attrs = attributes(&response);
        responses.push(response);
    }
    responses
}

#[test]
fn english_quiz_two_of_three() {
    let responses = play("en-US", [1, 3, 1], false);

    assert!(speech(&responses[0]).starts_with("Welcome to the general knowledge quiz!"));
    assert_eq!(
        speech(&responses[1]),
        "The game has started. Good luck with the questions! In what year did World War II start? \
         The options are: 1) 1939, 2) 1945, 3) 1914, 4) 1950"
    );
    assert_eq!(responses[1].response.should_end_session, Some(false));
    assert!(speech(&responses[2]).starts_with("Correct answer! Very good! What is the capital of Australia?"));
    assert!(speech(&responses[3]).starts_with("Correct answer! Very good! Who painted the Mona Lisa?"));

    let last = &responses[4];
    assert_eq!(
        speech(last),
        "Incorrect response. The correct answer is option number 3. \
         You answered 2 of 3 questions correctly. Your average is 66.67%."
    );
    assert!(last.response.reprompt.is_none());
    assert!(last.response.directives.is_empty());

    let attrs = SessionAttributes::from_map(
        serde_json::from_value(attributes(last)).expect("attribute map"),
    );
    let quiz = load_quiz(&attrs).expect("valid quiz").expect("quiz stored");
    assert_eq!(quiz.state(), QuizState::Completed);
    assert_eq!(quiz.correct_answers(), 2);
    assert!(quiz.completed_at().is_some());
}

#[test]
fn spanish_quiz_two_of_three() {
    let responses = play("es-ES", [1, 3, 1], false);

    assert!(speech(&responses[1]).contains("¿En qué año comenzó la Segunda Guerra Mundial?"));
    assert!(speech(&responses[1]).contains("Las opciones son: 1) 1939, 2) 1945"));
    assert_eq!(
        speech(&responses[4]),
        "Respuesta incorrecta. La respuesta correcta es la opción número 3. \
         Has respondido correctamente 2 de 3 preguntas. Tu promedio es del 66.67%."
    );
}

#[test]
fn perfect_score_reads_one_hundred() {
    let responses = play("en-GB", [1, 3, 3], false);
    assert!(speech(&responses[4]).ends_with("You answered 3 of 3 questions correctly. Your average is 100%."));
}

#[test]
fn screen_devices_get_render_directives() {
    let responses = play("en-US", [1, 3, 1], true);

    let documents = |response: &ResponseEnvelope| -> Vec<String> {
        response
            .response
            .directives
            .iter()
            .map(|d| d["document"]["src"].as_str().unwrap_or_default().to_owned())
            .collect()
    };
    assert_eq!(documents(&responses[0]), vec!["doc://alexa/apl/documents/bienvenido"]);
    assert_eq!(documents(&responses[1]), vec!["doc://alexa/apl/documents/iniciar"]);
    assert_eq!(documents(&responses[2]), vec!["doc://alexa/apl/documents/correcta"]);
    assert_eq!(
        documents(&responses[4]),
        vec![
            "doc://alexa/apl/documents/incorrecta",
            "doc://alexa/apl/documents/fin"
        ]
    );
}

#[test]
fn directives_can_be_disabled() {
    let store = InMemorySessionStore::new();
    let runtime = runtime_with(SkillConfig::default().with_directives(false), &store);
    let body = envelope("s", true, "en-US", json!({ "type": "LaunchRequest" }), &json!({}), true);
    assert!(send(&runtime, &body).response.directives.is_empty());
}

#[test]
fn start_discards_quiz_in_progress() {
    let store = InMemorySessionStore::new();
    let runtime = runtime(&store);
    let sid = SessionId::new("reset");
    let start = SkillRequest::intent(Intent::new("StartGameIntent"), Locale::en_us(), sid.clone());

    runtime.handle_request(&start, None).expect("start");
    for n in ["1", "3"] {
        let request = SkillRequest::intent(
            Intent::new("AnswerIntent").with_slot("answerIndex", n),
            Locale::en_us(),
            sid.clone(),
        );
        runtime.handle_request(&request, None).expect("answer");
    }

    let (response, attrs) = runtime.handle_request(&start, None).expect("restart");
    let quiz = load_quiz(&attrs).expect("valid").expect("stored");
    assert_eq!(quiz.current_question_index(), 0);
    assert_eq!(quiz.correct_answers(), 0);
    assert!(response.speech_text().contains("In what year did World War II start?"));
}

#[test]
fn unsupported_locale_completes_at_zero_percent() {
    let store = InMemorySessionStore::new();
    let runtime = runtime(&store);
    let body = envelope("fr", true, "fr-FR", intent("StartGameIntent"), &json!({}), false);

    let response = send(&runtime, &body);

    assert_eq!(
        speech(&response),
        "The game has started. Good luck with the questions! \
         You answered 0 of 0 questions correctly. Your average is 0%."
    );
}

#[test]
fn answer_outside_a_quiz_apologizes_and_keeps_listening() {
    let store = InMemorySessionStore::new();
    let runtime = runtime(&store);

    let body = envelope("idle", true, "en-US", answer(2), &json!({}), false);
    let response = send(&runtime, &body);

    assert_eq!(speech(&response), "Sorry, there was an error. Please try again.");
    assert_eq!(response.response.should_end_session, Some(false));
    assert!(response.response.reprompt.is_some());
    assert!(response.session_attributes.is_empty());
}

#[test]
fn answer_after_completion_is_rejected_without_changes() {
    let responses = play("en-US", [1, 1, 1], false);
    let finished = attributes(&responses[4]);

    let store = InMemorySessionStore::new();
    let runtime = runtime(&store);
    let body = envelope("late", false, "en-US", answer(1), &finished, false);
    let response = send(&runtime, &body);

    assert_eq!(speech(&response), "Sorry, there was an error. Please try again.");
    assert_eq!(attributes(&response), finished);
}

#[test]
fn session_end_discards_state() {
    let store = InMemorySessionStore::new();
    let runtime = runtime(&store);
    let sid = SessionId::new("ending");

    let start = SkillRequest::intent(Intent::new("StartGameIntent"), Locale::en_us(), sid.clone());
    let (_, attrs) = runtime.handle_request(&start, None).expect("start");
    assert!(attrs.get_raw(QuizSession::ATTRIBUTE_KEY).is_some());

    let ended = SkillRequest::session_ended(Some("USER_INITIATED".into()), Locale::en_us(), sid.clone());
    let (response, attrs) = runtime.handle_request(&ended, None).expect("end");

    assert!(response.speech.is_none());
    assert!(attrs.get_raw(QuizSession::ATTRIBUTE_KEY).is_none());
    assert!(store.get(&sid).is_err());
}

#[test]
fn unknown_intent_is_reflected() {
    let store = InMemorySessionStore::new();
    let runtime = runtime(&store);
    let body = envelope("r", true, "en-US", intent("OrderPizzaIntent"), &json!({}), false);
    assert_eq!(speech(&send(&runtime, &body)), "You just triggered OrderPizzaIntent");
}

#[test]
fn unknown_request_type_gets_the_apology() {
    let store = InMemorySessionStore::new();
    let runtime = runtime(&store);
    let body = envelope("u", true, "es-ES", json!({ "type": "Connections.Response" }), &json!({}), false);
    assert_eq!(
        speech(&send(&runtime, &body)),
        "Lo siento, ha habido un problema. Por favor inténtalo otra vez."
    );
}
