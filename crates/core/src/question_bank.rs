//! Fixed trivia question sets, one per supported language.

use crate::model::{Locale, OPTION_COUNT, Question};

/// Source of the questions a quiz is started with.
pub trait QuestionBank: Send + Sync {
    /// Ordered questions for `locale`; empty when the locale is unsupported.
    fn questions_for(&self, locale: &Locale) -> Vec<Question>;
}

/// The built-in three-question bank in English and Spanish.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinQuestionBank;

impl QuestionBank for BuiltinQuestionBank {
    fn questions_for(&self, locale: &Locale) -> Vec<Question> {
        generate_questions(locale)
    }
}

struct Entry {
    text: &'static str,
    options: [&'static str; OPTION_COUNT],
    correct: usize,
}

const EN: [Entry; 3] = [
    Entry {
        text: "In what year did World War II start?",
        options: ["1939", "1945", "1914", "1950"],
        correct: 0,
    },
    Entry {
        text: "What is the capital of Australia?",
        options: ["Melbourne", "Sydney", "Canberra", "Brisbane"],
        correct: 2,
    },
    Entry {
        text: "Who painted the Mona Lisa?",
        options: [
            "Pablo Picasso",
            "Vincent van Gogh",
            "Leonardo da Vinci",
            "Salvador Dalí",
        ],
        correct: 2,
    },
];

const ES: [Entry; 3] = [
    Entry {
        text: "¿En qué año comenzó la Segunda Guerra Mundial?",
        options: ["1939", "1945", "1914", "1950"],
        correct: 0,
    },
    Entry {
        text: "¿Cuál es la capital de Australia?",
        options: ["Melbourne", "Sydney", "Canberra", "Brisbane"],
        correct: 2,
    },
    Entry {
        text: "¿Quién pintó la Mona Lisa?",
        options: [
            "Pablo Picasso",
            "Vincent van Gogh",
            "Leonardo da Vinci",
            "Salvador Dalí",
        ],
        correct: 2,
    },
];

/// Questions for `locale`, matched on the language subtag.
///
/// Unsupported languages yield an empty list rather than an error; callers
/// decide how to treat a quiz with no questions.
#[must_use]
pub fn generate_questions(locale: &Locale) -> Vec<Question> {
    let entries: &[Entry] = match locale.language() {
        "en" => &EN,
        "es" => &ES,
        _ => &[],
    };

    entries
        .iter()
        .filter_map(|entry| {
            Question::new(entry.text, entry.options.map(String::from), entry.correct).ok()
        })
        .collect()
}
