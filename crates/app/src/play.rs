//! Line commands for playing the skill from a terminal.

use std::fmt;

use services::handlers::{ANSWER_SLOT, intents};
use services::{Intent, RequestKind, Response};

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    Request(RequestKind),
    Quit,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    UnknownCommand(String),
    MissingArgument { command: &'static str },
    MalformedSlot(String),
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd} (try `help`)"),
            TurnError::MissingArgument { command } => write!(f, "{command} requires an argument"),
            TurnError::MalformedSlot(raw) => write!(f, "expected slot=value, got {raw}"),
        }
    }
}

impl std::error::Error for TurnError {}

fn intent(name: &str) -> Turn {
    Turn::Request(RequestKind::Intent(Intent::new(name)))
}

fn answer(raw: &str) -> Turn {
    Turn::Request(RequestKind::Intent(
        Intent::new(intents::ANSWER).with_slot(ANSWER_SLOT, raw),
    ))
}

/// Parse a line such as `start`, `answer 2`, `3` or `intent Foo slot=value`.
pub fn parse_turn(line: &str) -> Result<Turn, TurnError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(Turn::Empty);
    };

    let turn = match command.to_ascii_lowercase().as_str() {
        "launch" => Turn::Request(RequestKind::Launch),
        "start" => intent(intents::START_GAME),
        "answer" => {
            let raw = words
                .next()
                .ok_or(TurnError::MissingArgument { command: "answer" })?;
            answer(raw)
        }
        "hello" => intent(intents::HELLO_WORLD),
        "help" => intent(intents::HELP),
        "stop" => intent(intents::STOP),
        "cancel" => intent(intents::CANCEL),
        "fallback" => intent(intents::FALLBACK),
        "end" => Turn::Request(RequestKind::SessionEnded {
            reason: Some("USER_INITIATED".to_owned()),
        }),
        "intent" => {
            let name = words
                .next()
                .ok_or(TurnError::MissingArgument { command: "intent" })?;
            let mut intent = Intent::new(name);
            for slot in words {
                let (key, value) = slot
                    .split_once('=')
                    .ok_or_else(|| TurnError::MalformedSlot(slot.to_owned()))?;
                intent = intent.with_slot(key, value);
            }
            return Ok(Turn::Request(RequestKind::Intent(intent)));
        }
        "quit" | "exit" => Turn::Quit,
        _ if command.chars().all(|c| c.is_ascii_digit()) => answer(command),
        _ => return Err(TurnError::UnknownCommand(command.to_owned())),
    };
    Ok(turn)
}

/// Render a response for the terminal.
pub fn render(response: &Response) -> String {
    let mut out = String::new();
    match response.speech.as_deref() {
        Some(speech) => out.push_str(speech),
        None => out.push_str("(silence)"),
    }
    if let Some(reprompt) = response.reprompt.as_deref() {
        out.push_str("\n  reprompt: ");
        out.push_str(reprompt);
    }
    for directive in &response.directives {
        let src = directive["document"]["src"].as_str().unwrap_or("?");
        out.push_str("\n  screen: ");
        out.push_str(src);
    }
    out
}
