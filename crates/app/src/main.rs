mod play;

use std::fmt;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::model::{Locale, SessionId};
use quiz_core::{BuiltinQuestionBank, Clock};
use services::request::APL_INTERFACE;
use services::{RequestKind, SkillConfig, SkillRequest, SkillRuntime, build_quiz_skill};
use storage::InMemorySessionStore;
use tracing_subscriber::{EnvFilter, fmt as log_fmt, layer::SubscriberExt, util::SubscriberInitExt};

use play::{Turn, parse_turn, render};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidLocale { raw: String },
    EmptyToken,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLocale { raw } => write!(f, "invalid --locale value: {raw}"),
            ArgsError::EmptyToken => write!(f, "--token must not be empty"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- handle [--input <file>] [options]   # one JSON request, stdin by default");
    eprintln!("  cargo run -p app -- play   [--screen] [options]          # interactive session");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --locale <tag>     default locale (en-US)");
    eprintln!("  --no-directives    never attach screen directives");
    eprintln!("  --token <token>    directive token (documentToken)");
    eprintln!("  --json-logs        log as JSON lines on stderr");
    eprintln!();
    eprintln!("Play commands:");
    eprintln!("  launch, start, answer <n> or <n>, hello, help, stop, cancel, fallback, end,");
    eprintln!("  intent <Name> [slot=value ...], quit");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DEFAULT_LOCALE, QUIZ_DIRECTIVES=0, QUIZ_DIRECTIVE_TOKEN, QUIZ_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Handle,
    Play,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "handle" => Some(Self::Handle),
            "play" => Some(Self::Play),
            _ => None,
        }
    }
}

struct Args {
    config: SkillConfig,
    input: Option<PathBuf>,
    screen: bool,
    json_logs: bool,
}

impl Args {
    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut config = SkillConfig::default();
        if let Ok(raw) = std::env::var("QUIZ_DEFAULT_LOCALE") {
            config = config.with_default_locale(parse_locale(raw)?);
        }
        if std::env::var("QUIZ_DIRECTIVES").is_ok_and(|v| v == "0" || v == "false") {
            config = config.with_directives(false);
        }
        if let Ok(token) = std::env::var("QUIZ_DIRECTIVE_TOKEN") {
            if !token.trim().is_empty() {
                config = config.with_directive_token(token);
            }
        }

        let mut input = None;
        let mut screen = false;
        let mut json_logs = false;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--locale" => {
                    let value = require_value(args, "--locale")?;
                    config = config.with_default_locale(parse_locale(value)?);
                }
                "--no-directives" => config = config.with_directives(false),
                "--token" => {
                    let value = require_value(args, "--token")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::EmptyToken);
                    }
                    config = config.with_directive_token(value);
                }
                "--input" if cmd == Command::Handle => {
                    input = Some(PathBuf::from(require_value(args, "--input")?));
                }
                "--screen" if cmd == Command::Play => screen = true,
                "--json-logs" => json_logs = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            config,
            input,
            screen,
            json_logs,
        })
    }
}

fn parse_locale(raw: String) -> Result<Locale, ArgsError> {
    Locale::parse(&raw).map_err(|_| ArgsError::InvalidLocale { raw })
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_env("QUIZ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let json_layer = json.then(|| log_fmt::layer().json().with_writer(io::stderr));
    let text_layer = (!json).then(|| log_fmt::layer().with_writer(io::stderr));
    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn build_runtime(config: SkillConfig) -> SkillRuntime {
    let skill = build_quiz_skill(&config, Arc::new(BuiltinQuestionBank));
    SkillRuntime::new(skill, Arc::new(InMemorySessionStore::new()), config)
        .with_clock(Clock::system())
}

fn handle(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let body = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut body = String::new();
            io::stdin().read_to_string(&mut body)?;
            body
        }
    };
    let runtime = build_runtime(args.config);
    let response = runtime.handle_json(&body)?;
    println!("{response}");
    Ok(())
}

fn play(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let locale = args.config.default_locale.clone();
    let runtime = build_runtime(args.config);
    let mut session_id = SessionId::generate();
    let mut new_session = true;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        match parse_turn(&line) {
            Ok(Turn::Quit) => break,
            Ok(Turn::Empty) => {}
            Ok(Turn::Request(kind)) => {
                let mut request = SkillRequest::new(kind, locale.clone(), session_id.clone())
                    .with_new_session(new_session);
                if args.screen {
                    request = request.with_interface(APL_INTERFACE);
                }
                let ends = matches!(request.kind(), RequestKind::SessionEnded { .. });
                let (response, _) = runtime.handle_request(&request, None)?;
                new_session = false;
                writeln!(stdout, "{}", render(&response))?;

                if ends || response.should_end_session == Some(true) {
                    writeln!(stdout, "[session ended]")?;
                    session_id = SessionId::generate();
                    new_session = true;
                }
            }
            Err(err) => writeln!(stdout, "{err}")?,
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    let cmd = match argv.next() {
        None => {
            print_usage();
            return Err(Box::new(io::Error::new(
                io::ErrorKind::InvalidInput,
                "missing subcommand",
            )));
        }
        Some(first) if first == "--help" || first == "-h" => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(&first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            io::Error::new(io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    let parsed = Args::parse(cmd, &mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    init_tracing(parsed.json_logs);
    tracing::debug!(command = ?cmd, locale = %parsed.config.default_locale, "starting");

    match cmd {
        Command::Handle => handle(parsed),
        Command::Play => play(parsed),
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
