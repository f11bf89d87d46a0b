use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use coach_core::model::Role;
use gateway::{BackendConfig, HttpBackend};
use services::{FlowStatus, FlowView, SessionFlow, NO_QUESTION_MESSAGE};
use speech::{EspeakSynthesis, SpeechInput, SpeechOutput};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for ArgsError {}

struct Args {
    backend_url: Option<String>,
    role: Role,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut backend_url = None;
        let mut role = std::env::var("COACH_ROLE").map_or_else(|_| Role::default(), Role::new);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--backend" => {
                    backend_url =
                        Some(args.next().ok_or(ArgsError::MissingValue { flag: "--backend" })?);
                }
                "--role" => {
                    role = Role::new(args.next().ok_or(ArgsError::MissingValue { flag: "--role" })?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { backend_url, role })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--backend <url>] [--role <name>]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  COACH_BACKEND_URL, COACH_ROLE, RUST_LOG");
    eprintln!();
    eprintln!("Commands inside the session:");
    eprintln!("  role <name>     switch interview track (history resets)");
    eprintln!("  draft <text>    replace the answer draft");
    eprintln!("  mic             capture a spoken answer (appends to draft)");
    eprintln!("  submit          send the draft for scoring");
    eprintln!("  next            fetch a new question");
    eprintln!("  prev            go back to the previous question");
    eprintln!("  retry           re-show the current question with a clean slate");
    eprintln!("  say             speak the current question aloud");
    eprintln!("  show            reprint the current state");
    eprintln!("  quit            end the session");
}

fn render(view: &FlowView) {
    println!();
    println!("[{}] session {}", view.role, view.session_id);
    match &view.status {
        FlowStatus::Loading => println!("Loading question..."),
        FlowStatus::Error(message) => println!("Error: {message}"),
        FlowStatus::Empty => println!("{NO_QUESTION_MESSAGE}"),
        FlowStatus::Ready => {
            if let Some(question) = &view.question {
                println!("Question: {question}");
            }
        }
    }
    if !view.draft.is_empty() {
        println!("Draft: {}", view.draft);
    }
    if let Some(feedback) = &view.feedback {
        if let Some(score) = feedback.overall_score() {
            println!("Your Score: {score}/10");
        }
        println!("Feedback: {feedback}");
    }
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).inspect_err(|err| {
        eprintln!("{err}");
        print_usage();
    })?;

    let backend = match args.backend_url {
        Some(base_url) => HttpBackend::new(BackendConfig { base_url }),
        None => HttpBackend::from_env(),
    };

    // Speech input needs a host recognition engine; none is wired for the
    // terminal, so the mic command surfaces the unsupported notice.
    let speech_in = SpeechInput::unsupported();
    let speech_out = match EspeakSynthesis::detect() {
        Some(engine) => SpeechOutput::new(Arc::new(engine)),
        None => SpeechOutput::disabled(),
    };

    let mut flow = SessionFlow::new(Arc::new(backend), speech_in, speech_out, args.role);
    flow.start().await;
    render(&flow.view());

    let stdin = io::stdin();
    prompt()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let (command, rest) = match line.trim().split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line.trim(), ""),
        };

        match command {
            "" => {}
            "role" if !rest.is_empty() => flow.select_role(Role::new(rest)).await,
            "role" => eprintln!("role requires a name"),
            "draft" => flow.set_draft(rest),
            "mic" => flow.capture_answer().await,
            "stop" => flow.stop_capture(),
            "submit" => flow.submit_answer().await,
            "next" => flow.next_question().await,
            "prev" => flow.previous_question(),
            "retry" => flow.try_again(),
            "say" => flow.play_question(),
            "show" => {}
            "quit" | "exit" => break,
            _ => {
                eprintln!("unknown command: {command}");
                print_usage();
            }
        }

        if let Some(notice) = flow.take_notice() {
            println!("{notice}");
        }
        render(&flow.view());
        prompt()?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
