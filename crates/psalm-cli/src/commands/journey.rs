//! Line-oriented journey on stdin.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use psalm_core::models::{Mood, Posture, Session, Stage};
use psalm_core::{PsalmConfig, PsalmError};
use psalm_embeddings::{create_embedder, create_generator};
use psalm_journey::Journey;

const HELP: &str = "\
commands:
  posture [mood] [text]   confirm your posture at the Gates
  seek <query>            search the Psalms (Courts)
  pick <unit id>          choose a passage and receive a reflection
  retry                   ask again for the reflection
  status                  show where you are
  restart                 begin again at the Gates
  quit";

#[derive(Debug, PartialEq)]
enum ReplCommand {
    Posture(Posture),
    Seek(String),
    Pick(String),
    Retry,
    Status,
    Restart,
    Help,
    Quit,
}

fn parse_line(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match verb {
        "posture" => {
            let (first, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Ok(match first.parse::<Mood>() {
                Ok(mood) => ReplCommand::Posture(Posture::new(mood, tail.trim())),
                _ => ReplCommand::Posture(Posture::new(Mood::None, rest)),
            })
        }
        "seek" => Ok(ReplCommand::Seek(rest.to_string())),
        "pick" if !rest.is_empty() => Ok(ReplCommand::Pick(rest.to_string())),
        "pick" => Err("pick needs a unit id".to_string()),
        "retry" => Ok(ReplCommand::Retry),
        "status" => Ok(ReplCommand::Status),
        "restart" => Ok(ReplCommand::Restart),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" => Ok(ReplCommand::Quit),
        other => Err(format!("unknown command: {other}")),
    }
}

pub fn run(config: &PsalmConfig) -> anyhow::Result<()> {
    let store = super::open_store(config)?;
    let embedder = Arc::from(create_embedder(&config.embedding)?);
    let generator = Arc::from(create_generator(&config.generation)?);
    let journey = Journey::new(store, embedder, generator);
    let k = config.retrieval.default_k;

    println!("{HELP}\n");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        let stage = journey.snapshot().map(|s| s.stage).unwrap_or_default();
        print!("{stage}> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };

        let outcome = match command {
            ReplCommand::Quit => break,
            ReplCommand::Help => {
                println!("{HELP}");
                continue;
            }
            ReplCommand::Posture(posture) => journey.confirm_posture_with(posture),
            ReplCommand::Seek(query) => journey.retrieve(&query, k),
            ReplCommand::Pick(unit_id) => journey.select_unit(&unit_id),
            ReplCommand::Retry => journey.retry_reflection(),
            ReplCommand::Status => journey.snapshot(),
            ReplCommand::Restart => journey.restart(),
        };

        match outcome {
            Ok(session) => render(&journey, &session),
            Err(err) => report(&err),
        }
    }
    Ok(())
}

fn render(journey: &Journey, session: &Session) {
    match session.stage {
        Stage::Gates => println!("You stand at the Gates. Confirm your posture to enter."),
        Stage::Courts => match &session.last_results {
            None => println!("You are in the Courts. Seek a Psalm."),
            Some(results) => {
                for (rank, hit) in results.hits.iter().enumerate() {
                    let preview = journey
                        .passage(&hit.unit_id)
                        .and_then(|p| p.lines().find(|l| !l.starts_with("## ")))
                        .unwrap_or_default();
                    println!("{}. {} ({:.3})  {preview}", rank + 1, hit.unit_id, hit.score);
                }
            }
        },
        Stage::HolyOfHolies => {
            if let Some(id) = &session.selected_unit_id {
                println!("{}\n", journey.passage(id).unwrap_or_default());
            }
            match &session.reflection_text {
                Some(text) => println!("{text}"),
                None => println!("No reflection yet. Type `retry` to ask again."),
            }
        }
    }
}

fn report(err: &PsalmError) {
    println!("{}", err.user_message());
    println!("  ({err})");
}
