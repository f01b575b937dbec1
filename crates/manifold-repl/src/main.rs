use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing_subscriber::EnvFilter;

use manifold_application::Orchestrator;
use manifold_core::{AnalysisSession, ManifoldError, Topic};
use manifold_interaction::{GeminiAnalysisAgent, GeminiImageAgent};
use manifold_view::{SUGGESTED_TOPICS, image_filename, render_session};

const COMMANDS: [&str; 3] = ["/save", "/reset", "/quit"];

/// rustyline helper: completes slash commands at the start of the line,
/// completes and hints the suggested topics otherwise.
#[derive(Clone)]
struct CliHelper;

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        // A slash anywhere but column zero is topic text, not a command.
        let candidates: Vec<Pair> = if line.starts_with('/') {
            COMMANDS
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.to_string(),
                    replacement: cmd.to_string(),
                })
                .collect()
        } else if line.is_empty() {
            vec![]
        } else {
            SUGGESTED_TOPICS
                .iter()
                .filter(|t| t.to_lowercase().starts_with(&line.to_lowercase()))
                .map(|t| Pair {
                    display: t.to_string(),
                    replacement: t.to_string(),
                })
                .collect()
        };
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.is_empty() {
            // Right-arrow accepts the first suggested topic on a blank line.
            return Some(SUGGESTED_TOPICS[0].to_string());
        }
        if line.starts_with('/') && !line.contains(' ') {
            return COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string());
        }
        SUGGESTED_TOPICS
            .iter()
            .find(|t| t.to_lowercase().starts_with(&line.to_lowercase()) && t.len() > line.len())
            .map(|t| t[line.len()..].to_string())
    }
}

impl Validator for CliHelper {}

/// Interactive loop: a line of input is a topic to analyze unless it is one
/// of the slash commands. Submitting while a result is on screen starts a
/// fresh session for the new topic.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let orchestrator = Arc::new(Orchestrator::new(
        Arc::new(GeminiAnalysisAgent::new()),
        Arc::new(GeminiImageAgent::new()),
    ));

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    println!("{}", render_session(&orchestrator.session().await));
    println!(
        "{}",
        "Type a topic to analyze, '/save' to write the generated image, \
'/reset' to start over, or 'quit' to exit."
            .bright_black()
    );
    println!();

    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                match trimmed {
                    "quit" | "exit" | "/quit" => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    "/reset" => {
                        let session = orchestrator.reset().await;
                        println!("{}", render_session(&session));
                    }
                    "/save" => save_image(&orchestrator).await,
                    input => submit_topic(&orchestrator, input).await,
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

async fn submit_topic(orchestrator: &Orchestrator, input: &str) {
    let topic = match Topic::new(input) {
        Ok(topic) => topic,
        Err(ManifoldError::EmptyTopic) => {
            println!("{}", "Please enter a non-empty topic.".yellow());
            return;
        }
        Err(err) => {
            eprintln!("{}", format!("Error: {err}").red());
            return;
        }
    };

    println!(
        "{}",
        format!("Analyzing \"{topic}\" — this launches both provider calls in parallel...")
            .dimmed()
    );

    let session = orchestrator.submit(topic).await;
    println!("{}", render_session(&session));
}

async fn save_image(orchestrator: &Orchestrator) {
    match orchestrator.session().await {
        AnalysisSession::Succeeded {
            topic,
            image: Some(image),
            ..
        } => {
            let filename = image_filename(&topic);
            match image.decode() {
                Ok(bytes) => match std::fs::write(&filename, bytes) {
                    Ok(()) => println!("{}", format!("Saved {filename}").green()),
                    Err(err) => {
                        eprintln!("{}", format!("Failed to write {filename}: {err}").red())
                    }
                },
                Err(err) => {
                    eprintln!(
                        "{}",
                        format!("Image payload could not be decoded: {err}").red()
                    )
                }
            }
        }
        AnalysisSession::Succeeded { image: None, .. } => {
            println!("{}", "No image was generated for this topic.".yellow());
        }
        _ => {
            println!(
                "{}",
                "Nothing to save yet — analyze a topic first.".yellow()
            );
        }
    }
}
