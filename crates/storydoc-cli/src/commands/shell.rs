//! Interactive session.
//!
//! A line-oriented presentation layer: every command dispatches one event to
//! the workflow controller and then redraws from its `SessionView`. Input is
//! read only between flows, so nothing re-enters the controller while an
//! upload or generate call is in flight.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use storydoc_application::{CompositeObserver, SessionHandle, SessionRegistry, TracingObserver};
use storydoc_core::UploadChannel;
use storydoc_infrastructure::{load_file, load_selection, save_document};
use storydoc_interaction::HttpGateway;

use crate::presenter::{ConsoleObserver, render_greeting, render_preview, render_status};

const COMMANDS: &[&str] = &[
    "name", "stories", "schema", "resubmit", "generate", "preview", "save", "status", "new",
    "help", "quit",
];

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Name(String),
    Stories(Vec<PathBuf>),
    Schema(PathBuf),
    Resubmit(UploadChannel),
    Generate,
    Preview,
    Save(PathBuf),
    Status,
    NewSession,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map(|(command, rest)| (command, rest.trim()))
        .unwrap_or((line, ""));

    match command {
        "name" => Ok(ShellCommand::Name(rest.to_string())),
        "stories" => {
            let paths: Vec<PathBuf> = rest.split_whitespace().map(PathBuf::from).collect();
            if paths.is_empty() {
                Err("usage: stories <file> [<file>...]".to_string())
            } else {
                Ok(ShellCommand::Stories(paths))
            }
        }
        "schema" => match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
            [path] => Ok(ShellCommand::Schema(PathBuf::from(path))),
            _ => Err("usage: schema <file>".to_string()),
        },
        "resubmit" => match rest {
            "stories" => Ok(ShellCommand::Resubmit(UploadChannel::UserStories)),
            "schema" => Ok(ShellCommand::Resubmit(UploadChannel::DatabaseSchema)),
            _ => Err("usage: resubmit stories|schema".to_string()),
        },
        "generate" => Ok(ShellCommand::Generate),
        "preview" => Ok(ShellCommand::Preview),
        "save" => Ok(ShellCommand::Save(if rest.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(rest)
        })),
        "status" => Ok(ShellCommand::Status),
        "new" => Ok(ShellCommand::NewSession),
        "help" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("Unknown command '{other}'. Type 'help' for a list.")),
    }
}

fn help_text() -> String {
    [
        "name <your name>           set the name sent with generate",
        "stories <file> [<file>...] select user stories (.txt .md .json .csv)",
        "schema <file>              select the database schema (.sql .json .yaml .txt)",
        "resubmit stories|schema    upload the current selection again",
        "generate                   generate the document (needs both uploads)",
        "preview                    show the generated document",
        "save [dir]                 write the generated document to dir",
        "status                     show upload status",
        "new                        end this session and start a fresh one",
        "quit                       exit",
    ]
    .join("\n")
}

/// rustyline helper providing command completion, highlighting and hints.
#[derive(Clone)]
struct ShellHelper;

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if line.contains(' ') {
            return Ok((0, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ShellHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let first = line.split_whitespace().next().unwrap_or_default();
        if COMMANDS.contains(&first) {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for ShellHelper {}

/// Runs the interactive shell until `quit` or EOF.
pub async fn run(gateway: Arc<HttpGateway>) -> Result<()> {
    let observer = CompositeObserver::new()
        .with(Arc::new(ConsoleObserver))
        .with(Arc::new(TracingObserver));
    let registry =
        SessionRegistry::new(gateway.clone(), gateway).with_observer(Arc::new(observer));
    let mut handle = registry.create_session().await;

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ShellHelper));

    println!("{}", "=== StoryDoc ===".bright_magenta().bold());
    println!("{}", "Type 'help' for commands, 'quit' to exit.".bright_black());
    println!("{}", render_greeting(&handle.lock().await.view()));
    println!();

    loop {
        match rl.readline("storydoc> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let command = match parse_command(trimmed) {
                    Ok(command) => command,
                    Err(message) => {
                        println!("{}", message.yellow());
                        continue;
                    }
                };

                match command {
                    ShellCommand::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    ShellCommand::NewSession => {
                        let old_id = handle.lock().await.session_id().to_string();
                        registry.end_session(&old_id).await;
                        handle = registry.create_session().await;
                        println!("{}", "Started a new session.".bright_green());
                    }
                    command => dispatch(&handle, command).await,
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
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}

async fn dispatch(handle: &SessionHandle, command: ShellCommand) {
    let mut controller = handle.lock().await;

    match command {
        ShellCommand::Name(name) => {
            controller.set_user_name(name);
            println!("{}", render_greeting(&controller.view()));
        }
        ShellCommand::Stories(paths) => {
            match load_selection(UploadChannel::UserStories, &paths).await {
                Ok(files) => {
                    if controller.on_user_stories_selected(files).await.is_none() {
                        println!(
                            "{}",
                            "Selection unchanged; use 'resubmit stories' to upload it again."
                                .yellow()
                        );
                    }
                }
                Err(err) => eprintln!("{}", err.to_string().red()),
            }
        }
        ShellCommand::Schema(path) => match load_file(UploadChannel::DatabaseSchema, &path).await {
            Ok(file) => {
                if controller.on_schema_selected(file).await.is_none() {
                    println!(
                        "{}",
                        "Selection unchanged; use 'resubmit schema' to upload it again.".yellow()
                    );
                }
            }
            Err(err) => eprintln!("{}", err.to_string().red()),
        },
        ShellCommand::Resubmit(channel) => {
            let report = match channel {
                UploadChannel::UserStories => controller.resubmit_user_stories().await,
                UploadChannel::DatabaseSchema => controller.resubmit_schema().await,
            };
            if report.is_none() {
                println!("{}", format!("No {channel} selected yet.").yellow());
            }
        }
        ShellCommand::Generate => match controller.generate_trigger() {
            Some(trigger) => {
                // Failures were already reported by the observer
                if let Ok(document) = trigger.fire().await {
                    println!("{}", render_preview(&document));
                }
            }
            None => println!(
                "{}",
                "Generate is disabled until user stories and schema are processed.".yellow()
            ),
        },
        ShellCommand::Preview => match &controller.session().generated {
            Some(document) => println!("{}", render_preview(document)),
            None => println!("{}", "Nothing generated yet.".yellow()),
        },
        ShellCommand::Save(dir) => match &controller.session().generated {
            Some(document) => match save_document(document, &dir).await {
                Ok(path) => println!("{}", format!("Saved {}", path.display()).bright_green()),
                Err(err) => eprintln!("{}", err.to_string().red()),
            },
            None => println!("{}", "Nothing generated yet.".yellow()),
        },
        ShellCommand::Status => println!("{}", render_status(&controller.view())),
        ShellCommand::Help => println!("{}", help_text()),
        ShellCommand::NewSession | ShellCommand::Quit => {}
    }
}
