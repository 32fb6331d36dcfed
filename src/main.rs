use anyhow::Context;
use chrono::Local;
use colored::*;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tagger_core::{
    ConfigSources, CoreConfig, Demographics, Gender, JournalSession, Ready, StreakSummary,
    ThoughtEntry,
};

const INTRO: &str = "\
Thought tagging is the practice of writing down your thoughts and attaching descriptive
tags (like 'anxiety', 'gratitude', 'goals' or 'self-doubt') to each one. Labelling a
thought puts it outside your head, so it feels less overwhelming. Over time the tags show
which themes keep coming back, which helps you notice triggers and build self-awareness.";

const PRIVACY_NOTICE: &str = "\
To help understand thought patterns, some basic demographic information (age, gender,
profession) is stored alongside your tagged thoughts. Everything stays in your local data
directory. Without consent the thought tagger cannot be used.";

/// A line typed at the journal prompt.
#[derive(Debug, PartialEq, Eq)]
enum SessionCommand {
    Thought(String),
    List(Option<String>),
    Tags,
    Streak,
    Help,
    Quit,
    Unknown(String),
}

impl SessionCommand {
    /// Returns `None` for blank lines.
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let Some(command) = line.strip_prefix(':') else {
            return Some(Self::Thought(line.to_string()));
        };

        let mut parts = command.split_whitespace();
        let parsed = match parts.next().unwrap_or_default() {
            "list" | "l" => {
                let tag = parts.collect::<Vec<_>>().join(" ");
                Self::List(Some(tag).filter(|t| !t.is_empty()))
            }
            "tags" | "t" => Self::Tags,
            "streak" | "s" => Self::Streak,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        };
        Some(parsed)
    }
}

/// Interprets a consent answer. `None` means the answer was not understood.
fn parse_consent(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" | "i consent" | "yes, i consent" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Main entry point for the interactive thought tagger.
///
/// # Environment Variables
/// - `TAGGER_DATA_DIR`: journal directory (default: "tagger_data")
/// - `TAGGER_CATALOG_FILE`: optional YAML tag catalog
/// - `TAGGER_FALLBACK_TAG`: tag used when no keyword matches
/// - `TAGGER_STREAK_DAYS`: streak window in days (default: 14)
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tagger_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let sources = ConfigSources::from_lookup(|key| std::env::var(key).ok());
    let cfg = Arc::new(CoreConfig::resolve(sources).context("invalid configuration")?);
    tracing::info!(data_dir = %cfg.data_dir().display(), "starting thought tagger");

    let mut rl = DefaultEditor::new()?;

    println!("{}", "Thought Tagger - Build Emotional Clarity with Tags".green().bold());
    println!();
    println!("{}", INTRO);
    println!();

    let Some(mut session) = open_session(cfg, &mut rl)? else {
        println!("Goodbye!");
        return Ok(());
    };

    println!(
        "\nWelcome, {}! Tag your thoughts, discover your patterns and build clarity.",
        session.profile().demographics.profession().cyan()
    );
    println!(
        "{}",
        format!("Journal stored in {}", session.config().data_dir().display()).dimmed()
    );
    print_help();

    journal_loop(&mut session, &mut rl)?;

    println!("Goodbye!");
    Ok(())
}

/// Reads one line. `None` means the user asked to leave (Ctrl-C or Ctrl-D).
fn ask(rl: &mut DefaultEditor, prompt: &str) -> anyhow::Result<Option<String>> {
    match rl.readline(prompt) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Resumes a stored profile or walks through consent and demographics.
fn open_session(
    cfg: Arc<CoreConfig>,
    rl: &mut DefaultEditor,
) -> anyhow::Result<Option<JournalSession<Ready>>> {
    let session = JournalSession::new(cfg)?;
    if session.has_stored_profile() {
        return Ok(Some(session.resume()?));
    }

    println!("{}", "Data collection and privacy".blue().bold());
    println!("{}", PRIVACY_NOTICE);

    let consented = loop {
        let Some(answer) = ask(
            rl,
            "Do you consent to the collection and safe storage of your demographic data and tagged thoughts? [y/n] ",
        )?
        else {
            return Ok(None);
        };
        match parse_consent(&answer) {
            Some(answer) => break answer,
            None => println!("Please answer 'y' or 'n'."),
        }
    };
    if !consented {
        println!(
            "{}",
            "You must provide consent to use the Thought Tagger. Thank you for considering."
                .yellow()
        );
        return Ok(None);
    }

    let session = session.give_consent(Local::now().naive_local());
    let Some(demographics) = ask_demographics(rl)? else {
        return Ok(None);
    };
    let session = session.register(demographics)?;
    println!("{}", "Demographics saved! Thank you.".green());
    Ok(Some(session))
}

fn ask_demographics(rl: &mut DefaultEditor) -> anyhow::Result<Option<Demographics>> {
    println!("\n{}", "Tell us a bit about yourself".blue().bold());

    loop {
        let Some(age) = ask(rl, "Age: ")? else {
            return Ok(None);
        };
        let Ok(age) = age.trim().parse::<u32>() else {
            println!("{}: age must be a whole number", "Error".red());
            continue;
        };

        for (position, gender) in Gender::ALL.iter().enumerate() {
            println!("  {}. {}", position + 1, gender);
        }
        let gender = loop {
            let Some(answer) = ask(rl, "Gender: ")? else {
                return Ok(None);
            };
            match answer.parse::<Gender>() {
                Ok(gender) => break gender,
                Err(e) => println!("{}: {}", "Error".red(), e),
            }
        };

        let Some(profession) = ask(rl, "Profession (e.g. Student, Engineer, Teacher): ")? else {
            return Ok(None);
        };

        match Demographics::new(age, gender, &profession) {
            Ok(demographics) => return Ok(Some(demographics)),
            Err(e) => println!("{}: {}", "Error".red(), e),
        }
    }
}

fn journal_loop(session: &mut JournalSession<Ready>, rl: &mut DefaultEditor) -> anyhow::Result<()> {
    loop {
        let line = match rl.readline(&format!("{} ", "thought>".yellow())) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("Use ':quit' to quit");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };

        let Some(command) = SessionCommand::parse(&line) else {
            continue;
        };
        rl.add_history_entry(line.as_str())?;

        match command {
            SessionCommand::Quit => break,
            SessionCommand::Help => print_help(),
            SessionCommand::Tags => {
                let tags = session.all_tags();
                if tags.is_empty() {
                    println!("No tags yet.");
                } else {
                    println!("{}", tags.join(", "));
                }
            }
            SessionCommand::List(tag) => {
                let entries = session.filter(tag.as_deref());
                if entries.is_empty() {
                    println!("No thoughts found.");
                }
                for entry in entries {
                    println!("{}", render_entry(entry));
                }
                if !session.entries().is_empty() {
                    println!(
                        "{}",
                        "Tip: use this log to spot recurring thought patterns over time.".dimmed()
                    );
                }
            }
            SessionCommand::Streak => {
                let summary = session.streak(Local::now().date_naive());
                println!("{}", render_streak(&summary));
            }
            SessionCommand::Unknown(name) => {
                println!("Unknown command ':{}'. Type ':help' for commands.", name);
            }
            SessionCommand::Thought(text) => {
                let Some(tags) = ask(rl, "Tags (comma-separated, optional): ")? else {
                    break;
                };
                match session.submit(&text, &tags, Local::now().naive_local()) {
                    Ok(submission) => {
                        let shown: Vec<&str> = submission
                            .entry
                            .display_tags()
                            .into_iter()
                            .map(|t| t.as_str())
                            .collect();
                        println!(
                            "{} {}",
                            "Thought tagged and saved:".green(),
                            shown.join(", ")
                        );
                        println!(
                            "{}: {}",
                            "Auto tag".blue(),
                            submission.entry.auto_tag.as_str().bold()
                        );
                        if !submission.explanation.is_empty() {
                            println!("{}", submission.explanation);
                        }
                        if !submission.tip.is_empty() {
                            println!("{}: {}", "Tip".blue(), submission.tip);
                        }
                    }
                    Err(e) => println!("{}: {}", "Error".red(), e),
                }
            }
        }
    }
    Ok(())
}

fn print_help() {
    println!("\nType a thought and press enter, then add any tags of your own.");
    println!("Commands:");
    println!("  :list [tag]  - Review your thoughts, optionally filtered by tag");
    println!("  :tags        - Show every tag used so far");
    println!("  :streak      - Show your logging streak");
    println!("  :help        - Show this help");
    println!("  :quit        - Leave the journal");
    println!();
}

fn render_entry(entry: &ThoughtEntry) -> String {
    let tags: Vec<&str> = entry.display_tags().into_iter().map(|t| t.as_str()).collect();
    format!(
        "- {}: {}\n  Tags: {}",
        entry.created_at.format("%Y-%m-%d %H:%M").to_string().bold(),
        entry.text,
        tags.join(", ").italic()
    )
}

fn render_streak(summary: &StreakSummary) -> String {
    let calendar: Vec<String> = summary
        .days
        .iter()
        .map(|(_, count)| {
            if *count > 0 {
                "#".green().to_string()
            } else {
                ".".dimmed().to_string()
            }
        })
        .collect();

    let mut text = format!(
        "Last {} days: [{}]\nCurrent streak: {} day(s), {} of {} days logged",
        summary.window_days,
        calendar.concat(),
        summary.current_streak,
        summary.logged_days,
        summary.window_days
    );
    if summary.is_complete() {
        text.push_str(&format!("\n{}", "Streak complete. Well done!".green()));
    } else if !summary.logged_today() {
        text.push_str("\nNothing logged today yet.");
    } else {
        text.push_str(&format!(
            "\n{} more day(s) to complete the streak.",
            summary.days_remaining()
        ));
    }
    text
}
