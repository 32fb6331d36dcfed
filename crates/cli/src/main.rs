use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use tagger_core::{
    ConfigSources, CoreConfig, Demographics, Gender, JournalSession, NonEmptyText, Ready,
    StreakSummary, TagInferenceEngine, ThoughtEntry,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tagger")]
#[command(about = "Thought tagger journal CLI")]
struct Cli {
    /// Journal data directory (overrides TAGGER_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tag catalog in registration order
    Catalog,
    /// Infer the tag for a thought without saving it
    Infer {
        /// The thought text
        text: String,
        /// Show the per-tag keyword counts
        #[arg(long)]
        explain: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Record consent and demographics
    Profile {
        /// Age in years (1-120)
        #[arg(long)]
        age: u32,
        /// Prefer not to say, Female, Male, Non-binary or Other
        #[arg(long)]
        gender: String,
        /// Profession (e.g. Student, Engineer, Teacher)
        #[arg(long)]
        profession: String,
        /// Consent to the collection and storage of demographics and thoughts
        #[arg(long)]
        consent: bool,
    },
    /// Add a thought to the journal
    Add {
        /// The thought text
        text: String,
        /// Manual tags (comma-separated)
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// Review journal entries
    List {
        /// Only show entries with this tag
        #[arg(long)]
        tag: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List every tag used so far
    Tags,
    /// Show the logging streak
    Streak,
}

#[derive(Serialize)]
struct InferenceOutput<'a> {
    tag: &'a str,
    explanation: &'a str,
    tip: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    scores: Vec<ScoreOutput<'a>>,
}

#[derive(Serialize)]
struct ScoreOutput<'a> {
    tag: &'a str,
    count: usize,
    matched: &'a [String],
}

#[derive(Serialize)]
struct EntryOutput<'a> {
    created_at: String,
    thought: &'a str,
    tags: Vec<&'a str>,
    auto_tag: &'a str,
}

impl<'a> EntryOutput<'a> {
    fn from_entry(entry: &'a ThoughtEntry) -> Self {
        Self {
            created_at: entry.created_at.format("%Y-%m-%d %H:%M").to_string(),
            thought: entry.text.as_str(),
            tags: entry.display_tags().into_iter().map(|t| t.as_str()).collect(),
            auto_tag: entry.auto_tag.as_str(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tagger_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let sources = ConfigSources::from_lookup(|key| std::env::var(key).ok());
    let stdout = std::io::stdout();
    run(cli, sources, Local::now().naive_local(), &mut stdout.lock())
}

fn run(
    cli: Cli,
    mut sources: ConfigSources,
    now: NaiveDateTime,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if cli.data_dir.is_some() {
        sources.data_dir = cli.data_dir;
    }

    let Some(command) = cli.command else {
        writeln!(out, "Use 'tagger --help' for commands")?;
        return Ok(());
    };

    let cfg = Arc::new(CoreConfig::resolve(sources).context("invalid configuration")?);
    let engine = Arc::new(cfg.build_engine().context("invalid tag catalog")?);
    tracing::info!(
        data_dir = %cfg.data_dir().display(),
        tags = cfg.catalog().len(),
        fallback = cfg.fallback_tag(),
        "resolved configuration"
    );

    match command {
        Commands::Catalog => {
            for definition in engine.catalog().iter() {
                let marker = if definition.name.as_str() == engine.fallback_tag() {
                    " (fallback)"
                } else {
                    ""
                };
                writeln!(
                    out,
                    "{}{}: {}",
                    definition.name,
                    marker,
                    definition.keywords.join(", ")
                )?;
            }
        }
        Commands::Infer {
            text,
            explain,
            json,
        } => {
            let text = NonEmptyText::new(&text).context("thought cannot be empty")?;
            print_inference(&engine, &text, explain, json, out)?;
        }
        Commands::Profile {
            age,
            gender,
            profession,
            consent,
        } => {
            if !consent {
                anyhow::bail!(
                    "consent is required: re-run with --consent to agree to the collection and \
                     safe storage of your demographics and tagged thoughts"
                );
            }
            let gender: Gender = gender.parse()?;
            let demographics = Demographics::new(age, gender, &profession)?;
            let session = JournalSession::with_engine(cfg, engine)
                .give_consent(now)
                .register(demographics)?;
            writeln!(
                out,
                "Profile saved. Welcome, {}!",
                session.profile().demographics.profession()
            )?;
        }
        Commands::Add { text, tags } => {
            let mut session = open_journal(cfg, engine)?;
            let submission = session.submit(&text, &tags, now)?;
            let shown: Vec<&str> = submission
                .entry
                .display_tags()
                .into_iter()
                .map(|t| t.as_str())
                .collect();
            writeln!(out, "Thought tagged and saved: {}", shown.join(", "))?;
            if !submission.explanation.is_empty() {
                writeln!(out, "{}", submission.explanation)?;
            }
            if !submission.tip.is_empty() {
                writeln!(out, "Tip: {}", submission.tip)?;
            }
        }
        Commands::List { tag, json } => {
            let session = open_journal(cfg, engine)?;
            let entries = session.filter(tag.as_deref());
            if json {
                let rows: Vec<EntryOutput<'_>> =
                    entries.iter().map(|e| EntryOutput::from_entry(e)).collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
            } else if entries.is_empty() {
                writeln!(out, "No thoughts found.")?;
            } else {
                for entry in entries {
                    writeln!(out, "{}", format_entry(entry))?;
                }
            }
        }
        Commands::Tags => {
            let session = open_journal(cfg, engine)?;
            let tags = session.all_tags();
            if tags.is_empty() {
                writeln!(out, "No tags yet.")?;
            }
            for tag in tags {
                writeln!(out, "{}", tag)?;
            }
        }
        Commands::Streak => {
            let session = open_journal(cfg, engine)?;
            let summary = session.streak(now.date());
            write!(out, "{}", format_streak(&summary))?;
        }
    }

    Ok(())
}

fn open_journal(
    cfg: Arc<CoreConfig>,
    engine: Arc<TagInferenceEngine>,
) -> anyhow::Result<JournalSession<Ready>> {
    JournalSession::with_engine(cfg, engine)
        .resume()
        .context("run 'tagger profile --consent ...' before journaling")
}

fn print_inference(
    engine: &TagInferenceEngine,
    text: &NonEmptyText,
    explain: bool,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let tag = engine.infer_tag(text);
    let (explanation, tip) = engine.catalog().explain(tag);
    let scores = engine.score(text.as_str());

    if json {
        let output = InferenceOutput {
            tag,
            explanation,
            tip,
            scores: if explain {
                scores
                    .iter()
                    .map(|s| ScoreOutput {
                        tag: &s.tag,
                        count: s.count,
                        matched: &s.matched,
                    })
                    .collect()
            } else {
                Vec::new()
            },
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        return Ok(());
    }

    writeln!(out, "Tag: {}", tag)?;
    if !explanation.is_empty() {
        writeln!(out, "{}", explanation)?;
    }
    if !tip.is_empty() {
        writeln!(out, "Tip: {}", tip)?;
    }
    if explain {
        writeln!(out)?;
        for score in scores.iter() {
            if score.count == 0 {
                writeln!(out, "  {:<12} 0", score.tag)?;
            } else {
                writeln!(
                    out,
                    "  {:<12} {} ({})",
                    score.tag,
                    score.count,
                    score.matched.join(", ")
                )?;
            }
        }
    }
    Ok(())
}

fn format_entry(entry: &ThoughtEntry) -> String {
    let tags: Vec<&str> = entry.display_tags().into_iter().map(|t| t.as_str()).collect();
    format!(
        "- {}: {}\n  Tags: {}",
        entry.created_at.format("%Y-%m-%d %H:%M"),
        entry.text,
        tags.join(", ")
    )
}

fn format_streak(summary: &StreakSummary) -> String {
    let calendar: String = summary
        .days
        .iter()
        .map(|(_, count)| if *count > 0 { '#' } else { '.' })
        .collect();

    let mut text = format!(
        "Last {} days: [{}]\nCurrent streak: {} day(s), {} of {} days logged\n",
        summary.window_days, calendar, summary.current_streak, summary.logged_days,
        summary.window_days
    );
    if summary.is_complete() {
        text.push_str("Streak complete. Well done!\n");
    } else if !summary.logged_today() {
        text.push_str("Nothing logged today yet.\n");
    } else {
        text.push_str(&format!(
            "{} more day(s) to complete the streak.\n",
            summary.days_remaining()
        ));
    }
    text
}
