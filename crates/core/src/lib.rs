//! # Tagger Core
//!
//! Core logic for the thought-tagging journal.
//!
//! This crate contains the tagging engine and the plain data operations around it:
//! - The tag catalog and the keyword-based inference engine
//! - Journal entries and the append-only CSV entry log
//! - The logging streak over a fixed window of days
//! - Consent and demographics, and the session that gates journaling on them
//!
//! **No presentation concerns**: prompts, colours and argument parsing belong in the `tagger`
//! CLI or the interactive `thought-tagger` binary.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod entry;
pub mod entry_log;
pub mod error;
pub mod inference;
pub mod profile;
pub mod session;
pub mod streak;
pub mod words;

pub use catalog::{CatalogFile, TagCatalog, TagDefinition};
pub use config::{ConfigSources, CoreConfig};
pub use constants::{DEFAULT_DATA_DIR, DEFAULT_FALLBACK_TAG, DEFAULT_STREAK_DAYS};
pub use entry::{parse_manual_tags, ThoughtEntry};
pub use entry_log::EntryLog;
pub use error::{ConfigurationError, TaggerError, TaggerResult};
pub use inference::{ScoreMap, TagInferenceEngine, TagScore};
pub use profile::{Demographics, Gender, Profile, ProfileStore};
pub use session::{AwaitingConsent, Consented, JournalSession, Ready, Submission};
pub use streak::StreakSummary;
pub use tagger_types::{NonEmptyText, TagName, TextError};
