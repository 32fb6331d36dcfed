//! Constants used throughout the tagger core crate.
//!
//! This module contains the filename and default-value constants so that the CLI, the
//! interactive session and the tests all agree on where journal data lives.

/// Default directory for journal data when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "tagger_data";

/// Filename for the append-only CSV entry log.
pub const ENTRY_LOG_FILENAME: &str = "thoughts.csv";

/// Filename for the consent and demographics profile.
pub const PROFILE_FILENAME: &str = "profile.yaml";

/// Fallback tag of the builtin catalog.
pub const DEFAULT_FALLBACK_TAG: &str = "reflection";

/// Length of the logging-streak window, in days.
pub const DEFAULT_STREAK_DAYS: u32 = 14;

/// Upper bound accepted for a configured streak window.
pub const MAX_STREAK_DAYS: u32 = 366;

/// Timestamp format used in the entry log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Separator between manual tags inside a single CSV field.
pub const TAG_FIELD_SEPARATOR: char = ';';

/// Environment variable naming the data directory.
pub const ENV_DATA_DIR: &str = "TAGGER_DATA_DIR";

/// Environment variable naming a YAML catalog file.
pub const ENV_CATALOG_FILE: &str = "TAGGER_CATALOG_FILE";

/// Environment variable overriding the fallback tag.
pub const ENV_FALLBACK_TAG: &str = "TAGGER_FALLBACK_TAG";

/// Environment variable overriding the streak window.
pub const ENV_STREAK_DAYS: &str = "TAGGER_STREAK_DAYS";
