//! Append-only CSV entry log.
//!
//! ## File format
//!
//! ```text
//! created_at,thought,manual_tags,auto_tag
//! 2026-10-01 09:30:00,"I worry about the exam, a lot",exams;school,anxiety
//! ```
//!
//! `manual_tags` holds the normalised manual tags joined by `;` (empty when none were given).
//! Rows are only ever appended. A missing file is an empty log.

use crate::constants::{TAG_FIELD_SEPARATOR, TIMESTAMP_FORMAT};
use crate::entry::ThoughtEntry;
use crate::error::{TaggerError, TaggerResult};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tagger_types::{NonEmptyText, TagName};

#[derive(Debug, Serialize, Deserialize)]
struct EntryRow {
    created_at: String,
    thought: String,
    manual_tags: String,
    auto_tag: String,
}

impl EntryRow {
    fn from_entry(entry: &ThoughtEntry) -> Self {
        let separator = TAG_FIELD_SEPARATOR.to_string();
        Self {
            created_at: entry.created_at.format(TIMESTAMP_FORMAT).to_string(),
            thought: entry.text.to_string(),
            manual_tags: entry
                .manual_tags
                .iter()
                .map(TagName::as_str)
                .collect::<Vec<_>>()
                .join(&separator),
            auto_tag: entry.auto_tag.to_string(),
        }
    }

    fn into_entry(self) -> TaggerResult<ThoughtEntry> {
        let created_at = NaiveDateTime::parse_from_str(&self.created_at, TIMESTAMP_FORMAT)
            .map_err(|_| TaggerError::InvalidTimestamp(self.created_at.clone()))?;
        let text = NonEmptyText::new(&self.thought)?;
        let manual_tags = self
            .manual_tags
            .split(TAG_FIELD_SEPARATOR)
            .filter(|piece| !piece.trim().is_empty())
            .map(TagName::new)
            .collect::<Result<Vec<_>, _>>()?;
        let auto_tag = TagName::new(&self.auto_tag)?;

        Ok(ThoughtEntry::new(text, manual_tags, auto_tag, created_at))
    }
}

/// Flat-file store of journal entries.
#[derive(Clone, Debug)]
pub struct EntryLog {
    path: PathBuf,
}

impl EntryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry, creating the file (with header) and its directory on first use.
    pub fn append(&self, entry: &ThoughtEntry) -> TaggerResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(TaggerError::StorageDirCreation)?;
            }
        }

        let needs_header = fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(TaggerError::FileWrite)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer
            .serialize(EntryRow::from_entry(entry))
            .map_err(TaggerError::CsvWrite)?;
        writer.flush().map_err(TaggerError::FileWrite)?;

        tracing::info!(
            path = %self.path.display(),
            auto_tag = entry.auto_tag.as_str(),
            "appended journal entry"
        );
        Ok(())
    }

    /// Loads every readable entry in file order.
    ///
    /// Rows that fail to parse are skipped with a warning so one damaged line does not hide
    /// the rest of the journal.
    pub fn load(&self) -> TaggerResult<Vec<ThoughtEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path).map_err(TaggerError::CsvRead)?;
        let mut entries = Vec::new();

        for (line, row) in reader.deserialize::<EntryRow>().enumerate() {
            let parsed = row
                .map_err(TaggerError::CsvRead)
                .and_then(EntryRow::into_entry);
            match parsed {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        row = line + 1,
                        "skipping unreadable journal row: {}",
                        e
                    );
                }
            }
        }

        Ok(entries)
    }
}

/// All tags shown on `entries`, sorted and de-duplicated.
pub fn all_tags(entries: &[ThoughtEntry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| entry.display_tags())
        .map(|tag| tag.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Entries carrying `tag`, or every entry when `tag` is `None`.
pub fn filter_by_tag<'a>(entries: &'a [ThoughtEntry], tag: Option<&str>) -> Vec<&'a ThoughtEntry> {
    match tag {
        None => entries.iter().collect(),
        Some(tag) => entries.iter().filter(|entry| entry.has_tag(tag)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(text: &str, manual: &[&str], auto: &str, at: &str) -> ThoughtEntry {
        ThoughtEntry::new(
            NonEmptyText::new(text).unwrap(),
            manual.iter().map(|t| TagName::new(t).unwrap()).collect(),
            TagName::new(auto).unwrap(),
            NaiveDateTime::parse_from_str(at, TIMESTAMP_FORMAT).unwrap(),
        )
    }

    #[test]
    fn load_missing_file_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let log = EntryLog::new(temp_dir.path().join("thoughts.csv"));
        assert!(log.load().unwrap().is_empty());
    }

    #[test]
    fn append_then_load_preserves_entries_and_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let log = EntryLog::new(temp_dir.path().join("nested").join("thoughts.csv"));

        let first = entry(
            "I worry about the exam, a lot",
            &["exams", "school"],
            "anxiety",
            "2026-10-01 09:30:00",
        );
        let second = entry("Said \"thanks\" today", &[], "gratitude", "2026-10-02 20:15:00");

        log.append(&first).expect("first append should succeed");
        log.append(&second).expect("second append should succeed");

        let loaded = log.load().expect("load should succeed");
        assert_eq!(loaded, vec![first, second]);

        let raw = fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            raw.lines().next(),
            Some("created_at,thought,manual_tags,auto_tag")
        );
        assert_eq!(
            raw.lines().filter(|l| l.starts_with("created_at")).count(),
            1,
            "header should only be written once"
        );
        assert!(raw.contains("exams;school"));
    }

    #[test]
    fn load_skips_damaged_rows() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("thoughts.csv");
        fs::write(
            &path,
            "created_at,thought,manual_tags,auto_tag\n\
             not-a-date,hello,,reflection\n\
             2026-10-03 08:00:00,   ,,reflection\n\
             2026-10-03 08:05:00,Feeling glad,,joy\n",
        )
        .unwrap();

        let loaded = EntryLog::new(&path).load().expect("load should succeed");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].text.as_str(), "Feeling glad");
    }

    #[test]
    fn all_tags_is_sorted_union_of_display_tags() {
        let entries = vec![
            entry("a", &["work"], "anxiety", "2026-10-01 09:00:00"),
            entry("b", &["anxiety"], "anxiety", "2026-10-01 10:00:00"),
            entry("c", &[], "gratitude", "2026-10-02 10:00:00"),
        ];
        assert_eq!(all_tags(&entries), vec!["anxiety", "gratitude", "work"]);
        assert!(all_tags(&[]).is_empty());
    }

    #[test]
    fn filter_by_tag_matches_manual_or_auto_tags() {
        let entries = vec![
            entry("a", &["work"], "anxiety", "2026-10-01 09:00:00"),
            entry("b", &[], "gratitude", "2026-10-02 10:00:00"),
            entry("c", &["Gratitude"], "joy", "2026-10-03 10:00:00"),
        ];

        assert_eq!(filter_by_tag(&entries, None).len(), 3);

        let grateful: Vec<&str> = filter_by_tag(&entries, Some("gratitude"))
            .into_iter()
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(grateful, vec!["b", "c"]);

        assert!(filter_by_tag(&entries, Some("sadness")).is_empty());
    }
}
