//! Journal entries.
//!
//! A [`ThoughtEntry`] is created once per accepted submission and never changes afterwards.

use chrono::{NaiveDate, NaiveDateTime};
use tagger_types::{NonEmptyText, TagName, TextError};

/// One journaled thought.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThoughtEntry {
    pub text: NonEmptyText,
    /// User-supplied tags, normalised and de-duplicated, in input order.
    pub manual_tags: Vec<TagName>,
    /// Inferred tag; always a catalog key at the time of creation.
    pub auto_tag: TagName,
    /// Local wall-clock time of submission.
    pub created_at: NaiveDateTime,
}

impl ThoughtEntry {
    pub fn new(
        text: NonEmptyText,
        manual_tags: Vec<TagName>,
        auto_tag: TagName,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            text,
            manual_tags: dedup_tags(manual_tags),
            auto_tag,
            created_at,
        }
    }

    /// Manual tags followed by the auto tag, without duplicates.
    pub fn display_tags(&self) -> Vec<&TagName> {
        let mut tags: Vec<&TagName> = self.manual_tags.iter().collect();
        if !tags.contains(&&self.auto_tag) {
            tags.push(&self.auto_tag);
        }
        tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.trim().to_lowercase();
        self.display_tags().iter().any(|t| t.as_str() == wanted)
    }

    pub fn date(&self) -> NaiveDate {
        self.created_at.date()
    }
}

/// Parses comma-separated tag input such as `"Anxiety, work , ,goals"`.
///
/// Pieces are trimmed and lowercased, blank pieces are dropped and repeated tags keep their
/// first position. Blank input yields no tags.
pub fn parse_manual_tags(input: &str) -> Result<Vec<TagName>, TextError> {
    let tags = input
        .split(',')
        .filter(|piece| !piece.trim().is_empty())
        .map(TagName::new)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(dedup_tags(tags))
}

fn dedup_tags(tags: Vec<TagName>) -> Vec<TagName> {
    let mut unique = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M").unwrap()
    }

    fn tag(name: &str) -> TagName {
        TagName::new(name).unwrap()
    }

    #[test]
    fn parse_manual_tags_normalises_and_dedups() {
        let tags = parse_manual_tags(" Anxiety, work , ,ANXIETY,goals,").unwrap();
        assert_eq!(tags, vec![tag("anxiety"), tag("work"), tag("goals")]);
    }

    #[test]
    fn parse_manual_tags_blank_input_is_empty() {
        assert!(parse_manual_tags("").unwrap().is_empty());
        assert!(parse_manual_tags(" , ,").unwrap().is_empty());
    }

    #[test]
    fn parse_manual_tags_rejects_reserved_characters() {
        assert!(matches!(
            parse_manual_tags("work;life"),
            Err(TextError::ReservedCharacter(_))
        ));
    }

    #[test]
    fn display_tags_merges_without_duplicates() {
        let entry = ThoughtEntry::new(
            NonEmptyText::new("I worry").unwrap(),
            vec![tag("work"), tag("anxiety")],
            tag("anxiety"),
            at("2026-10-01 09:30"),
        );
        let shown: Vec<&str> = entry.display_tags().into_iter().map(|t| t.as_str()).collect();
        assert_eq!(shown, vec!["work", "anxiety"]);

        let entry = ThoughtEntry::new(
            NonEmptyText::new("Lovely day").unwrap(),
            vec![],
            tag("reflection"),
            at("2026-10-01 09:30"),
        );
        let shown: Vec<&str> = entry.display_tags().into_iter().map(|t| t.as_str()).collect();
        assert_eq!(shown, vec!["reflection"]);
    }

    #[test]
    fn has_tag_checks_manual_and_auto_tags_case_insensitively() {
        let entry = ThoughtEntry::new(
            NonEmptyText::new("Deadline looming").unwrap(),
            vec![tag("work")],
            tag("goals"),
            at("2026-10-01 09:30"),
        );
        assert!(entry.has_tag("WORK"));
        assert!(entry.has_tag("goals"));
        assert!(!entry.has_tag("joy"));
        assert_eq!(entry.date(), NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
    }
}
