//! Journaling session.
//!
//! A session walks through consent, demographics and then journaling. The order is enforced
//! with type-state markers so that, for example, a thought cannot be submitted before consent
//! has been recorded:
//!
//! ```text
//! JournalSession<AwaitingConsent> --give_consent--> JournalSession<Consented>
//!        |                                                 |
//!        +--------------- resume ---------+      register(demographics)
//!                                         v                v
//!                                    JournalSession<Ready>
//! ```
//!
//! Only `Ready` sessions touch the entry log.

use crate::config::CoreConfig;
use crate::entry::{parse_manual_tags, ThoughtEntry};
use crate::entry_log::{all_tags, filter_by_tag, EntryLog};
use crate::error::{TaggerError, TaggerResult};
use crate::inference::TagInferenceEngine;
use crate::profile::{Demographics, Profile, ProfileStore};
use crate::streak::StreakSummary;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;
use tagger_types::{NonEmptyText, TagName};

// ============================================================================
// TYPE-STATE MARKERS
// ============================================================================

/// Marker type: consent has not been given yet.
#[derive(Clone, Copy, Debug)]
pub struct AwaitingConsent;

/// Marker type: consent given, demographics still outstanding.
#[derive(Clone, Copy, Debug)]
pub struct Consented {
    consented_at: NaiveDateTime,
}

/// Marker type: profile stored, journaling enabled.
#[derive(Clone, Debug)]
pub struct Ready {
    profile: Profile,
    entries: Vec<ThoughtEntry>,
}

// ============================================================================
// JOURNAL SESSION
// ============================================================================

/// Result of a successful submission.
#[derive(Clone, Debug)]
pub struct Submission {
    pub entry: ThoughtEntry,
    /// Explanation of the auto tag (empty if the catalog has none).
    pub explanation: String,
    /// Tip for the auto tag (empty if the catalog has none).
    pub tip: String,
}

#[derive(Clone, Debug)]
pub struct JournalSession<S> {
    cfg: Arc<CoreConfig>,
    engine: Arc<TagInferenceEngine>,
    log: EntryLog,
    profiles: ProfileStore,
    state: S,
}

impl<S> JournalSession<S> {
    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    fn transition<T>(self, state: T) -> JournalSession<T> {
        JournalSession {
            cfg: self.cfg,
            engine: self.engine,
            log: self.log,
            profiles: self.profiles,
            state,
        }
    }
}

impl JournalSession<AwaitingConsent> {
    /// Starts a session. Builds the inference engine, so catalog problems surface here.
    pub fn new(cfg: Arc<CoreConfig>) -> TaggerResult<Self> {
        let engine = Arc::new(cfg.build_engine()?);
        Ok(Self::with_engine(cfg, engine))
    }

    /// Starts a session around an engine that has already been built.
    pub fn with_engine(cfg: Arc<CoreConfig>, engine: Arc<TagInferenceEngine>) -> Self {
        let log = EntryLog::new(cfg.entry_log_path());
        let profiles = ProfileStore::new(cfg.profile_path());
        Self {
            cfg,
            engine,
            log,
            profiles,
            state: AwaitingConsent,
        }
    }

    pub fn has_stored_profile(&self) -> bool {
        self.profiles.exists()
    }

    /// Resumes from a stored profile, which implies consent was given in an earlier run.
    ///
    /// # Errors
    ///
    /// Returns `TaggerError::ProfileMissing` when no profile has been stored yet.
    pub fn resume(self) -> TaggerResult<JournalSession<Ready>> {
        let profile = self
            .profiles
            .load()?
            .ok_or_else(|| TaggerError::ProfileMissing(self.profiles.path().to_path_buf()))?;
        let entries = self.log.load()?;
        tracing::info!(entries = entries.len(), "resumed journal session");
        Ok(self.transition(Ready { profile, entries }))
    }

    pub fn give_consent(self, consented_at: NaiveDateTime) -> JournalSession<Consented> {
        self.transition(Consented { consented_at })
    }
}

impl JournalSession<Consented> {
    /// Stores the profile and opens the journal.
    pub fn register(self, demographics: Demographics) -> TaggerResult<JournalSession<Ready>> {
        let profile = Profile {
            consent_given: true,
            consented_at: self.state.consented_at,
            demographics,
        };
        self.profiles.save(&profile)?;
        let entries = self.log.load()?;
        Ok(self.transition(Ready { profile, entries }))
    }
}

impl JournalSession<Ready> {
    pub fn profile(&self) -> &Profile {
        &self.state.profile
    }

    /// Records a thought.
    ///
    /// `tags_input` is the raw comma-separated manual tag list and may be blank. The auto tag is
    /// inferred once, the entry is appended to the log and then kept in memory.
    ///
    /// # Errors
    ///
    /// - `TaggerError::Text` if the thought is blank or a manual tag is malformed
    /// - storage errors from the entry log
    pub fn submit(
        &mut self,
        text: &str,
        tags_input: &str,
        created_at: NaiveDateTime,
    ) -> TaggerResult<Submission> {
        let text = NonEmptyText::new(text)?;
        let manual_tags = parse_manual_tags(tags_input)?;

        let definition = self.engine.infer_definition(&text);
        let auto_tag = definition.name.clone();
        let explanation = definition.explanation.clone();
        let tip = definition.tip.clone();

        let entry = ThoughtEntry::new(text, manual_tags, auto_tag, created_at);
        self.log.append(&entry)?;
        self.state.entries.push(entry.clone());

        Ok(Submission {
            entry,
            explanation,
            tip,
        })
    }

    pub fn entries(&self) -> &[ThoughtEntry] {
        &self.state.entries
    }

    pub fn filter(&self, tag: Option<&str>) -> Vec<&ThoughtEntry> {
        filter_by_tag(&self.state.entries, tag)
    }

    pub fn all_tags(&self) -> Vec<String> {
        all_tags(&self.state.entries)
    }

    pub fn streak(&self, today: NaiveDate) -> StreakSummary {
        StreakSummary::compute(
            self.state.entries.iter().map(ThoughtEntry::date),
            today,
            self.cfg.streak_days(),
        )
    }

    /// Explanation and tip for any tag, empty for tags outside the catalog.
    pub fn explain(&self, tag: &TagName) -> (&str, &str) {
        self.engine.catalog().explain(tag.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TagCatalog;
    use crate::constants::DEFAULT_FALLBACK_TAG;
    use crate::profile::Gender;
    use std::path::Path;
    use tempfile::TempDir;

    fn test_cfg(data_dir: &Path) -> Arc<CoreConfig> {
        Arc::new(
            CoreConfig::new(
                data_dir.to_path_buf(),
                Arc::new(TagCatalog::builtin().unwrap()),
                DEFAULT_FALLBACK_TAG,
                14,
            )
            .expect("CoreConfig::new should succeed"),
        )
    }

    fn at(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M").unwrap()
    }

    fn ready_session(data_dir: &Path) -> JournalSession<Ready> {
        JournalSession::new(test_cfg(data_dir))
            .expect("session should start")
            .give_consent(at("2026-10-01 08:00"))
            .register(Demographics::new(29, Gender::Female, "Engineer").unwrap())
            .expect("register should succeed")
    }

    #[test]
    fn resume_without_profile_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let session = JournalSession::new(test_cfg(temp_dir.path())).unwrap();
        assert!(!session.has_stored_profile());

        let err = session.resume().expect_err("resume must fail without a profile");
        assert!(matches!(err, TaggerError::ProfileMissing(_)));
    }

    #[test]
    fn register_stores_profile_and_enables_resume() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let session = ready_session(temp_dir.path());
        assert_eq!(session.profile().demographics.profession(), "Engineer");
        assert!(session.entries().is_empty());

        let resumed = JournalSession::new(test_cfg(temp_dir.path()))
            .unwrap()
            .resume()
            .expect("resume should succeed after register");
        assert_eq!(resumed.profile(), session.profile());
    }

    #[test]
    fn submit_infers_tag_and_persists_entry() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = ready_session(temp_dir.path());

        let submission = session
            .submit("  I worry and feel anxious  ", "Exams, anxiety", at("2026-10-01 09:00"))
            .expect("submit should succeed");

        assert_eq!(submission.entry.text.as_str(), "I worry and feel anxious");
        assert_eq!(submission.entry.auto_tag.as_str(), "anxiety");
        assert!(!submission.explanation.is_empty());
        assert!(!submission.tip.is_empty());

        let shown: Vec<&str> = submission
            .entry
            .display_tags()
            .into_iter()
            .map(|t| t.as_str())
            .collect();
        assert_eq!(shown, vec!["exams", "anxiety"]);

        let resumed = JournalSession::new(test_cfg(temp_dir.path()))
            .unwrap()
            .resume()
            .unwrap();
        assert_eq!(resumed.entries(), session.entries());
    }

    #[test]
    fn submit_rejects_blank_thought_without_writing() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = ready_session(temp_dir.path());

        let err = session
            .submit("   ", "goals", at("2026-10-01 09:00"))
            .expect_err("blank thought must be rejected");
        assert!(matches!(err, TaggerError::Text(_)));
        assert!(session.entries().is_empty());
        assert!(!session.config().entry_log_path().exists());
    }

    #[test]
    fn review_filters_tags_and_streak() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = ready_session(temp_dir.path());

        session
            .submit("So grateful for my friends", "", at("2026-10-16 21:00"))
            .unwrap();
        session
            .submit("The weather is nice today", "outdoors", at("2026-10-17 10:00"))
            .unwrap();
        session
            .submit("Deadline stress at work", "work", at("2026-10-18 18:30"))
            .unwrap();

        assert_eq!(
            session.all_tags(),
            vec!["anxiety", "gratitude", "outdoors", DEFAULT_FALLBACK_TAG, "work"]
        );
        assert_eq!(session.filter(None).len(), 3);
        assert_eq!(session.filter(Some("gratitude")).len(), 1);
        assert_eq!(session.filter(Some(DEFAULT_FALLBACK_TAG)).len(), 1);

        let streak = session.streak(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert_eq!(streak.current_streak, 3);
        assert_eq!(streak.window_days, 14);
    }

    #[test]
    fn explain_unknown_manual_tag_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let session = ready_session(temp_dir.path());
        assert_eq!(session.explain(&TagName::new("work").unwrap()), ("", ""));
    }
}
