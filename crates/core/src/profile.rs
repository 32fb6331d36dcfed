//! Consent and demographics.
//!
//! Journaling is gated on explicit consent. Alongside consent the user supplies a small set of
//! demographics (age, gender, profession) which are stored next to the entry log:
//!
//! ```text
//! <data_dir>/
//!   profile.yaml    # consent timestamp + demographics
//!   thoughts.csv    # entry log
//! ```
//!
//! A stored profile implies consent was given, so later runs can resume without prompting.

use crate::error::{TaggerError, TaggerResult};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tagger_types::NonEmptyText;

pub const MIN_AGE: u8 = 1;
pub const MAX_AGE: u8 = 120;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "Prefer not to say")]
    PreferNotToSay,
    Female,
    Male,
    #[serde(rename = "Non-binary")]
    NonBinary,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 5] = [
        Gender::PreferNotToSay,
        Gender::Female,
        Gender::Male,
        Gender::NonBinary,
        Gender::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Gender::PreferNotToSay => "Prefer not to say",
            Gender::Female => "Female",
            Gender::Male => "Male",
            Gender::NonBinary => "Non-binary",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Gender {
    type Err = TaggerError;

    /// Accepts a label (case-insensitive) or its 1-based position in [`Gender::ALL`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if let Ok(position) = wanted.parse::<usize>() {
            if let Some(gender) = position.checked_sub(1).and_then(|i| Gender::ALL.get(i)) {
                return Ok(*gender);
            }
        }
        Gender::ALL
            .iter()
            .find(|g| g.label().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| {
                TaggerError::InvalidInput(format!(
                    "gender must be one of: {}",
                    Gender::ALL
                        .iter()
                        .map(Gender::label)
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    age: u8,
    gender: Gender,
    profession: NonEmptyText,
}

impl Demographics {
    /// Validates and builds demographics.
    ///
    /// # Errors
    ///
    /// Returns `TaggerError::InvalidInput` when the age is outside 1..=120 and
    /// `TaggerError::Text` when the profession is blank.
    pub fn new(age: u32, gender: Gender, profession: &str) -> TaggerResult<Self> {
        let age = u8::try_from(age)
            .ok()
            .filter(|a| (MIN_AGE..=MAX_AGE).contains(a))
            .ok_or_else(|| {
                TaggerError::InvalidInput(format!(
                    "age must be between {} and {}",
                    MIN_AGE, MAX_AGE
                ))
            })?;
        let profession = NonEmptyText::new(profession)?;

        Ok(Self {
            age,
            gender,
            profession,
        })
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn profession(&self) -> &str {
        self.profession.as_str()
    }
}

/// Consent record plus demographics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub consent_given: bool,
    pub consented_at: NaiveDateTime,
    pub demographics: Demographics,
}

/// Reads and writes `profile.yaml`.
#[derive(Clone, Debug)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn save(&self, profile: &Profile) -> TaggerResult<()> {
        if !profile.consent_given {
            return Err(TaggerError::ConsentRequired);
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(TaggerError::StorageDirCreation)?;
            }
        }

        let yaml = serde_yaml::to_string(profile).map_err(TaggerError::YamlSerialization)?;
        fs::write(&self.path, yaml).map_err(TaggerError::FileWrite)?;

        tracing::info!(path = %self.path.display(), "saved profile");
        Ok(())
    }

    /// Loads the stored profile, or `None` if none has been saved yet.
    pub fn load(&self) -> TaggerResult<Option<Profile>> {
        if !self.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path).map_err(TaggerError::FileRead)?;
        let profile: Profile =
            serde_yaml::from_str(&contents).map_err(TaggerError::YamlDeserialization)?;
        if !profile.consent_given {
            return Err(TaggerError::ConsentRequired);
        }
        // Hand-edited files bypass `Demographics::new`; re-check the ranges.
        let d = &profile.demographics;
        Demographics::new(u32::from(d.age), d.gender, d.profession())?;
        Ok(Some(profile))
    }
}
