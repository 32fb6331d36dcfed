//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The core never reads environment variables itself; binaries
//! collect raw values into [`ConfigSources`] and call [`CoreConfig::resolve`].

use crate::catalog::{CatalogFile, TagCatalog};
use crate::constants::{
    DEFAULT_DATA_DIR, DEFAULT_FALLBACK_TAG, DEFAULT_STREAK_DAYS, ENTRY_LOG_FILENAME,
    ENV_CATALOG_FILE, ENV_DATA_DIR, ENV_FALLBACK_TAG, ENV_STREAK_DAYS, MAX_STREAK_DAYS,
    PROFILE_FILENAME,
};
use crate::error::ConfigurationError;
use crate::inference::TagInferenceEngine;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Raw, unvalidated settings as read from the environment or command line.
#[derive(Clone, Debug, Default)]
pub struct ConfigSources {
    pub data_dir: Option<String>,
    pub catalog_file: Option<String>,
    pub fallback_tag: Option<String>,
    pub streak_days: Option<String>,
}

impl ConfigSources {
    /// Collects settings through `lookup`, keyed by the `TAGGER_*` variable names.
    ///
    /// Binaries pass `|key| std::env::var(key).ok()`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            data_dir: lookup(ENV_DATA_DIR),
            catalog_file: lookup(ENV_CATALOG_FILE),
            fallback_tag: lookup(ENV_FALLBACK_TAG),
            streak_days: lookup(ENV_STREAK_DAYS),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    catalog: Arc<TagCatalog>,
    fallback_tag: String,
    streak_days: u32,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::UnknownFallbackTag` if `fallback_tag` is not in `catalog`
    /// and `ConfigurationError::InvalidSetting` if `streak_days` is outside 1..=366.
    pub fn new(
        data_dir: PathBuf,
        catalog: Arc<TagCatalog>,
        fallback_tag: &str,
        streak_days: u32,
    ) -> Result<Self, ConfigurationError> {
        let fallback_tag = fallback_tag.trim().to_lowercase();
        if !catalog.contains(&fallback_tag) {
            return Err(ConfigurationError::UnknownFallbackTag(fallback_tag));
        }
        if !(1..=MAX_STREAK_DAYS).contains(&streak_days) {
            return Err(ConfigurationError::InvalidSetting(format!(
                "streak window must be between 1 and {} days, got {}",
                MAX_STREAK_DAYS, streak_days
            )));
        }

        Ok(Self {
            data_dir,
            catalog,
            fallback_tag,
            streak_days,
        })
    }

    /// Resolves every setting, falling back to the builtin catalog and default paths.
    pub fn resolve(sources: ConfigSources) -> Result<Self, ConfigurationError> {
        let data_dir = non_blank(sources.data_dir)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let (catalog, fallback) = resolve_catalog(
            non_blank(sources.catalog_file).map(PathBuf::from),
            sources.fallback_tag,
        )?;
        let streak_days = streak_days_from_env_value(sources.streak_days)?;

        Self::new(data_dir, Arc::new(catalog), &fallback, streak_days)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn entry_log_path(&self) -> PathBuf {
        self.data_dir.join(ENTRY_LOG_FILENAME)
    }

    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join(PROFILE_FILENAME)
    }

    pub fn catalog(&self) -> &Arc<TagCatalog> {
        &self.catalog
    }

    pub fn fallback_tag(&self) -> &str {
        &self.fallback_tag
    }

    pub fn streak_days(&self) -> u32 {
        self.streak_days
    }

    pub fn build_engine(&self) -> Result<TagInferenceEngine, ConfigurationError> {
        TagInferenceEngine::new(Arc::clone(&self.catalog), &self.fallback_tag)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Loads the catalog and picks its fallback tag.
///
/// The fallback is, in order of preference: `fallback_override`, the catalog file's own
/// `fallback` field, then [`DEFAULT_FALLBACK_TAG`]. Without a file the builtin catalog is used.
pub fn resolve_catalog(
    catalog_file: Option<PathBuf>,
    fallback_override: Option<String>,
) -> Result<(TagCatalog, String), ConfigurationError> {
    let (catalog, declared_fallback) = match catalog_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading tag catalog");
            let (catalog, fallback) = CatalogFile::load(&path)?.into_catalog()?;
            (catalog, fallback.map(|f| f.to_string()))
        }
        None => (TagCatalog::builtin()?, None),
    };

    let fallback = non_blank(fallback_override)
        .or(declared_fallback)
        .unwrap_or_else(|| DEFAULT_FALLBACK_TAG.to_string());

    Ok((catalog, fallback))
}

/// Parse the streak window from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_STREAK_DAYS`].
pub fn streak_days_from_env_value(value: Option<String>) -> Result<u32, ConfigurationError> {
    match non_blank(value) {
        None => Ok(DEFAULT_STREAK_DAYS),
        Some(v) => v.parse::<u32>().map_err(|_| {
            ConfigurationError::InvalidSetting(format!(
                "streak window must be a whole number of days, got '{}'",
                v
            ))
        }),
    }
}
