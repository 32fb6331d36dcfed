use std::path::PathBuf;

/// Startup failures that leave the tagger unable to run.
///
/// These are raised while building the catalog or the inference engine, never per call.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("tag catalog is empty")]
    EmptyCatalog,
    #[error("fallback tag '{0}' is not defined in the catalog")]
    UnknownFallbackTag(String),
    #[error("tag '{0}' is defined more than once")]
    DuplicateTag(String),
    #[error("invalid tag name '{name}': {reason}")]
    InvalidTagName {
        name: String,
        #[source]
        reason: tagger_types::TextError,
    },
    #[error("tag '{tag}' has a keyword with no words in it: '{keyword}'")]
    InvalidKeyword { tag: String, keyword: String },
    #[error("tag '{tag}' lists keyword '{keyword}' more than once")]
    DuplicateKeyword { tag: String, keyword: String },
    #[error("failed to read catalog file {path}: {source}", path = .path.display())]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog file {path}: {source}", path = .path.display())]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to compile word pattern: {0}")]
    WordPattern(#[from] regex::Error),
    #[error("invalid setting: {0}")]
    InvalidSetting(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TaggerError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid text: {0}")]
    Text(#[from] tagger_types::TextError),
    #[error("consent is required before journaling")]
    ConsentRequired,
    #[error("no profile found at {path}; record consent and demographics first", path = .0.display())]
    ProfileMissing(PathBuf),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write journal file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read journal file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write entry log: {0}")]
    CsvWrite(csv::Error),
    #[error("failed to read entry log: {0}")]
    CsvRead(csv::Error),
    #[error("failed to serialize YAML: {0}")]
    YamlSerialization(serde_yaml::Error),
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

pub type TaggerResult<T> = std::result::Result<T, TaggerError>;
