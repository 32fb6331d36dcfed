/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// A tag contained a character reserved by the entry log or the tag input format
    #[error("Tag '{0}' contains a reserved character (',', ';' or a control character)")]
    ReservedCharacter(String),
}

/// Text with at least one non-whitespace character, stored trimmed. Used for thoughts and
/// professions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// # Errors
    ///
    /// Returns `TextError::Empty` when `input` is blank after trimming.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A normalised tag name.
///
/// Tags are trimmed and lowercased on construction, so `" Anxiety "` and `"anxiety"` are the
/// same tag. Commas separate tags in user input and semicolons separate them in the entry log,
/// so neither may appear inside a tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagName(String);

impl TagName {
    /// Creates a normalised `TagName`.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` for blank input and `TextError::ReservedCharacter` when the
    /// tag contains `,`, `;` or a control character.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let normalised = input.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(TextError::Empty);
        }
        if normalised
            .chars()
            .any(|c| c == ',' || c == ';' || c.is_control())
        {
            return Err(TextError::ReservedCharacter(normalised));
        }
        Ok(Self(normalised))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for TagName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for TagName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for TagName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        TagName::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  feeling calm  ").unwrap();
        assert_eq!(text.as_str(), "feeling calm");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        assert_eq!(NonEmptyText::new(" \t\n").unwrap_err(), TextError::Empty);
    }

    #[test]
    fn tag_name_is_lowercased_and_trimmed() {
        let tag = TagName::new("  Self-Doubt ").unwrap();
        assert_eq!(tag.as_str(), "self-doubt");
    }

    #[test]
    fn tag_name_rejects_separators() {
        assert!(matches!(
            TagName::new("work;life"),
            Err(TextError::ReservedCharacter(_))
        ));
        assert!(matches!(
            TagName::new("a,b"),
            Err(TextError::ReservedCharacter(_))
        ));
        assert_eq!(TagName::new("   ").unwrap_err(), TextError::Empty);
    }

    #[test]
    fn tag_name_deserialize_normalises() {
        let tag: TagName = serde_json::from_str("\"GOALS\"").unwrap();
        assert_eq!(tag.as_str(), "goals");

        let err = serde_json::from_str::<TagName>("\"\"");
        assert!(err.is_err());
    }
}
