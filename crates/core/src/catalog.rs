//! Tag catalog.
//!
//! The catalog is the fixed set of tags the inference engine can choose from. Each tag carries
//! its keywords plus the explanation and tip shown to the user once a thought has been tagged.
//!
//! Definitions are kept in registration order. The name index is only a lookup aid; anything
//! that iterates (scoring, tie-breaking, listing) walks the ordered definitions.
//!
//! ## Catalog file
//!
//! A catalog can be supplied as YAML instead of the builtin set:
//!
//! ```yaml
//! fallback: reflection
//! tags:
//!   - name: anxiety
//!     keywords: [worry, anxious]
//!     explanation: Anxiety is the mind bracing for a threat.
//!     tip: Name the worry, then name one thing you can control.
//!   - name: reflection
//!     keywords: [reflect]
//!     explanation: A reflective thought.
//!     tip: Keep writing.
//! ```

use crate::constants::DEFAULT_FALLBACK_TAG;
use crate::error::ConfigurationError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tagger_types::TagName;

/// A single recognised tag.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TagDefinition {
    pub name: TagName,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub tip: String,
}

impl TagDefinition {
    /// Builds a definition, normalising the name. Keywords are normalised by [`TagCatalog::new`].
    pub fn new(
        name: &str,
        keywords: &[&str],
        explanation: &str,
        tip: &str,
    ) -> Result<Self, ConfigurationError> {
        let name = TagName::new(name).map_err(|reason| ConfigurationError::InvalidTagName {
            name: name.to_owned(),
            reason,
        })?;

        Ok(Self {
            name,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            explanation: explanation.to_owned(),
            tip: tip.to_owned(),
        })
    }
}

/// Read-only registry of tags in registration order.
#[derive(Clone, Debug)]
pub struct TagCatalog {
    definitions: Vec<TagDefinition>,
    index: HashMap<TagName, usize>,
}

impl TagCatalog {
    /// Builds a catalog from definitions in registration order.
    ///
    /// Keywords are trimmed and lowercased.
    ///
    /// # Errors
    ///
    /// - `ConfigurationError::EmptyCatalog` if `definitions` is empty
    /// - `ConfigurationError::DuplicateTag` if two definitions share a name
    /// - `ConfigurationError::InvalidKeyword` if a keyword is blank
    /// - `ConfigurationError::DuplicateKeyword` if a tag lists the same keyword twice
    pub fn new(definitions: Vec<TagDefinition>) -> Result<Self, ConfigurationError> {
        if definitions.is_empty() {
            return Err(ConfigurationError::EmptyCatalog);
        }

        let mut index = HashMap::with_capacity(definitions.len());
        let mut normalised = Vec::with_capacity(definitions.len());

        for (position, mut definition) in definitions.into_iter().enumerate() {
            if index.contains_key(&definition.name) {
                return Err(ConfigurationError::DuplicateTag(
                    definition.name.to_string(),
                ));
            }

            let mut keywords: Vec<String> = Vec::with_capacity(definition.keywords.len());
            for keyword in &definition.keywords {
                let lowered = keyword.trim().to_lowercase();
                if lowered.is_empty() {
                    return Err(ConfigurationError::InvalidKeyword {
                        tag: definition.name.to_string(),
                        keyword: keyword.clone(),
                    });
                }
                if keywords.contains(&lowered) {
                    return Err(ConfigurationError::DuplicateKeyword {
                        tag: definition.name.to_string(),
                        keyword: lowered,
                    });
                }
                keywords.push(lowered);
            }
            definition.keywords = keywords;

            index.insert(definition.name.clone(), position);
            normalised.push(definition);
        }

        Ok(Self {
            definitions: normalised,
            index,
        })
    }

    /// Looks up a tag by name. Unknown names (e.g. free-form manual tags) return `None`.
    pub fn get(&self, tag_name: &str) -> Option<&TagDefinition> {
        self.index
            .get(tag_name)
            .map(|&position| &self.definitions[position])
    }

    pub fn contains(&self, tag_name: &str) -> bool {
        self.index.contains_key(tag_name)
    }

    /// Iterates definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TagDefinition> {
        self.definitions.iter()
    }

    pub fn definitions(&self) -> &[TagDefinition] {
        &self.definitions
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Explanation and tip for `tag_name`, or empty strings when the tag is not catalogued.
    pub fn explain(&self, tag_name: &str) -> (&str, &str) {
        match self.get(tag_name) {
            Some(definition) => (definition.explanation.as_str(), definition.tip.as_str()),
            None => ("", ""),
        }
    }

    /// The builtin catalog. Its fallback tag is [`DEFAULT_FALLBACK_TAG`].
    pub fn builtin() -> Result<Self, ConfigurationError> {
        let definitions = BUILTIN_TAGS
            .iter()
            .map(|(name, keywords, explanation, tip)| {
                TagDefinition::new(name, keywords, explanation, tip)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(definitions)
    }
}

type BuiltinTag = (&'static str, &'static [&'static str], &'static str, &'static str);

// Registration order here is the tie-break order.
const BUILTIN_TAGS: &[BuiltinTag] = &[
    (
        "anxiety",
        &[
            "worry", "worried", "worrying", "anxious", "anxiety", "nervous", "panic", "stress",
            "stressed", "overwhelmed", "afraid", "scared", "fear",
        ],
        "Anxiety is your mind bracing for a threat that may or may not arrive. Labelling it \
         helps separate what is happening from what you fear might happen.",
        "Write down the worst case, the best case and the most likely case. Then pick one \
         small thing within your control.",
    ),
    (
        "gratitude",
        &[
            "thank", "thanks", "grateful", "gratitude", "appreciate", "appreciated", "blessed",
            "lucky",
        ],
        "Gratitude thoughts notice what is going well. Tagging them makes the good moments \
         easier to find when you review your log.",
        "Note who or what made the moment possible, and consider telling them.",
    ),
    (
        "anger",
        &[
            "angry", "mad", "furious", "annoyed", "irritated", "frustrated", "frustrating",
            "rage", "resent",
        ],
        "Anger often signals that a boundary or expectation was crossed. It carries useful \
         information about what matters to you.",
        "Pause before acting. Ask which boundary was crossed and what a calm request would \
         sound like.",
    ),
    (
        "sadness",
        &[
            "sad", "lonely", "alone", "depressed", "cry", "crying", "hopeless", "miss", "grief",
            "heartbroken",
        ],
        "Sadness is a response to loss or disappointment. Giving it a name is a first step \
         toward caring for it.",
        "Be gentle with yourself today. Reach out to someone you trust, even briefly.",
    ),
    (
        "self-doubt",
        &[
            "doubt", "useless", "failure", "worthless", "incompetent", "not good enough",
            "can't do", "imposter",
        ],
        "Self-doubt thoughts question your ability or worth. They are thoughts, not facts.",
        "List one piece of evidence against the thought. Speak to yourself as you would to \
         a friend.",
    ),
    (
        "goals",
        &[
            "goal", "goals", "plan", "plans", "achieve", "progress", "target", "ambition",
            "deadline", "habit",
        ],
        "Goal thoughts look forward. Tracking them shows what you are working toward and how \
         often it is on your mind.",
        "Break the goal into the next concrete step and give it a time.",
    ),
    (
        "joy",
        &[
            "happy", "joy", "excited", "glad", "proud", "delighted", "love", "fun", "smile",
        ],
        "Joyful thoughts capture energy and delight. Revisiting them can lift a difficult day.",
        "Savour it: note what you saw, heard or felt so you can return to it later.",
    ),
    (
        DEFAULT_FALLBACK_TAG,
        &[
            "reflect", "reflecting", "wonder", "realise", "realize", "learned", "noticed",
        ],
        "A reflective thought. Not every thought needs a strong label; observing it is \
         enough.",
        "Ask yourself what this thought is trying to tell you, then let it go.",
    ),
];

/// On-disk catalog document.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub fallback: Option<TagName>,
    pub tags: Vec<TagDefinition>,
}

impl CatalogFile {
    /// Reads and parses a YAML catalog file.
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| ConfigurationError::CatalogRead {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&contents).map_err(|source| ConfigurationError::CatalogParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    /// Validates the tags into a catalog, returning it with the declared fallback (if any).
    pub fn into_catalog(self) -> Result<(TagCatalog, Option<TagName>), ConfigurationError> {
        let catalog = TagCatalog::new(self.tags)?;
        Ok((catalog, self.fallback))
    }
}
