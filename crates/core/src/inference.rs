//! Tag inference.
//!
//! Maps a thought to exactly one catalogued tag by counting whole-word keyword matches.
//!
//! ## Selection rules
//!
//! 1. The thought is lowercased and split into words (see [`crate::words`]).
//! 2. Each tag scores the number of its keywords found in the thought. A keyword counts once,
//!    however often it occurs.
//! 3. Tags scoring zero are ignored; if every tag scores zero the fallback tag is returned.
//! 4. Otherwise the highest score wins. Ties go to the tag registered first in the catalog.
//!
//! All validation happens in [`TagInferenceEngine::new`], so inference itself cannot fail.

use crate::catalog::{TagCatalog, TagDefinition};
use crate::error::ConfigurationError;
use crate::words::{contains_run, WordSplitter};
use std::sync::Arc;
use tagger_types::NonEmptyText;

/// Match count for one tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagScore {
    pub tag: String,
    pub count: usize,
    /// Keywords that matched, in keyword order.
    pub matched: Vec<String>,
}

/// Per-call scores for every tag, in catalog registration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreMap {
    scores: Vec<TagScore>,
}

impl ScoreMap {
    pub fn get(&self, tag: &str) -> Option<usize> {
        self.scores.iter().find(|s| s.tag == tag).map(|s| s.count)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagScore> {
        self.scores.iter()
    }

    /// Tags with a nonzero count, in registration order.
    pub fn nonzero(&self) -> impl Iterator<Item = &TagScore> {
        self.scores.iter().filter(|s| s.count > 0)
    }

    /// Highest nonzero score; earliest registration wins a tie.
    pub fn winner(&self) -> Option<&TagScore> {
        self.winner_index().map(|position| &self.scores[position])
    }

    fn winner_index(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (position, score) in self.scores.iter().enumerate() {
            if score.count == 0 {
                continue;
            }
            match best {
                // Strictly greater only, so the earlier tag keeps a tie.
                Some((_, count)) if score.count <= count => {}
                _ => best = Some((position, score.count)),
            }
        }
        best.map(|(position, _)| position)
    }
}

#[derive(Clone, Debug)]
struct CompiledTag {
    keywords: Vec<CompiledKeyword>,
}

#[derive(Clone, Debug)]
struct CompiledKeyword {
    keyword: String,
    words: Vec<String>,
}

/// Deterministic keyword-based tag selector.
///
/// Holds the catalog by `Arc` and never mutates it, so one engine can be shared freely.
#[derive(Clone, Debug)]
pub struct TagInferenceEngine {
    catalog: Arc<TagCatalog>,
    fallback: usize,
    compiled: Vec<CompiledTag>,
    splitter: WordSplitter,
}

impl TagInferenceEngine {
    /// Validates `catalog` against `fallback` and precompiles every keyword.
    ///
    /// # Errors
    ///
    /// - `ConfigurationError::EmptyCatalog` if the catalog has no tags
    /// - `ConfigurationError::UnknownFallbackTag` if `fallback` is not a catalog entry
    /// - `ConfigurationError::InvalidKeyword` if a keyword contains no words (e.g. `"!!"`)
    pub fn new(catalog: Arc<TagCatalog>, fallback: &str) -> Result<Self, ConfigurationError> {
        if catalog.is_empty() {
            return Err(ConfigurationError::EmptyCatalog);
        }

        let fallback_name = fallback.trim().to_lowercase();
        let fallback = catalog
            .names()
            .position(|name| name == fallback_name)
            .ok_or(ConfigurationError::UnknownFallbackTag(fallback_name))?;

        let splitter = WordSplitter::new()?;
        let compiled = catalog
            .iter()
            .map(|definition| compile_tag(&splitter, definition))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            catalog,
            fallback,
            compiled,
            splitter,
        })
    }

    pub fn catalog(&self) -> &TagCatalog {
        &self.catalog
    }

    pub fn fallback_tag(&self) -> &str {
        self.definition_at(self.fallback).name.as_str()
    }

    /// Counts keyword matches for every tag.
    pub fn score(&self, text: &str) -> ScoreMap {
        let words = self.splitter.words(text);
        let scores = self
            .catalog
            .iter()
            .zip(&self.compiled)
            .map(|(definition, compiled)| {
                let matched: Vec<String> = compiled
                    .keywords
                    .iter()
                    .filter(|k| contains_run(&words, &k.words))
                    .map(|k| k.keyword.clone())
                    .collect();
                TagScore {
                    tag: definition.name.to_string(),
                    count: matched.len(),
                    matched,
                }
            })
            .collect();

        ScoreMap { scores }
    }

    /// Selects the tag for `text`. The result is always a catalog key.
    pub fn infer_tag(&self, text: &NonEmptyText) -> &str {
        self.infer_definition(text).name.as_str()
    }

    /// Like [`Self::infer_tag`] but returns the whole definition.
    pub fn infer_definition(&self, text: &NonEmptyText) -> &TagDefinition {
        let scores = self.score(text.as_str());
        let definition = scores
            .winner()
            .and_then(|winner| self.catalog.get(&winner.tag))
            .unwrap_or_else(|| self.definition_at(self.fallback));

        tracing::debug!(
            tag = definition.name.as_str(),
            matches = scores.nonzero().count(),
            "inferred tag"
        );
        definition
    }

    fn definition_at(&self, position: usize) -> &TagDefinition {
        // Positions come from this catalog, which never changes after construction.
        &self.catalog.definitions()[position]
    }
}

fn compile_tag(
    splitter: &WordSplitter,
    definition: &TagDefinition,
) -> Result<CompiledTag, ConfigurationError> {
    let keywords = definition
        .keywords
        .iter()
        .map(|keyword| {
            let words = splitter.words(keyword);
            if words.is_empty() {
                return Err(ConfigurationError::InvalidKeyword {
                    tag: definition.name.to_string(),
                    keyword: keyword.clone(),
                });
            }
            Ok(CompiledKeyword {
                keyword: keyword.clone(),
                words,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompiledTag { keywords })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_FALLBACK_TAG;

    fn text(input: &str) -> NonEmptyText {
        NonEmptyText::new(input).expect("test text must be non-empty")
    }

    /// gratitude, anxiety, reflection, in that registration order.
    fn small_engine() -> TagInferenceEngine {
        let catalog = TagCatalog::new(vec![
            TagDefinition::new("gratitude", &["thank", "grateful"], "Thanks.", "Say it.")
                .unwrap(),
            TagDefinition::new("anxiety", &["worry", "anxious"], "Worry.", "Breathe.").unwrap(),
            TagDefinition::new("anger", &["mad", "furious"], "", "").unwrap(),
            TagDefinition::new("reflection", &["reflect"], "Reflect.", "Write.").unwrap(),
        ])
        .unwrap();
        TagInferenceEngine::new(Arc::new(catalog), "reflection").unwrap()
    }

    #[test]
    fn grateful_selects_gratitude_and_thankful_is_not_thank() {
        let engine = small_engine();
        let input = text("I am so grateful and thankful");

        let scores = engine.score(input.as_str());
        assert_eq!(scores.get("gratitude"), Some(1));
        assert_eq!(scores.get("anxiety"), Some(0));
        assert_eq!(engine.infer_tag(&input), "gratitude");
    }

    #[test]
    fn two_anxiety_keywords_select_anxiety() {
        let engine = small_engine();
        let input = text("I worry and feel anxious");

        assert_eq!(engine.score(input.as_str()).get("anxiety"), Some(2));
        assert_eq!(engine.infer_tag(&input), "anxiety");
    }

    #[test]
    fn no_keyword_returns_fallback() {
        let engine = small_engine();
        assert_eq!(
            engine.infer_tag(&text("The weather is nice today")),
            "reflection"
        );
    }

    #[test]
    fn keyword_inside_longer_word_does_not_match() {
        let engine = small_engine();
        assert_eq!(engine.infer_tag(&text("madness")), "reflection");
        assert_eq!(engine.infer_tag(&text("a mad-dash to work")), "reflection");
        assert_eq!(engine.infer_tag(&text("so mad!")), "anger");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let engine = small_engine();
        assert_eq!(engine.infer_tag(&text("I am ANXIOUS today")), "anxiety");
    }

    #[test]
    fn tie_goes_to_first_registered_tag() {
        let engine = small_engine();
        let input = text("Anxious and worried but grateful, thank you, still furious and mad");
        let scores = engine.score(input.as_str());
        assert_eq!(scores.get("gratitude"), Some(2));
        assert_eq!(scores.get("anger"), Some(2));
        // "worried" is not "worry"
        assert_eq!(scores.get("anxiety"), Some(1));

        assert_eq!(engine.infer_tag(&input), "gratitude");
    }

    #[test]
    fn tie_order_follows_registration_not_name() {
        let catalog = TagCatalog::new(vec![
            TagDefinition::new("zeta", &["alpha", "beta"], "", "").unwrap(),
            TagDefinition::new("alpha-tag", &["gamma", "delta"], "", "").unwrap(),
            TagDefinition::new("other", &["x"], "", "").unwrap(),
        ])
        .unwrap();
        let engine = TagInferenceEngine::new(Arc::new(catalog), "other").unwrap();

        assert_eq!(engine.infer_tag(&text("gamma delta alpha beta")), "zeta");
    }

    #[test]
    fn repeated_keyword_counts_once() {
        let engine = small_engine();
        let input = text("worry worry worry but grateful and thank");
        assert_eq!(engine.score(input.as_str()).get("anxiety"), Some(1));
        assert_eq!(engine.infer_tag(&input), "gratitude");
    }

    #[test]
    fn inference_is_deterministic() {
        let engine = small_engine();
        let input = text("thank you, I worry");
        let first = engine.infer_tag(&input).to_owned();
        for _ in 0..10 {
            assert_eq!(engine.infer_tag(&input), first);
        }
    }

    #[test]
    fn multi_word_keyword_matches_contiguous_words() {
        let engine =
            TagInferenceEngine::new(Arc::new(TagCatalog::builtin().unwrap()), DEFAULT_FALLBACK_TAG)
                .unwrap();
        assert_eq!(
            engine.infer_tag(&text("I feel like I'm not good enough")),
            "self-doubt"
        );
        assert_eq!(
            engine.infer_tag(&text("good, but not enough")),
            DEFAULT_FALLBACK_TAG
        );
    }

    #[test]
    fn keyword_before_apostrophe_still_matches() {
        let engine =
            TagInferenceEngine::new(Arc::new(TagCatalog::builtin().unwrap()), DEFAULT_FALLBACK_TAG)
                .unwrap();
        assert_eq!(engine.infer_tag(&text("My anxiety's through the roof")), "anxiety");
        assert_eq!(engine.infer_tag(&text("this year's goal's simple")), "goals");
        assert_eq!(engine.infer_tag(&text("I can\u{2019}t do this")), "self-doubt");
    }

    #[test]
    fn winner_reports_matched_keywords() {
        let engine = small_engine();
        let scores = engine.score("ANXIOUS, worry");
        let winner = scores.winner().expect("a tag should match");
        assert_eq!(winner.tag, "anxiety");
        assert_eq!(winner.matched, vec!["worry", "anxious"]);
        assert_eq!(scores.nonzero().count(), 1);
    }

    #[test]
    fn unknown_fallback_is_a_configuration_error() {
        let catalog = Arc::new(TagCatalog::builtin().unwrap());
        let err = TagInferenceEngine::new(catalog, "mystery").expect_err("fallback must exist");
        assert!(matches!(err, ConfigurationError::UnknownFallbackTag(tag) if tag == "mystery"));
    }

    #[test]
    fn keyword_without_words_is_a_configuration_error() {
        let catalog = TagCatalog::new(vec![
            TagDefinition::new("noise", &["!!!"], "", "").unwrap(),
        ])
        .unwrap();
        let err = TagInferenceEngine::new(Arc::new(catalog), "noise")
            .expect_err("keyword with no words must be rejected");
        assert!(matches!(err, ConfigurationError::InvalidKeyword { .. }));
    }

    #[test]
    fn fallback_name_is_normalised() {
        let engine =
            TagInferenceEngine::new(Arc::new(TagCatalog::builtin().unwrap()), " Reflection ")
                .unwrap();
        assert_eq!(engine.fallback_tag(), DEFAULT_FALLBACK_TAG);
    }
}
