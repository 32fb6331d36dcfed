//! Whole-word tokenisation shared by keyword compilation and inference.
//!
//! A word is a maximal run of word characters (alphanumeric or `_`). A single `-` sitting
//! between two word characters joins the run, so `mad-dash` is one word. Apostrophes are
//! boundaries: `anxiety's` is `anxiety` followed by `s`. Keywords are tokenised with the same
//! rules, which makes keyword matching a comparison of word sequences rather than a substring
//! search.

use crate::error::ConfigurationError;
use regex::Regex;

const WORD_PATTERN: &str = r"\w+(?:-\w+)*";

#[derive(Clone, Debug)]
pub struct WordSplitter {
    word: Regex,
}

impl WordSplitter {
    pub fn new() -> Result<Self, ConfigurationError> {
        Ok(Self {
            word: Regex::new(WORD_PATTERN)?,
        })
    }

    /// Lowercases `text` and returns its words in order.
    pub fn words(&self, text: &str) -> Vec<String> {
        let normalised = text.to_lowercase();
        self.word
            .find_iter(&normalised)
            .map(|m| m.as_str().to_owned())
            .collect()
    }
}

/// Returns true when `needle` occurs as a contiguous run inside `haystack`.
pub fn contains_run(haystack: &[String], needle: &[String]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        WordSplitter::new().unwrap().words(text)
    }

    #[test]
    fn splits_on_punctuation_and_whitespace() {
        assert_eq!(
            words("Worried, tired... and ANXIOUS!"),
            vec!["worried", "tired", "and", "anxious"]
        );
    }

    #[test]
    fn keeps_hyphenated_words_whole() {
        assert_eq!(words("a mad-dash, really"), vec!["a", "mad-dash", "really"]);
    }

    #[test]
    fn apostrophe_splits_words() {
        assert_eq!(words("My anxiety's high"), vec!["my", "anxiety", "s", "high"]);
        assert_eq!(words("I can\u{2019}t do"), vec!["i", "can", "t", "do"]);
        assert_eq!(words("can't do"), words("I can\u{2019}t do")[1..].to_vec());
    }

    #[test]
    fn dangling_hyphen_is_not_part_of_word() {
        assert_eq!(words("so mad- really"), vec!["so", "mad", "really"]);
    }

    #[test]
    fn contains_run_needs_contiguous_words() {
        let haystack = words("i am not good enough today");
        assert!(contains_run(&haystack, &words("not good enough")));
        assert!(!contains_run(&haystack, &words("not enough")));
        assert!(!contains_run(&haystack, &[]));
    }
}
