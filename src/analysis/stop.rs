//! Stopword sets.
//!
//! A [`StopWords`] set is looked up per locale by the `removeStopwords`
//! step. English ships with a default list; other locales are registered by
//! the caller.
//!
//! # Examples
//!
//! ```
//! use nlu_prep::analysis::stop::StopWords;
//!
//! let stop_words = StopWords::english();
//! let tokens = vec!["the".to_string(), "quick".to_string(), "fox".to_string()];
//!
//! assert_eq!(stop_words.remove_from(tokens), vec!["quick", "fox"]);
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

/// Default English stop words list.
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

static DEFAULT_ENGLISH_STOP_WORDS_SET: LazyLock<HashSet<String>> = LazyLock::new(|| {
    DEFAULT_ENGLISH_STOP_WORDS
        .iter()
        .map(|s| s.to_string())
        .collect()
});

/// A set of words dropped when stopwords are not kept.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Create a stopword set from a list of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopWords {
            words: words.into_iter().map(|s| s.into()).collect(),
        }
    }

    /// The default English stopword set.
    pub fn english() -> Self {
        StopWords {
            words: DEFAULT_ENGLISH_STOP_WORDS_SET.clone(),
        }
    }

    /// Check if a word is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Drop every stop word from `tokens`, keeping the order of the rest.
    pub fn remove_from(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .filter(|token| !self.is_stop_word(token))
            .collect()
    }

    /// Get the number of stop words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the stop word set is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
