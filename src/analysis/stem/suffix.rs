//! Suffix-stripping stemmer.

use super::Stemmer;

const ENGLISH_SUFFIXES: &[&str] = &[
    "ing", "ed", "er", "est", "ly", "s", "es", "ies", "ied", "tion", "sion", "able", "ible",
    "ment", "ness", "ful",
];

/// Light stemmer that removes the longest matching suffix.
///
/// Words of three characters or fewer are returned as-is, and a suffix is
/// only removed when at least three characters of stem remain.
#[derive(Debug, Clone)]
pub struct SuffixStemmer {
    /// Suffixes sorted longest first.
    suffixes: Vec<String>,
}

impl SuffixStemmer {
    /// Create a stemmer with custom suffixes.
    pub fn with_suffixes<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut suffixes: Vec<String> = suffixes.into_iter().map(Into::into).collect();
        suffixes.sort_by_key(|s| std::cmp::Reverse(s.chars().count()));
        SuffixStemmer { suffixes }
    }

    /// Stemmer with common English suffixes.
    pub fn english() -> Self {
        Self::with_suffixes(ENGLISH_SUFFIXES.iter().copied())
    }
}

impl Stemmer for SuffixStemmer {
    fn stem(&self, word: &str) -> String {
        let len = word.chars().count();
        if len <= 3 {
            return word.to_string();
        }

        for suffix in &self.suffixes {
            let suffix_len = suffix.chars().count();
            if len > suffix_len + 2 {
                if let Some(stem) = word.strip_suffix(suffix.as_str()) {
                    return stem.to_string();
                }
            }
        }

        word.to_string()
    }

    fn name(&self) -> &'static str {
        "suffix"
    }
}
