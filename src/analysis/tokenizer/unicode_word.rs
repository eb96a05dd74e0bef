//! Unicode word tokenizer implementation.
//!
//! Splits text using Unicode word boundary rules (UAX #29) and drops the
//! segments that hold no alphanumeric character, such as punctuation and
//! whitespace.

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A tokenizer that splits text on Unicode word boundaries.
#[derive(Clone, Debug, Default)]
pub struct UnicodeWordTokenizer;

impl UnicodeWordTokenizer {
    /// Create a new Unicode word tokenizer.
    pub fn new() -> Self {
        UnicodeWordTokenizer
    }
}

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(text
            .split_word_bounds()
            .filter(|word| word.chars().any(char::is_alphanumeric))
            .map(str::to_string)
            .collect())
    }

    fn name(&self) -> &'static str {
        "unicode_word"
    }
}
