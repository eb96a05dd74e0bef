//! Tokenizers that split normalized text into tokens.
//!
//! # Available Tokenizers
//!
//! - [`unicode_word::UnicodeWordTokenizer`] - Uses Unicode word boundaries (default)
//! - [`whitespace::WhitespaceTokenizer`] - Splits on whitespace characters
//!
//! # Examples
//!
//! ```
//! use nlu_prep::analysis::tokenizer::Tokenizer;
//! use nlu_prep::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
//!
//! let tokenizer = UnicodeWordTokenizer::new();
//! let tokens = tokenizer.tokenize("hello, world").unwrap();
//! assert_eq!(tokens, vec!["hello", "world"]);
//! ```

use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so a tokenizer can be shared by
/// concurrently running pipelines.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text, preserving the order of appearance.
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod unicode_word;
pub mod whitespace;
