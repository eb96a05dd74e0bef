//! Stemmer trait and implementations.
//!
//! The `stem` step resolves a [`Stemmer`] by locale and applies it to every
//! token; locales without a registered stemmer use [`IdentityStemmer`].

pub mod identity;
pub mod suffix;

pub use identity::IdentityStemmer;
pub use suffix::SuffixStemmer;

/// Trait for stemming algorithms.
pub trait Stemmer: Send + Sync {
    /// Stem a word to its root form.
    fn stem(&self, word: &str) -> String;

    /// Stem every token, keeping their order.
    fn stem_all(&self, tokens: &[String]) -> Vec<String> {
        tokens.iter().map(|token| self.stem(token)).collect()
    }

    /// Get the name of this stemmer.
    fn name(&self) -> &'static str;
}
