//! Text normalizers applied before tokenization.
//!
//! The default normalizer folds diacritics and lowercases, which is what the
//! `normalize` step runs for every locale without a dedicated normalizer:
//!
//! ```
//! use nlu_prep::analysis::normalizer::{FoldingNormalizer, Normalizer};
//!
//! let normalizer = FoldingNormalizer::new();
//! assert_eq!(normalizer.normalize("Allí hay un ratón"), "alli hay un raton");
//! ```

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Trait for normalizers that rewrite raw text before tokenization.
pub trait Normalizer: Send + Sync {
    /// Normalize the input text.
    fn normalize(&self, text: &str) -> String;

    /// Get the name of this normalizer.
    fn name(&self) -> &'static str;
}

/// Supported Unicode normalization forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationForm {
    NFC,
    NFD,
    NFKC,
    NFKD,
}

/// A normalizer that only applies a Unicode normalization form.
#[derive(Debug, Clone)]
pub struct UnicodeNormalizer {
    form: NormalizationForm,
}

impl UnicodeNormalizer {
    pub fn new(form: NormalizationForm) -> Self {
        Self { form }
    }
}

impl Normalizer for UnicodeNormalizer {
    fn normalize(&self, text: &str) -> String {
        match self.form {
            NormalizationForm::NFC => text.nfc().collect(),
            NormalizationForm::NFD => text.nfd().collect(),
            NormalizationForm::NFKC => text.nfkc().collect(),
            NormalizationForm::NFKD => text.nfkd().collect(),
        }
    }

    fn name(&self) -> &'static str {
        "unicode_normalization"
    }
}

/// Decomposes text, drops combining marks and lowercases the remainder.
#[derive(Debug, Clone)]
pub struct FoldingNormalizer {
    lowercase: bool,
}

impl FoldingNormalizer {
    /// Create a folding normalizer that also lowercases.
    pub fn new() -> Self {
        FoldingNormalizer { lowercase: true }
    }

    /// Keep the original casing, only fold diacritics.
    pub fn preserve_case(mut self) -> Self {
        self.lowercase = false;
        self
    }
}

impl Default for FoldingNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer for FoldingNormalizer {
    fn normalize(&self, text: &str) -> String {
        let folded = text.nfd().filter(|c| !is_combining_mark(*c));
        if self.lowercase {
            folded.flat_map(char::to_lowercase).collect()
        } else {
            folded.collect()
        }
    }

    fn name(&self) -> &'static str {
        "folding"
    }
}
