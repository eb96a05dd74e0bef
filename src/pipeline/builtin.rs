//! Built-in pipeline steps.
//!
//! | step name | effect on the context |
//! |---|---|
//! | `normalize` | rewrites `text` with the locale's normalizer |
//! | `tokenize` | splits `text` into `tokens` |
//! | `removeStopwords` | drops the locale's stopwords unless `keepStopwords` is set |
//! | `stem` | stems every token with the locale's stemmer |
//! | `output.<field>` | projects `<field>` into the output slot |
//!
//! Locale-specific behavior comes from [`LanguageResources`]; locales without
//! a registered resource fall back to the defaults (folding normalizer, word
//! tokenizer, no stopwords, identity stemmer).

use std::sync::Arc;

use async_trait::async_trait;
use log::trace;

use crate::analysis::locale::LocaleMap;
use crate::analysis::normalizer::{FoldingNormalizer, Normalizer};
use crate::analysis::stem::{IdentityStemmer, Stemmer, SuffixStemmer};
use crate::analysis::stop::StopWords;
use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
use crate::error::{NluError, Result};
use crate::pipeline::context::PipelineContext;
use crate::pipeline::step::PipelineStep;

/// Locale-keyed analysis resources shared by the built-in steps.
#[derive(Clone)]
pub struct LanguageResources {
    pub normalizers: LocaleMap<dyn Normalizer>,
    pub tokenizers: LocaleMap<dyn Tokenizer>,
    pub stop_words: LocaleMap<StopWords>,
    pub stemmers: LocaleMap<dyn Stemmer>,
    default_normalizer: Arc<dyn Normalizer>,
    default_tokenizer: Arc<dyn Tokenizer>,
    default_stemmer: Arc<dyn Stemmer>,
}

impl LanguageResources {
    /// Resources with no locale-specific entries at all.
    pub fn empty() -> Self {
        LanguageResources {
            normalizers: LocaleMap::new(),
            tokenizers: LocaleMap::new(),
            stop_words: LocaleMap::new(),
            stemmers: LocaleMap::new(),
            default_normalizer: Arc::new(FoldingNormalizer::new()),
            default_tokenizer: Arc::new(UnicodeWordTokenizer::new()),
            default_stemmer: Arc::new(IdentityStemmer::new()),
        }
    }

    pub fn with_normalizer(mut self, locale: &str, normalizer: Arc<dyn Normalizer>) -> Self {
        self.normalizers.insert(locale, normalizer);
        self
    }

    pub fn with_tokenizer(mut self, locale: &str, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizers.insert(locale, tokenizer);
        self
    }

    pub fn with_stop_words(mut self, locale: &str, stop_words: StopWords) -> Self {
        self.stop_words.insert(locale, Arc::new(stop_words));
        self
    }

    pub fn with_stemmer(mut self, locale: &str, stemmer: Arc<dyn Stemmer>) -> Self {
        self.stemmers.insert(locale, stemmer);
        self
    }

    pub fn normalizer(&self, locale: &str) -> &Arc<dyn Normalizer> {
        self.normalizers
            .get(locale)
            .unwrap_or(&self.default_normalizer)
    }

    pub fn tokenizer(&self, locale: &str) -> &Arc<dyn Tokenizer> {
        self.tokenizers
            .get(locale)
            .unwrap_or(&self.default_tokenizer)
    }

    pub fn stop_words(&self, locale: &str) -> Option<&Arc<StopWords>> {
        self.stop_words.get(locale)
    }

    pub fn stemmer(&self, locale: &str) -> &Arc<dyn Stemmer> {
        self.stemmers.get(locale).unwrap_or(&self.default_stemmer)
    }
}

impl Default for LanguageResources {
    /// English stopwords and the English suffix stemmer on top of the
    /// locale-independent defaults.
    fn default() -> Self {
        Self::empty()
            .with_stop_words("en", StopWords::english())
            .with_stemmer("en", Arc::new(SuffixStemmer::english()))
    }
}

impl std::fmt::Debug for LanguageResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageResources")
            .field("normalizers", &self.normalizers)
            .field("tokenizers", &self.tokenizers)
            .field("stop_words", &self.stop_words)
            .field("stemmers", &self.stemmers)
            .finish()
    }
}

/// `normalize`: rewrite the text with the locale's normalizer.
pub struct NormalizeStep {
    resources: Arc<LanguageResources>,
}

impl NormalizeStep {
    pub fn new(resources: Arc<LanguageResources>) -> Self {
        NormalizeStep { resources }
    }
}

#[async_trait]
impl PipelineStep for NormalizeStep {
    async fn run(&self, mut context: PipelineContext) -> Result<PipelineContext> {
        let normalizer = self.resources.normalizer(&context.locale);
        context.text = normalizer.normalize(&context.text);
        Ok(context)
    }

    fn name(&self) -> &str {
        "normalize"
    }
}

/// `tokenize`: split the text into tokens.
pub struct TokenizeStep {
    resources: Arc<LanguageResources>,
}

impl TokenizeStep {
    pub fn new(resources: Arc<LanguageResources>) -> Self {
        TokenizeStep { resources }
    }
}

#[async_trait]
impl PipelineStep for TokenizeStep {
    async fn run(&self, mut context: PipelineContext) -> Result<PipelineContext> {
        let tokenizer = self.resources.tokenizer(&context.locale);
        context.tokens = Some(tokenizer.tokenize(&context.text)?);
        Ok(context)
    }

    fn name(&self) -> &str {
        "tokenize"
    }
}

/// `removeStopwords`: drop stopwords when the settings ask for it.
pub struct RemoveStopwordsStep {
    resources: Arc<LanguageResources>,
}

impl RemoveStopwordsStep {
    pub fn new(resources: Arc<LanguageResources>) -> Self {
        RemoveStopwordsStep { resources }
    }
}

#[async_trait]
impl PipelineStep for RemoveStopwordsStep {
    async fn run(&self, mut context: PipelineContext) -> Result<PipelineContext> {
        let tokens = context.require_tokens(self.name())?;
        if context.settings.keep_stopwords {
            return Ok(context);
        }
        let Some(stop_words) = self.resources.stop_words(&context.locale) else {
            trace!("no stopwords registered for locale '{}'", context.locale);
            return Ok(context);
        };

        let kept = stop_words.remove_from(tokens.to_vec());
        context.tokens = Some(kept);
        Ok(context)
    }

    fn name(&self) -> &str {
        "removeStopwords"
    }
}

/// `stem`: reduce every token with the locale's stemmer.
pub struct StemStep {
    resources: Arc<LanguageResources>,
}

impl StemStep {
    pub fn new(resources: Arc<LanguageResources>) -> Self {
        StemStep { resources }
    }
}

#[async_trait]
impl PipelineStep for StemStep {
    async fn run(&self, mut context: PipelineContext) -> Result<PipelineContext> {
        let stemmer = self.resources.stemmer(&context.locale);
        let stemmed = stemmer.stem_all(context.require_tokens(self.name())?);
        context.tokens = Some(stemmed);
        Ok(context)
    }

    fn name(&self) -> &str {
        "stem"
    }
}

/// `output.<field>`: project a context field into the output slot.
pub struct OutputStep {
    name: String,
    field: String,
}

impl OutputStep {
    pub fn new(field: impl Into<String>) -> Self {
        let field = field.into();
        OutputStep {
            name: format!("{}{}", super::OUTPUT_STEP_PREFIX, field),
            field,
        }
    }

    /// Build the step for a name of the form `output.<field>`.
    pub fn from_step_name(name: &str) -> Option<Self> {
        name.strip_prefix(super::OUTPUT_STEP_PREFIX)
            .filter(|field| !field.is_empty())
            .map(OutputStep::new)
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

#[async_trait]
impl PipelineStep for OutputStep {
    async fn run(&self, mut context: PipelineContext) -> Result<PipelineContext> {
        let value = context.field(&self.field).ok_or_else(|| {
            NluError::missing_output(format!("context has no '{}' field", self.field))
        })?;
        context.set_output(value);
        Ok(context)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
