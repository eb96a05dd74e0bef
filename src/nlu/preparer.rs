//! The recursive preparer.
//!
//! # Examples
//!
//! ```
//! use nlu_prep::nlu::Nlu;
//! use nlu_prep::settings::SettingsOverrides;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let nlu = Nlu::new(SettingsOverrides::new().keep_stopwords(false));
//!
//! let tokens = nlu.prepare_text("Allí hay un ratón", None).await.unwrap();
//! assert_eq!(tokens, vec!["alli", "hay", "un", "raton"]);
//!
//! let prepared = nlu
//!     .prepare(&json!({ "text": "Allí hay un ratón", "intent": "mouse" }), None)
//!     .await
//!     .unwrap();
//! assert_eq!(prepared["intent"], json!("mouse"));
//! assert_eq!(prepared["tokens"], json!(["alli", "hay", "un", "raton"]));
//! # });
//! ```

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, try_join_all};
use log::debug;
use serde_json::Value;

use crate::error::Result;
use crate::nlu::envelope::Envelope;
use crate::nlu::prepared::Prepared;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::registry::StepRegistry;
use crate::pipeline::default_pipeline;
use crate::settings::{Settings, SettingsOverrides};

/// Prepares texts of any supported shape through a fixed pipeline.
///
/// Settings and pipeline are fixed at construction. Step names are looked up
/// in the registry each time a text is prepared.
#[derive(Clone)]
pub struct Nlu {
    settings: Arc<Settings>,
    pipeline: Vec<String>,
    registry: Arc<StepRegistry>,
    concurrent_lists: bool,
}

impl Nlu {
    /// Create a preparer with the default pipeline and step registry.
    pub fn new(overrides: SettingsOverrides) -> Self {
        Self::builder().settings(overrides).build()
    }

    /// Create a new builder.
    pub fn builder() -> NluBuilder {
        NluBuilder::new()
    }

    /// Resolved instance settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Locale placed in every processing context.
    pub fn locale(&self) -> &str {
        &self.settings.locale
    }

    /// Step names, in execution order.
    pub fn pipeline(&self) -> &[String] {
        &self.pipeline
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    /// Prepare a JSON input, returning a value shaped like it.
    ///
    /// Strings become token arrays, arrays are prepared element-wise, and
    /// objects get a `tokens` field next to their original fields. When
    /// `settings` is given it replaces the instance settings for this call.
    pub async fn prepare(&self, input: &Value, settings: Option<&Settings>) -> Result<Value> {
        let envelope = Envelope::from_value(input)?;
        let prepared = self.prepare_envelope(&envelope, settings).await?;
        Ok(prepared.into_value())
    }

    /// Prepare a single text.
    pub async fn prepare_text(&self, text: &str, settings: Option<&Settings>) -> Result<Vec<String>> {
        let settings = self.call_settings(settings);
        self.run_text(text, settings).await
    }

    /// Prepare an already classified input.
    pub async fn prepare_envelope(
        &self,
        envelope: &Envelope,
        settings: Option<&Settings>,
    ) -> Result<Prepared> {
        debug!(
            "preparing {} text(s) through {:?}",
            envelope.leaf_count(),
            self.pipeline
        );
        let settings = self.call_settings(settings);
        self.prepare_recursive(envelope, &settings).await
    }

    fn call_settings(&self, settings: Option<&Settings>) -> Arc<Settings> {
        match settings {
            Some(settings) => Arc::new(settings.clone()),
            None => Arc::clone(&self.settings),
        }
    }

    fn prepare_recursive<'a>(
        &'a self,
        envelope: &'a Envelope,
        settings: &'a Arc<Settings>,
    ) -> BoxFuture<'a, Result<Prepared>> {
        async move {
            match envelope {
                Envelope::Text(text) => {
                    let tokens = self.run_text(text, Arc::clone(settings)).await?;
                    Ok(Prepared::Tokens(tokens))
                }
                Envelope::List(items) if self.concurrent_lists => {
                    debug!("preparing {} list elements concurrently", items.len());
                    let results = try_join_all(
                        items
                            .iter()
                            .map(|item| self.prepare_recursive(item, settings)),
                    )
                    .await?;
                    Ok(Prepared::List(results))
                }
                Envelope::List(items) => {
                    let mut results = Vec::with_capacity(items.len());
                    for item in items {
                        results.push(self.prepare_recursive(item, settings).await?);
                    }
                    Ok(Prepared::List(results))
                }
                Envelope::Tagged { body, object, .. } => {
                    let tokens = self.prepare_recursive(body, settings).await?;
                    Ok(Prepared::Tagged {
                        object: object.clone(),
                        tokens: Box::new(tokens),
                    })
                }
            }
        }
        .boxed()
    }

    async fn run_text(&self, text: &str, settings: Arc<Settings>) -> Result<Vec<String>> {
        let context = PipelineContext::new(self.locale(), text, settings);
        let context = self.registry.run_pipeline(&self.pipeline, context).await?;
        context.into_tokens()
    }
}

impl std::fmt::Debug for Nlu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nlu")
            .field("settings", &self.settings)
            .field("pipeline", &self.pipeline)
            .field("registry", &self.registry)
            .field("concurrent_lists", &self.concurrent_lists)
            .finish()
    }
}

impl Default for Nlu {
    fn default() -> Self {
        Self::new(SettingsOverrides::default())
    }
}

/// Builder for [`Nlu`].
#[derive(Debug, Default)]
pub struct NluBuilder {
    overrides: SettingsOverrides,
    pipeline: Option<Vec<String>>,
    registry: Option<StepRegistry>,
    concurrent_lists: bool,
}

impl NluBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caller settings; unset keys fall back to the defaults.
    pub fn settings(mut self, overrides: SettingsOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Replace the default pipeline.
    pub fn pipeline<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pipeline = Some(steps.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the default step registry.
    pub fn registry(mut self, registry: StepRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Prepare list elements concurrently. Results keep input order.
    pub fn concurrent_lists(mut self, enabled: bool) -> Self {
        self.concurrent_lists = enabled;
        self
    }

    pub fn build(self) -> Nlu {
        Nlu {
            settings: Arc::new(Settings::from_overrides(&self.overrides)),
            pipeline: self.pipeline.unwrap_or_else(default_pipeline),
            registry: Arc::new(self.registry.unwrap_or_else(StepRegistry::with_defaults)),
            concurrent_lists: self.concurrent_lists,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::analysis::stop::StopWords;
    use crate::error::NluError;
    use crate::pipeline::builtin::LanguageResources;

    fn nlu() -> Nlu {
        Nlu::new(SettingsOverrides::new().locale("en").keep_stopwords(false))
    }

    #[test]
    fn test_default_settings() {
        let nlu = Nlu::default();
        let settings = nlu.settings();

        assert_eq!(settings.locale, "en");
        assert!(settings.keep_stopwords);
        assert_eq!(settings.nonefeature_value, 1.0);
        assert_eq!(settings.nonedelta_multiplier, 1.2);
        assert_eq!(settings.spellcheck_distance, 0);
        assert_eq!(nlu.pipeline(), default_pipeline().as_slice());
    }

    #[test]
    fn test_constructor_settings() {
        let nlu = Nlu::new(SettingsOverrides::new().locale("fr").keep_stopwords(false));
        let settings = nlu.settings();

        assert_eq!(nlu.locale(), "fr");
        assert!(!settings.keep_stopwords);
        assert_eq!(settings.nonefeature_value, 1.0);
        assert_eq!(settings.nonedelta_multiplier, 1.2);
        assert_eq!(settings.spellcheck_distance, 0);
    }

    #[tokio::test]
    async fn test_prepare_text() {
        let tokens = nlu().prepare_text("Allí hay un ratón", None).await.unwrap();
        assert_eq!(tokens, vec!["alli", "hay", "un", "raton"]);
    }

    #[tokio::test]
    async fn test_prepare_rejects_unsupported_values() {
        let nlu = nlu();

        for (input, rendered) in [
            (json!(7), "7"),
            (json!(null), "null"),
            (json!({ "something": "something" }), "[object Object]"),
        ] {
            let err = nlu.prepare(&input, None).await.unwrap_err();
            assert!(err.is_invalid_input());
            assert_eq!(
                err.to_string(),
                format!("Error at nlu.prepare: expected a text but received {rendered}")
            );
        }
    }

    #[tokio::test]
    async fn test_call_settings_replace_instance_settings() {
        let nlu = nlu();
        let input = json!("the cats");

        assert_eq!(nlu.prepare(&input, None).await.unwrap(), json!(["cat"]));

        let keep = Settings {
            keep_stopwords: true,
            ..Settings::default()
        };
        assert_eq!(
            nlu.prepare(&input, Some(&keep)).await.unwrap(),
            json!(["the", "cat"])
        );
    }

    #[tokio::test]
    async fn test_context_uses_instance_locale() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = StepRegistry::new();
        {
            let seen = Arc::clone(&seen);
            registry.register_fn("record", move |mut ctx: PipelineContext| {
                seen.lock()
                    .unwrap()
                    .push((ctx.locale.clone(), ctx.settings.locale.clone()));
                ctx.tokens = Some(vec![ctx.text.clone()]);
                Ok(ctx)
            });
        }
        let nlu = Nlu::builder()
            .settings(SettingsOverrides::new().locale("es"))
            .registry(registry)
            .pipeline(["record", "output.tokens"])
            .build();

        let call = Settings {
            locale: "pt".to_string(),
            ..Settings::default()
        };
        nlu.prepare_text("hola", Some(&call)).await.unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![("es".to_string(), "pt".to_string())]
        );
    }

    #[tokio::test]
    async fn test_step_order_changes_output() {
        let registry = StepRegistry::with_resources(
            LanguageResources::default().with_stop_words("en", StopWords::from_words(["walk"])),
        );
        let stop_then_stem = Nlu::builder()
            .settings(SettingsOverrides::new().keep_stopwords(false))
            .registry(registry.clone())
            .build();
        let stem_then_stop = Nlu::builder()
            .settings(SettingsOverrides::new().keep_stopwords(false))
            .registry(registry)
            .pipeline(["normalize", "tokenize", "stem", "removeStopwords", "output.tokens"])
            .build();

        let input = "walking home";
        assert_eq!(
            stop_then_stem.prepare_text(input, None).await.unwrap(),
            vec!["walk", "home"]
        );
        assert_eq!(
            stem_then_stop.prepare_text(input, None).await.unwrap(),
            vec!["home"]
        );
    }

    #[tokio::test]
    async fn test_step_errors_abort_the_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = StepRegistry::with_defaults();
        {
            let calls = Arc::clone(&calls);
            registry.register_fn("fail-on-b", move |ctx: PipelineContext| {
                calls.fetch_add(1, Ordering::SeqCst);
                if ctx.text == "b" {
                    Err(NluError::step("fail-on-b", "rejected"))
                } else {
                    Ok(ctx)
                }
            });
        }
        let nlu = Nlu::builder()
            .registry(registry)
            .pipeline(["fail-on-b", "tokenize", "output.tokens"])
            .build();

        let err = nlu.prepare(&json!(["a", "b", "c"]), None).await.unwrap_err();
        assert_eq!(err.to_string(), "Step 'fail-on-b' failed: rejected");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unknown_step_propagates() {
        let nlu = Nlu::builder().pipeline(["normalize", "lemmatize"]).build();

        let err = nlu.prepare(&json!("text"), None).await.unwrap_err();
        assert!(matches!(err, NluError::UnknownStep(_)));
    }

    #[tokio::test]
    async fn test_pipeline_without_output_step() {
        let nlu = Nlu::builder().pipeline(["normalize", "tokenize"]).build();

        let err = nlu.prepare_text("text", None).await.unwrap_err();
        assert!(matches!(err, NluError::MissingOutput(_)));
    }

    #[tokio::test]
    async fn test_non_list_projection_is_rejected() {
        let nlu = Nlu::builder().pipeline(["normalize", "output.text"]).build();

        let err = nlu.prepare(&json!("Allí"), None).await.unwrap_err();
        assert!(matches!(err, NluError::InvalidOutput(_)));
        assert_eq!(
            err.to_string(),
            "Pipeline output is not a token list: expected a list of strings, got \"alli\""
        );
    }

    #[tokio::test]
    async fn test_recognized_keys_passed_by_name() {
        let nlu = Nlu::new(
            SettingsOverrides::new()
                .with("keepStopwords", json!(false))
                .with("locale", json!("en")),
        );

        assert!(!nlu.settings().keep_stopwords);
        assert_eq!(nlu.prepare(&json!("the cat"), None).await.unwrap(), json!(["cat"]));
    }

    #[tokio::test]
    async fn test_concurrent_lists_keep_order() {
        let mut registry = StepRegistry::with_defaults();
        registry.register_async("jitter", |ctx: PipelineContext| async move {
            // Earlier elements sleep longer so they finish last
            let delay = 40u64.saturating_sub(ctx.text.len() as u64 * 10);
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
            Ok(ctx)
        });
        let nlu = Nlu::builder()
            .registry(registry)
            .pipeline(["jitter", "tokenize", "output.tokens"])
            .concurrent_lists(true)
            .build();

        let prepared = nlu
            .prepare(&json!(["a", "bb", "ccc", { "texts": ["dd", "e"] }]), None)
            .await
            .unwrap();

        assert_eq!(
            prepared,
            json!([["a"], ["bb"], ["ccc"], { "texts": ["dd", "e"], "tokens": [["dd"], ["e"]] }])
        );
    }
}
