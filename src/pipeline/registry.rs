//! Step registry: resolves step names to implementations.
//!
//! Names are resolved when a pipeline runs, never when it is configured, so a
//! pipeline may reference steps that are registered later. Any name of the
//! form `output.<field>` resolves to an [`OutputStep`] unless a step was
//! registered under that exact name.
//!
//! # Example
//!
//! ```
//! use nlu_prep::pipeline::{PipelineContext, StepRegistry};
//! use nlu_prep::settings::Settings;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let registry = StepRegistry::with_defaults();
//! let context = PipelineContext::new("en", "Hello World", Arc::new(Settings::default()));
//! let steps = vec!["normalize".to_string(), "tokenize".to_string(), "output.tokens".to_string()];
//!
//! let context = registry.run_pipeline(&steps, context).await.unwrap();
//! assert_eq!(context.into_tokens().unwrap(), vec!["hello", "world"]);
//! # });
//! ```

use std::future::Future;
use std::sync::Arc;

use ahash::AHashMap;
use log::trace;

use crate::error::{NluError, Result};
use crate::pipeline::builtin::{
    LanguageResources, NormalizeStep, OutputStep, RemoveStopwordsStep, StemStep, TokenizeStep,
};
use crate::pipeline::context::PipelineContext;
use crate::pipeline::step::{AsyncFnStep, FnStep, PipelineStep};

/// A mapping from step name to step implementation.
#[derive(Clone, Default)]
pub struct StepRegistry {
    steps: AHashMap<String, Arc<dyn PipelineStep>>,
}

impl StepRegistry {
    /// Create an empty registry; only `output.*` names resolve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in steps over the default language resources.
    pub fn with_defaults() -> Self {
        Self::with_resources(LanguageResources::default())
    }

    /// Registry with the built-in steps over the given language resources.
    pub fn with_resources(resources: LanguageResources) -> Self {
        let resources = Arc::new(resources);
        let mut registry = Self::new();
        registry.register("normalize", Arc::new(NormalizeStep::new(resources.clone())));
        registry.register("tokenize", Arc::new(TokenizeStep::new(resources.clone())));
        registry.register(
            "removeStopwords",
            Arc::new(RemoveStopwordsStep::new(resources.clone())),
        );
        registry.register("stem", Arc::new(StemStep::new(resources)));
        registry
    }

    /// Register a step under `name`, replacing any step already there.
    pub fn register(&mut self, name: impl Into<String>, step: Arc<dyn PipelineStep>) {
        self.steps.insert(name.into(), step);
    }

    /// Register a synchronous closure as a step.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(PipelineContext) -> Result<PipelineContext> + Send + Sync + 'static,
    {
        let name = name.into();
        let step = FnStep::new(name.clone(), func);
        self.register(name, Arc::new(step));
    }

    /// Register a closure returning a future as a step.
    pub fn register_async<F, Fut>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(PipelineContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<PipelineContext>> + Send + 'static,
    {
        let name = name.into();
        let step = AsyncFnStep::new(name.clone(), func);
        self.register(name, Arc::new(step));
    }

    /// Resolve a step by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn PipelineStep>> {
        if let Some(step) = self.steps.get(name) {
            return Some(Arc::clone(step));
        }
        OutputStep::from_step_name(name).map(|step| Arc::new(step) as Arc<dyn PipelineStep>)
    }

    /// Whether `name` resolves to a step.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Explicitly registered step names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(String::as_str)
    }

    /// Resolve `name` and run it over `context`.
    pub async fn run_step(&self, name: &str, context: PipelineContext) -> Result<PipelineContext> {
        let step = self.get(name).ok_or_else(|| NluError::unknown_step(name))?;
        trace!("running step '{}' (locale '{}')", step.name(), context.locale);
        step.run(context).await
    }

    /// Run `steps` in order, each one starting after the previous finished.
    pub async fn run_pipeline(
        &self,
        steps: &[String],
        mut context: PipelineContext,
    ) -> Result<PipelineContext> {
        for name in steps {
            context = self.run_step(name, context).await?;
        }
        Ok(context)
    }
}

impl std::fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("StepRegistry").field("steps", &names).finish()
    }
}
