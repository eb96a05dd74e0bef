//! The pipeline step contract.
//!
//! A step consumes a [`PipelineContext`] and returns the updated context.
//! Steps may be implemented directly, or built from closures with
//! [`FnStep`] (synchronous) and [`AsyncFnStep`] (suspending).
//!
//! # Example
//!
//! ```
//! use async_trait::async_trait;
//! use nlu_prep::error::Result;
//! use nlu_prep::pipeline::{PipelineContext, PipelineStep};
//!
//! struct Uppercase;
//!
//! #[async_trait]
//! impl PipelineStep for Uppercase {
//!     async fn run(&self, mut context: PipelineContext) -> Result<PipelineContext> {
//!         context.text = context.text.to_uppercase();
//!         Ok(context)
//!     }
//!
//!     fn name(&self) -> &str {
//!         "uppercase"
//!     }
//! }
//! ```

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;

use crate::error::Result;
use crate::pipeline::context::PipelineContext;

/// A named transformation over a processing context.
///
/// Implementations must be `Send + Sync` so one registry can serve
/// concurrently running pipelines.
#[async_trait]
pub trait PipelineStep: Send + Sync {
    /// Transform the context.
    async fn run(&self, context: PipelineContext) -> Result<PipelineContext>;

    /// Get the name of this step (for logging and debugging).
    fn name(&self) -> &str;
}

/// A step backed by a synchronous closure.
pub struct FnStep<F> {
    name: String,
    func: F,
}

impl<F> FnStep<F>
where
    F: Fn(PipelineContext) -> Result<PipelineContext> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        FnStep {
            name: name.into(),
            func,
        }
    }
}

#[async_trait]
impl<F> PipelineStep for FnStep<F>
where
    F: Fn(PipelineContext) -> Result<PipelineContext> + Send + Sync,
{
    async fn run(&self, context: PipelineContext) -> Result<PipelineContext> {
        (self.func)(context)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A step backed by a closure returning a future.
pub struct AsyncFnStep<F, Fut> {
    name: String,
    func: F,
    _future: PhantomData<fn() -> Fut>,
}

impl<F, Fut> AsyncFnStep<F, Fut>
where
    F: Fn(PipelineContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PipelineContext>> + Send + 'static,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        AsyncFnStep {
            name: name.into(),
            func,
            _future: PhantomData,
        }
    }
}

#[async_trait]
impl<F, Fut> PipelineStep for AsyncFnStep<F, Fut>
where
    F: Fn(PipelineContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PipelineContext>> + Send + 'static,
{
    async fn run(&self, context: PipelineContext) -> Result<PipelineContext> {
        (self.func)(context).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
