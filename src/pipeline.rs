//! Named, ordered pipelines of text-transformation steps.
//!
//! A pipeline is a list of step names. Each name is resolved against a
//! [`registry::StepRegistry`] when the pipeline runs, and the resolved steps
//! thread a single [`context::PipelineContext`] through in order:
//!
//! ```text
//! context -> normalize -> tokenize -> removeStopwords -> stem -> output.tokens -> tokens
//! ```
//!
//! Steps are `async` so that implementations which suspend (remote lookups,
//! for instance) and purely synchronous ones are driven the same way.

pub mod builtin;
pub mod context;
pub mod registry;
pub mod step;

pub use context::PipelineContext;
pub use registry::StepRegistry;
pub use step::{AsyncFnStep, FnStep, PipelineStep};

/// The default preparation pipeline.
pub const DEFAULT_PIPELINE: &[&str] = &[
    "normalize",
    "tokenize",
    "removeStopwords",
    "stem",
    "output.tokens",
];

/// Prefix of the steps that project a context field into the output slot.
pub const OUTPUT_STEP_PREFIX: &str = "output.";

/// The default pipeline as owned step names.
pub fn default_pipeline() -> Vec<String> {
    DEFAULT_PIPELINE.iter().map(|s| s.to_string()).collect()
}
