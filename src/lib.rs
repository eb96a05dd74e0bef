//! # nlu-prep
//!
//! Shape-preserving text preparation for NLU corpora.
//!
//! ## Features
//!
//! - Accepts a text, a list of texts, an object with a `text`, `utterance`,
//!   `texts` or `utterances` field, or a list of such objects
//! - Runs every text through a named, ordered pipeline of steps
//! - Returns results in the shape of the input, sibling fields untouched
//! - Pluggable, async step registry with locale-aware built-in steps
//! - Typed settings merged over documented defaults

pub mod analysis;
pub mod error;
pub mod nlu;
pub mod pipeline;
pub mod settings;

pub mod prelude {
    pub use crate::error::{NluError, Result};
    pub use crate::nlu::{Envelope, Nlu, NluBuilder, Prepared};
    pub use crate::pipeline::{PipelineContext, PipelineStep, StepRegistry};
    pub use crate::settings::{Settings, SettingsOverrides};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
