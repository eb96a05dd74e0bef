//! Shape-preserving preparation of NLU inputs.
//!
//! The [`preparer::Nlu`] accepts a single text, a list of texts, an object
//! carrying a text-bearing field, or a list of such objects, runs every leaf
//! string through the configured pipeline, and reassembles the results in
//! the shape of the input.

pub mod envelope;
pub mod prepared;
pub mod preparer;

pub use envelope::{Envelope, TEXT_FIELDS};
pub use prepared::Prepared;
pub use preparer::{Nlu, NluBuilder};
