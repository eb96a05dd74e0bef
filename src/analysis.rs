//! Text analysis for the built-in pipeline steps.
//!
//! This module provides the locale-aware building blocks that the default
//! step registry wires together: normalization, tokenization, stopword sets
//! and stemmers. Each kind of resource is keyed by locale through
//! [`locale::LocaleMap`], so callers can register language-specific
//! implementations next to the shipped defaults.

pub mod locale;
pub mod normalizer;
pub mod stem;
pub mod stop;
pub mod tokenizer;
