//! Error types for the nlu-prep library.
//!
//! All errors are represented by the [`NluError`] enum. The preparer itself
//! originates [`NluError::InvalidInput`] for unsupported input shapes and
//! [`NluError::InvalidOutput`] when a pipeline's output is not a token list;
//! every other variant comes from the step registry or from the steps it
//! runs, and is propagated to the caller of `prepare` unchanged.
//!
//! # Examples
//!
//! ```
//! use nlu_prep::error::{NluError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(NluError::invalid_input("7"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

/// The main error type for nlu-prep operations.
#[derive(Error, Debug)]
pub enum NluError {
    /// The input is neither a string, an array, nor an object exposing a
    /// text-bearing field. Carries the rendering of the offending value.
    #[error("Error at nlu.prepare: expected a text but received {0}")]
    InvalidInput(String),

    /// A pipeline references a step name the registry cannot resolve.
    #[error("Unknown pipeline step: {0}")]
    UnknownStep(String),

    /// A pipeline step failed while transforming the context.
    #[error("Step '{step}' failed: {message}")]
    Step { step: String, message: String },

    /// The pipeline finished without projecting an output.
    #[error("Pipeline produced no output: {0}")]
    MissingOutput(String),

    /// The pipeline projected an output that is not a list of strings.
    #[error("Pipeline output is not a token list: {0}")]
    InvalidOutput(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Errors raised by step implementations written against `anyhow`.
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with NluError.
pub type Result<T> = std::result::Result<T, NluError>;

impl NluError {
    /// Create a new invalid input error from a rendering of the input.
    pub fn invalid_input<S: Into<String>>(rendered: S) -> Self {
        NluError::InvalidInput(rendered.into())
    }

    /// Create a new unknown step error.
    pub fn unknown_step<S: Into<String>>(name: S) -> Self {
        NluError::UnknownStep(name.into())
    }

    /// Create a new step failure.
    pub fn step<S: Into<String>, M: Into<String>>(step: S, message: M) -> Self {
        NluError::Step {
            step: step.into(),
            message: message.into(),
        }
    }

    /// Create a new missing output error.
    pub fn missing_output<S: Into<String>>(msg: S) -> Self {
        NluError::MissingOutput(msg.into())
    }

    /// Create a new invalid output error.
    pub fn invalid_output<S: Into<String>>(msg: S) -> Self {
        NluError::InvalidOutput(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        NluError::Other(msg.into())
    }

    /// Whether this error was raised by the preparer's shape dispatch.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, NluError::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = NluError::invalid_input("7");
        assert_eq!(
            error.to_string(),
            "Error at nlu.prepare: expected a text but received 7"
        );
        assert!(error.is_invalid_input());

        let error = NluError::unknown_step("lemmatize");
        assert_eq!(error.to_string(), "Unknown pipeline step: lemmatize");
        assert!(!error.is_invalid_input());

        let error = NluError::step("tokenize", "boom");
        assert_eq!(error.to_string(), "Step 'tokenize' failed: boom");
    }

    #[test]
    fn test_anyhow_conversion() {
        let error = NluError::from(anyhow::anyhow!("remote lookup failed"));

        match error {
            NluError::Anyhow(_) => {}
            _ => panic!("Expected Anyhow error variant"),
        }
    }
}
