//! Per-string processing context.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{NluError, Result};
use crate::settings::Settings;

/// State threaded through the steps of one pipeline run.
///
/// A context is created for a single leaf string, owned by the run that
/// created it, and dropped once the output has been extracted.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Locale of the preparer that created the context.
    pub locale: String,

    /// The text being processed; normalization steps rewrite it in place.
    pub text: String,

    /// Settings in effect for this run.
    pub settings: Arc<Settings>,

    /// Tokens, once a tokenizer step has run.
    pub tokens: Option<Vec<String>>,

    /// Fields added by custom steps.
    pub extra: Map<String, Value>,

    output: Option<Value>,
}

impl PipelineContext {
    pub fn new(locale: impl Into<String>, text: impl Into<String>, settings: Arc<Settings>) -> Self {
        PipelineContext {
            locale: locale.into(),
            text: text.into(),
            settings,
            tokens: None,
            extra: Map::new(),
            output: None,
        }
    }

    /// Tokens produced so far, or an error naming the step that needed them.
    pub fn require_tokens(&self, step: &str) -> Result<&[String]> {
        self.tokens
            .as_deref()
            .ok_or_else(|| NluError::step(step, "context has no tokens; run a tokenizer step first"))
    }

    /// Read a context field by name, as the `output.<field>` steps see it.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "locale" => Some(Value::String(self.locale.clone())),
            "text" => Some(Value::String(self.text.clone())),
            "tokens" => self
                .tokens
                .as_ref()
                .map(|tokens| Value::from(tokens.clone())),
            "settings" => serde_json::to_value(self.settings.as_ref()).ok(),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Set a custom field.
    pub fn set_extra(&mut self, name: impl Into<String>, value: Value) {
        self.extra.insert(name.into(), value);
    }

    /// Store the pipeline result.
    pub fn set_output(&mut self, output: Value) {
        self.output = Some(output);
    }

    pub fn output(&self) -> Option<&Value> {
        self.output.as_ref()
    }

    /// Take the projected output as an ordered token list.
    ///
    /// Only a list of strings qualifies; a pipeline ending in a projection of
    /// any other field (`output.text`, for instance) fails here.
    pub fn into_tokens(self) -> Result<Vec<String>> {
        let output = self.output.ok_or_else(|| {
            NluError::missing_output("the last pipeline step did not project an output")
        })?;
        match output {
            Value::Array(items) if items.iter().all(Value::is_string) => Ok(items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(token) => Some(token),
                    _ => None,
                })
                .collect()),
            other => Err(NluError::invalid_output(format!(
                "expected a list of strings, got {other}"
            ))),
        }
    }
}
