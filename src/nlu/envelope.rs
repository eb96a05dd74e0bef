//! Input envelopes.
//!
//! Raw JSON input is classified once, at the boundary, into an [`Envelope`].
//! Anything that is not a string, an array, or an object exposing one of the
//! [`TEXT_FIELDS`] is rejected with [`NluError::InvalidInput`].

use log::warn;
use serde_json::{Map, Value};

use crate::error::{NluError, Result};

/// Text-bearing object fields, in lookup precedence.
pub const TEXT_FIELDS: [&str; 4] = ["text", "utterance", "texts", "utterances"];

/// A classified input value.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// A leaf string that goes through the pipeline.
    Text(String),

    /// An array whose elements are prepared one by one.
    List(Vec<Envelope>),

    /// An object whose text-bearing `field` holds `body`. `object` is the
    /// original object, every field included.
    Tagged {
        field: &'static str,
        body: Box<Envelope>,
        object: Map<String, Value>,
    },
}

impl Envelope {
    /// Classify a JSON value.
    pub fn from_value(value: &Value) -> Result<Envelope> {
        match value {
            Value::String(text) => Ok(Envelope::Text(text.clone())),
            Value::Array(items) => items
                .iter()
                .map(Envelope::from_value)
                .collect::<Result<Vec<_>>>()
                .map(Envelope::List),
            Value::Object(object) => {
                let Some((field, body)) = text_field(object) else {
                    return Err(NluError::invalid_input(render(value)));
                };
                Ok(Envelope::Tagged {
                    field,
                    body: Box::new(Envelope::from_value(body)?),
                    object: object.clone(),
                })
            }
            _ => Err(NluError::invalid_input(render(value))),
        }
    }

    /// Number of leaf strings in this envelope.
    pub fn leaf_count(&self) -> usize {
        match self {
            Envelope::Text(_) => 1,
            Envelope::List(items) => items.iter().map(Envelope::leaf_count).sum(),
            Envelope::Tagged { body, .. } => body.leaf_count(),
        }
    }
}

impl From<&str> for Envelope {
    fn from(text: &str) -> Self {
        Envelope::Text(text.to_string())
    }
}

impl From<String> for Envelope {
    fn from(text: String) -> Self {
        Envelope::Text(text)
    }
}

impl<T: Into<Envelope>> From<Vec<T>> for Envelope {
    fn from(items: Vec<T>) -> Self {
        Envelope::List(items.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<&Value> for Envelope {
    type Error = NluError;

    fn try_from(value: &Value) -> Result<Self> {
        Envelope::from_value(value)
    }
}

/// First text-bearing field holding a usable value.
///
/// Empty strings, `false`, zero and `null` count as absent, so the lookup
/// moves on to the next field.
fn text_field(object: &Map<String, Value>) -> Option<(&'static str, &Value)> {
    let mut present = TEXT_FIELDS
        .iter()
        .filter_map(|field| object.get(*field).filter(|v| is_truthy(v)).map(|v| (*field, v)));

    let first = present.next()?;
    let others: Vec<&str> = present.map(|(field, _)| field).collect();
    if !others.is_empty() {
        warn!(
            "object carries several text fields; using '{}' and ignoring {:?}",
            first.0, others
        );
    }
    Some(first)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Human-readable rendering of a rejected value.
///
/// Scalars print as themselves, arrays print their elements joined by `,`
/// and objects print as `[object Object]`.
pub fn render(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => render_float(f),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => render(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

// Number-to-string as a JavaScript engine prints it: no sign on zero,
// exponent notation outside [1e-6, 1e21).
fn render_float(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let magnitude = f.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exp = format!("{f:e}");
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        };
    }
    if f.fract() == 0.0 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_shapes() {
        assert_eq!(
            Envelope::from_value(&json!("hello")).unwrap(),
            Envelope::Text("hello".to_string())
        );
        assert_eq!(
            Envelope::from_value(&json!(["a", "b"])).unwrap(),
            Envelope::from(vec!["a", "b"])
        );

        let value = json!({ "utterance": "hi", "intent": "greet" });
        match Envelope::from_value(&value).unwrap() {
            Envelope::Tagged { field, body, object } => {
                assert_eq!(field, "utterance");
                assert_eq!(*body, Envelope::from("hi"));
                assert_eq!(Value::Object(object), value);
            }
            other => panic!("expected tagged envelope, got {other:?}"),
        }
    }

    #[test]
    fn test_field_precedence() {
        let value = json!({
            "utterances": ["d"],
            "texts": ["c"],
            "utterance": "b",
            "text": "a",
        });
        match Envelope::from_value(&value).unwrap() {
            Envelope::Tagged { field, body, .. } => {
                assert_eq!(field, "text");
                assert_eq!(*body, Envelope::from("a"));
            }
            other => panic!("expected tagged envelope, got {other:?}"),
        }

        let value = json!({ "utterances": ["d"], "texts": ["c"] });
        match Envelope::from_value(&value).unwrap() {
            Envelope::Tagged { field, .. } => assert_eq!(field, "texts"),
            other => panic!("expected tagged envelope, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_text_falls_through() {
        let value = json!({ "text": "", "utterance": "b" });
        match Envelope::from_value(&value).unwrap() {
            Envelope::Tagged { field, .. } => assert_eq!(field, "utterance"),
            other => panic!("expected tagged envelope, got {other:?}"),
        }

        let err = Envelope::from_value(&json!({ "text": null })).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_invalid_inputs() {
        let err = Envelope::from_value(&json!(7)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error at nlu.prepare: expected a text but received 7"
        );

        let err = Envelope::from_value(&json!({ "something": "something" })).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error at nlu.prepare: expected a text but received [object Object]"
        );

        let err = Envelope::from_value(&json!(["ok", true])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error at nlu.prepare: expected a text but received true"
        );

        // A text field holding a non-text value is rejected on its own value
        let err = Envelope::from_value(&json!({ "text": 5 })).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error at nlu.prepare: expected a text but received 5"
        );
    }

    #[test]
    fn test_render() {
        assert_eq!(render(&json!(null)), "null");
        assert_eq!(render(&json!(false)), "false");
        assert_eq!(render(&json!(7)), "7");
        assert_eq!(render(&json!(7.0)), "7");
        assert_eq!(render(&json!(1.5)), "1.5");
        assert_eq!(render(&json!(-0.0)), "0");
        assert_eq!(render(&json!(-2.0)), "-2");
        assert_eq!(render(&json!(1e21)), "1e+21");
        assert_eq!(render(&json!(-1.5e25)), "-1.5e+25");
        assert_eq!(render(&json!(1.5e-7)), "1.5e-7");
        assert_eq!(render(&json!(0.000001)), "0.000001");
        assert_eq!(render(&json!([1, null, "a"])), "1,,a");
        assert_eq!(render(&json!({})), "[object Object]");
    }

    #[test]
    fn test_leaf_count() {
        let value = json!([{ "texts": ["a", "b"] }, "c"]);
        assert_eq!(Envelope::from_value(&value).unwrap().leaf_count(), 3);
    }
}
