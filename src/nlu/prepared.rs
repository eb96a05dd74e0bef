//! Prepared outputs, shaped like the envelope they came from.

use serde_json::{Map, Value};

/// Field added to object envelopes to hold their prepared tokens.
pub const TOKENS_FIELD: &str = "tokens";

/// The result of preparing an [`Envelope`](super::Envelope).
#[derive(Debug, Clone, PartialEq)]
pub enum Prepared {
    /// Tokens of a single text.
    Tokens(Vec<String>),

    /// One result per list element, in input order.
    List(Vec<Prepared>),

    /// The original object plus the result for its text-bearing field.
    Tagged {
        object: Map<String, Value>,
        tokens: Box<Prepared>,
    },
}

impl Prepared {
    /// Tokens, when this is the result of a single text.
    pub fn as_tokens(&self) -> Option<&[String]> {
        match self {
            Prepared::Tokens(tokens) => Some(tokens.as_slice()),
            _ => None,
        }
    }

    /// The prepared tokens of an object, whatever their shape.
    pub fn tagged_tokens(&self) -> Option<&Prepared> {
        match self {
            Prepared::Tagged { tokens, .. } => Some(tokens.as_ref()),
            _ => None,
        }
    }

    /// Render as JSON.
    ///
    /// Objects become a shallow copy of the original with a `tokens` field
    /// set to the prepared result; every other field is kept as it was.
    pub fn into_value(self) -> Value {
        match self {
            Prepared::Tokens(tokens) => Value::from(tokens),
            Prepared::List(items) => {
                Value::Array(items.into_iter().map(Prepared::into_value).collect())
            }
            Prepared::Tagged { mut object, tokens } => {
                object.insert(TOKENS_FIELD.to_string(), tokens.into_value());
                Value::Object(object)
            }
        }
    }
}

impl From<Prepared> for Value {
    fn from(prepared: Prepared) -> Self {
        prepared.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tokens(words: &[&str]) -> Prepared {
        Prepared::Tokens(words.iter().map(|w| w.to_string()).collect())
    }

    #[test]
    fn test_into_value() {
        assert_eq!(tokens(&["a", "b"]).into_value(), json!(["a", "b"]));

        let list = Prepared::List(vec![tokens(&["a"]), tokens(&[])]);
        assert_eq!(list.into_value(), json!([["a"], []]));
    }

    #[test]
    fn test_tagged_keeps_original_fields() {
        let object = json!({ "text": "A b", "intent": "x", "tokens": "stale" });
        let Value::Object(object) = object else {
            unreachable!()
        };
        let prepared = Prepared::Tagged {
            object,
            tokens: Box::new(tokens(&["a", "b"])),
        };

        assert_eq!(prepared.tagged_tokens(), Some(&tokens(&["a", "b"])));
        assert_eq!(
            prepared.into_value(),
            json!({ "text": "A b", "intent": "x", "tokens": ["a", "b"] })
        );
    }

    #[test]
    fn test_accessors() {
        let prepared = tokens(&["a"]);
        assert_eq!(prepared.as_tokens(), Some(&["a".to_string()][..]));
        assert!(prepared.tagged_tokens().is_none());
        assert!(Prepared::List(vec![]).as_tokens().is_none());
    }
}
