use std::{convert::Infallible, fmt};

use crate::{symbols::Symbol, value::Value};

/// Everything that can go wrong while defining, constructing or reading a
/// record.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("attribute names should be symbols, got {0}")]
    InvalidAttributeName(String),
    #[error("Missing attribute(s): {}", NameList(.0))]
    MissingAttributes(Vec<Symbol>),
    #[error("Unknown attribute(s): {}", KeyList(.0))]
    UnknownAttributes(Vec<Value>),
    #[error("No such attribute: {0}")]
    NoSuchAttribute(String),
    #[error("Expected {expected} attribute values, provided {provided}")]
    WrongNumberOfValues { expected: usize, provided: usize },
    #[error("Expected value of type {expected}, provided {provided}")]
    InvalidType { expected: String, provided: String },
    #[error("Expected record of type {expected}, provided {provided}")]
    WrongRecordType { expected: String, provided: String },
}

impl RecordError {
    pub fn invalid_type(expected: &str, provided: &str) -> Self {
        Self::InvalidType {
            expected: expected.to_string(),
            provided: provided.to_string(),
        }
    }
}

impl From<Infallible> for RecordError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

struct NameList<'a>(&'a [Symbol]);

impl fmt::Display for NameList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0).finish()
    }
}

/// Symbol keys print bare, like declared names; anything else prints as the
/// value it is.
struct KeyList<'a>(&'a [Value]);

impl fmt::Display for KeyList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for key in self.0 {
            match key {
                Value::Symbol(sym) => list.entry(sym),
                other => list.entry(&format_args!("{other}")),
            };
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_list_names_in_order() {
        let err = RecordError::MissingAttributes(vec![Symbol::intern("foo"), Symbol::intern("bar")]);
        assert_eq!(err.to_string(), "Missing attribute(s): [foo, bar]");

        let err = RecordError::UnknownAttributes(vec![
            Value::from(Symbol::intern("baz")),
            Value::from("foo"),
        ]);
        assert_eq!(err.to_string(), r#"Unknown attribute(s): [baz, "foo"]"#);
    }
}
