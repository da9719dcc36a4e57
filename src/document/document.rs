//! FilterDocument value type
//!
//! A document is an immutable nested map. Appending an expression with
//! `and` / `or` returns a new document and leaves the receiver untouched.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::codec;
use crate::expression::{Expression, ExpressionError, ExpressionResult, Operator};

/// Canonical nested-map encoding of an expression tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterDocument {
    entries: Map<String, Value>,
}

impl FilterDocument {
    /// Creates an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value; only objects are documents
    pub fn from_value(value: Value) -> ExpressionResult<Self> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(ExpressionError::malformed_document(format!(
                "filter document must be an object, got {}",
                other
            ))),
        }
    }

    /// Parses a document from JSON text
    pub fn from_json_str(text: &str) -> ExpressionResult<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            ExpressionError::malformed_document(format!("invalid filter JSON: {}", e))
        })?;
        Self::from_value(value)
    }

    /// Encodes an expression as a new document
    pub fn encode(expression: &Expression) -> Self {
        let mut entries = Map::new();
        codec::encode_into(expression, &mut entries);
        Self { entries }
    }

    /// Decodes the top level into an ordered, implicitly conjoined list
    pub fn expressions(&self) -> ExpressionResult<Vec<Expression>> {
        codec::decode_level(&self.entries)
    }

    /// Returns a new document combining this one and `expression` with `$and`
    pub fn and(&self, expression: &Expression) -> Self {
        self.append(Operator::And, expression)
    }

    /// Returns a new document combining this one and `expression` with `$or`
    pub fn or(&self, expression: &Expression) -> Self {
        self.append(Operator::Or, expression)
    }

    fn append(&self, structural: Operator, expression: &Expression) -> Self {
        let added = Self::encode(expression);
        if self.entries.is_empty() {
            return added;
        }

        let siblings = vec![
            Value::Object(self.entries.clone()),
            Value::Object(added.entries),
        ];
        let mut entries = Map::with_capacity(1);
        entries.insert(structural.as_str().to_string(), Value::Array(siblings));
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the raw top-level entries
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Converts into a JSON value
    pub fn to_value(&self) -> Value {
        Value::Object(self.entries.clone())
    }
}

impl fmt::Display for FilterDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.entries.clone()))
    }
}

impl From<&Expression> for FilterDocument {
    fn from(expression: &Expression) -> Self {
        Self::encode(expression)
    }
}

impl TryFrom<Value> for FilterDocument {
    type Error = ExpressionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}
