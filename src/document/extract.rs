//! Field extraction
//!
//! Read-only walk over a document that lists the fields a filter touches,
//! for authorization or auditing, without decoding or compiling it.

use serde_json::{Map, Value};

use super::FilterDocument;
use crate::expression::Operator;

/// One field referenced by a filter
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRef<'a> {
    /// Field path as written, join markers included
    pub name: &'a str,
    /// Explicit operator token, None for implicit `$eq` / `$in`
    pub operator: Option<&'a str>,
    /// Operand
    pub value: &'a Value,
}

/// Flattens a document into its field references, in document order.
///
/// Structural keys contribute nothing themselves; their sub-documents are
/// walked in array order. Entries that are not documents are skipped.
pub fn extract_fields(document: &FilterDocument) -> Vec<FieldRef<'_>> {
    let mut out = Vec::new();
    walk(document.as_map(), &mut out);
    out
}

/// Returns the distinct field names a document references, first use first
pub fn extract_field_names(document: &FilterDocument) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for field in extract_fields(document) {
        if !names.contains(&field.name) {
            names.push(field.name);
        }
    }
    names
}

fn walk<'a>(map: &'a Map<String, Value>, out: &mut Vec<FieldRef<'a>>) {
    for (key, value) in map {
        if Operator::parse_structural(key).is_some() {
            if let Value::Array(elements) = value {
                for sub in elements.iter().filter_map(Value::as_object) {
                    walk(sub, out);
                }
            }
            continue;
        }

        match value {
            Value::Object(operator_map) if operator_map.len() == 1 => {
                if let Some((token, operand)) = operator_map.iter().next() {
                    out.push(FieldRef {
                        name: key,
                        operator: Some(token.as_str()),
                        value: operand,
                    });
                }
            }
            _ => out.push(FieldRef {
                name: key,
                operator: None,
                value,
            }),
        }
    }
}
