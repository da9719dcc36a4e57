//! Filter document codec
//!
//! Maps expression trees to and from the nested-map wire shape:
//!
//! ```text
//! { "field": scalar }                  implicit $eq
//! { "field": [v1, v2] }                implicit $in
//! { "field": { "$op": operand } }      explicit operator
//! { "$and" | "$or": [ doc, ... ] }     compound
//! ```

use serde_json::{Map, Value};

use crate::expression::{Expression, ExpressionError, ExpressionResult, Operator};

/// Writes the top-level keys of `expression` into `map`
pub(super) fn encode_into(expression: &Expression, map: &mut Map<String, Value>) {
    match expression {
        Expression::Singular(s) => {
            let value = if s.operator() == Operator::Eq {
                s.value().clone()
            } else {
                operator_map(s.operator(), s.value().clone())
            };
            map.insert(s.field().to_string(), value);
        }
        Expression::List(l) => {
            map.insert(
                l.field().to_string(),
                operator_map(l.operator(), Value::Array(l.values().to_vec())),
            );
        }
        Expression::And(children) => {
            map.insert(Operator::And.as_str().to_string(), encode_children(children));
        }
        Expression::Or(children) => {
            map.insert(Operator::Or.as_str().to_string(), encode_children(children));
        }
    }
}

fn encode_children(children: &[Expression]) -> Value {
    Value::Array(
        children
            .iter()
            .map(|child| {
                let mut m = Map::new();
                encode_into(child, &mut m);
                Value::Object(m)
            })
            .collect(),
    )
}

fn operator_map(operator: Operator, operand: Value) -> Value {
    let mut m = Map::with_capacity(1);
    m.insert(operator.as_str().to_string(), operand);
    Value::Object(m)
}

/// Decodes one document level into an ordered expression list.
///
/// Every key contributes one expression; the list is implicitly conjoined.
pub(super) fn decode_level(map: &Map<String, Value>) -> ExpressionResult<Vec<Expression>> {
    map.iter().map(|(key, value)| decode_entry(key, value)).collect()
}

fn decode_entry(key: &str, value: &Value) -> ExpressionResult<Expression> {
    if let Some(structural) = Operator::parse_structural(key) {
        let children = decode_compound(key, value)?;
        return Ok(match structural {
            Operator::Or => Expression::Or(children),
            _ => Expression::And(children),
        });
    }

    match value {
        Value::Object(operator_map) => decode_operator_map(key, operator_map),
        Value::Array(values) => Expression::list_valued(key, Operator::In, values.iter().cloned()),
        scalar => Expression::singular(key, Operator::Eq, scalar.clone()),
    }
}

/// Each element of a `$and`/`$or` array is a sub-document. A sub-document
/// with several keys becomes one conjunction of those keys.
fn decode_compound(key: &str, value: &Value) -> ExpressionResult<Vec<Expression>> {
    let elements = value.as_array().ok_or_else(|| {
        ExpressionError::malformed_document(format!("'{}' expects an array of documents", key))
    })?;

    elements
        .iter()
        .map(|element| {
            let sub = element.as_object().ok_or_else(|| {
                ExpressionError::malformed_document(format!(
                    "'{}' element {} is not a document",
                    key, element
                ))
            })?;
            let mut expressions = decode_level(sub)?;
            Ok(if expressions.len() == 1 {
                expressions.remove(0)
            } else {
                Expression::And(expressions)
            })
        })
        .collect()
}

fn decode_operator_map(field: &str, operator_map: &Map<String, Value>) -> ExpressionResult<Expression> {
    let mut entries = operator_map.iter();
    let (token, operand) = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        _ => {
            return Err(ExpressionError::malformed_document(format!(
                "field '{}' expects exactly one operator, found {}",
                field,
                operator_map.len()
            )))
        }
    };

    let operator = Operator::parse(token).map_err(|e| e.with_field(field))?;
    if operator.is_list() && !operand.is_array() {
        return Err(ExpressionError::malformed_document(format!(
            "field '{}': operator {} expects an array operand",
            field, operator
        ))
        .with_field(field));
    }
    Expression::of(field, operator, operand.clone())
}
